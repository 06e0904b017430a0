use log::debug;
use serde::{Deserialize, Serialize};

use super::{Calculation, ChartConfig, DateGranularity, VisualType};
use crate::semantic_model::ColumnSchema;

pub const FALLBACK_MEASURE: &str = "clicks";
pub const FALLBACK_SECOND_MEASURE: &str = "spend";
/// Preferred grouping dimension when the schema offers it
pub const DEFAULT_DIMENSION: &str = "campaign_name";

/// Starting configuration that lets a newly placed chart render at once.
///
/// Callers should check [`ColumnSchema::is_ready`] first; the literal
/// fallbacks only exist so an empty schema still yields a well formed config.
pub fn synthesize(schema: &ColumnSchema, visual_type: &VisualType) -> ChartConfig {
    let measure = schema
        .measures
        .first()
        .map(String::as_str)
        .unwrap_or(FALLBACK_MEASURE)
        .to_string();
    let dimension = schema
        .dimensions
        .iter()
        .find(|d| *d == DEFAULT_DIMENSION)
        .or_else(|| schema.dimensions.first())
        .map(String::as_str)
        .unwrap_or(DEFAULT_DIMENSION)
        .to_string();

    let base = ChartConfig {
        date_granularity: DateGranularity::None,
        ..Default::default()
    };

    match visual_type {
        VisualType::Card => ChartConfig {
            measure,
            calculation: Some(Calculation::Sum),
            ..base
        },
        VisualType::Table => ChartConfig {
            selected_columns: Some(vec![dimension, measure]),
            ..base
        },
        VisualType::Matrix => ChartConfig {
            measure,
            matrix_rows: Some(vec![dimension]),
            matrix_columns: Some(vec![]),
            ..base
        },
        VisualType::MultiLine => {
            let measure2 = schema
                .measures
                .get(1)
                .or_else(|| schema.measures.first())
                .map(String::as_str)
                .unwrap_or(FALLBACK_SECOND_MEASURE)
                .to_string();
            ChartConfig {
                measure,
                measure2: Some(measure2),
                group_by: dimension,
                ..base
            }
        }
        VisualType::Bar
        | VisualType::Line
        | VisualType::Area
        | VisualType::Combo
        | VisualType::Pie
        | VisualType::Other(_) => ChartConfig {
            measure,
            group_by: dimension,
            ..base
        },
    }
}

/// A chart on the canvas together with its configuration.
///
/// `config` stays `None` until the chart receives a synthesized default or
/// a user edit, which is what keeps default synthesis to at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSlot {
    pub id: String,
    pub visual_type: VisualType,
    #[serde(default)]
    pub config: Option<ChartConfig>,
}

impl ChartSlot {
    pub fn new(id: &str, visual_type: VisualType) -> Self {
        Self {
            id: id.to_string(),
            visual_type,
            config: None,
        }
    }

    /// Synthesize a default config if this chart has none yet and the
    /// schema is ready. Returns whether a config was written.
    pub fn ensure_config(&mut self, schema: &ColumnSchema) -> bool {
        if self.config.is_some() || !schema.is_ready() {
            return false;
        }
        debug!("Applying default {} config to chart {}", self.visual_type, self.id);
        self.config = Some(synthesize(schema, &self.visual_type));
        true
    }

    /// Replace the config with a user edit
    pub fn set_config(&mut self, config: ChartConfig) {
        self.config = Some(config);
    }

    /// Changing the visual type keeps the current config; fields the new
    /// type does not use are simply ignored by aggregation.
    pub fn set_visual_type(&mut self, visual_type: VisualType) {
        self.visual_type = visual_type;
    }
}
