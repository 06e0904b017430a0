//! Turns raw records plus a chart configuration into chart-ready data points.
//!
//! Every branch is infallible: a configuration that is not complete enough
//! for its visual type yields an empty series, which callers render as a
//! "configure me" state.
mod card;
mod grouped;
mod matrix;
mod table;

use indexmap::IndexMap;
use log::debug;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::cmp::Ordering;
use uuid::Uuid;

use crate::chart::{ChartConfig, SortOrder, VisualType};
use crate::data_store::{Record, Value};
use crate::utils::text::locale_compare;

/// Column holding the record date used for time bucketing
pub const DEFAULT_DATE_COLUMN: &str = "date";

/// Measures averaged rather than summed by grouped charts
pub const RATE_FIELDS: [&str; 14] = [
    "ctr",
    "cpc",
    "cpm",
    "roas",
    "cpv",
    "cpcv",
    "vtr",
    "cpe",
    "cpl",
    "engagement_rate",
    "frequency",
    "measurable_rate",
    "viewability_rate",
    "viewability_rate_verification",
];

/// Measures averaged rather than summed by the matrix visual
pub const MATRIX_RATE_FIELDS: [&str; 4] = ["ctr", "cpc", "cpm", "roas"];

pub const MAX_GROUPED_POINTS: usize = 15;
pub const MAX_MATRIX_POINTS: usize = 50;
pub const MAX_TABLE_ROWS: usize = 100;

/// One entry of a chart series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub id: Uuid,
    pub category: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value2: Option<f64>,
    /// Raw selected columns, only filled for table rows
    #[serde(flatten)]
    pub columns: IndexMap<String, Value>,
}

impl DataPoint {
    pub fn new(category: String, value: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            value: round2(value),
            value2: None,
            columns: IndexMap::new(),
        }
    }
}

/// Round half up (towards positive infinity) at the second decimal place.
/// Non-finite input rounds to `0`.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let strategy = if value < 0.0 {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    Decimal::from_f64(value)
        .map(|d| {
            let mut rounded = d.round_dp_with_strategy(2, strategy);
            rounded.rescale(2);
            rounded.mantissa() as f64 / 100.0
        })
        .unwrap_or_else(|| (value * 100.0 + 0.5).floor() / 100.0)
}

/// Running sum and count of the numeric cells seen for one group
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    /// Absent cells add nothing to the sum and are not counted
    fn add(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    /// Average for rate measures, sum otherwise
    fn total(&self, is_rate: bool) -> f64 {
        match (is_rate, self.count) {
            (true, 0) => 0.0,
            (true, count) => self.sum / count as f64,
            (false, _) => self.sum,
        }
    }
}

fn numeric_cell(record: &Record, column: &str) -> Option<f64> {
    record.get(column).and_then(Value::as_number)
}

/// Label of a grouping cell, `Unknown` when null, empty or missing
fn label_or_unknown(record: &Record, column: &str) -> String {
    match record.get(column) {
        Some(value) if !value.is_blank() => value.to_label(),
        _ => "Unknown".to_string(),
    }
}

fn sort_points(points: &mut [DataPoint], order: SortOrder) {
    match order {
        SortOrder::ValueDesc => points.sort_by(|a, b| compare_values(b.value, a.value)),
        SortOrder::ValueAsc => points.sort_by(|a, b| compare_values(a.value, b.value)),
        SortOrder::NameAsc => points.sort_by(|a, b| locale_compare(&a.category, &b.category)),
        SortOrder::NameDesc => points.sort_by(|a, b| locale_compare(&b.category, &a.category)),
        SortOrder::None => {}
    }
}

fn compare_values(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Aggregation entry point shared by the editor and the read-only viewer
#[derive(Debug, Clone)]
pub struct Aggregator {
    date_column: String,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::with_date_column(DEFAULT_DATE_COLUMN)
    }
}

impl Aggregator {
    pub fn with_date_column(date_column: &str) -> Self {
        Self {
            date_column: date_column.to_string(),
        }
    }

    pub fn aggregate(
        &self,
        records: &[Record],
        config: &ChartConfig,
        visual_type: &VisualType,
    ) -> Vec<DataPoint> {
        if records.is_empty() {
            return vec![];
        }

        let points = match visual_type {
            VisualType::Table => table::aggregate(records, config),
            VisualType::Card => card::aggregate(records, config),
            VisualType::Matrix => matrix::aggregate(records, config),
            VisualType::MultiLine => grouped::aggregate_pair(records, config, &self.date_column),
            VisualType::Bar
            | VisualType::Line
            | VisualType::Area
            | VisualType::Combo
            | VisualType::Pie
            | VisualType::Other(_) => grouped::aggregate(records, config, &self.date_column),
        };

        if points.is_empty() {
            debug!(
                "{} chart produced no points from {} records; configuration incomplete",
                visual_type,
                records.len()
            );
        }
        points
    }
}

/// Aggregate with the default date column
pub fn aggregate(records: &[Record], config: &ChartConfig, visual_type: &VisualType) -> Vec<DataPoint> {
    Aggregator::default().aggregate(records, config, visual_type)
}
