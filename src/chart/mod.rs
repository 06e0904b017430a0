pub mod defaults;

pub use crate::time_bucket::DateGranularity;
pub use defaults::{synthesize, ChartSlot};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of visual placed on the canvas.
///
/// Kinds without a dedicated aggregation branch are kept in
/// [`VisualType::Other`] and aggregate like a bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VisualType {
    Bar,
    Line,
    Area,
    Combo,
    Pie,
    MultiLine,
    Table,
    Card,
    Matrix,
    Other(String),
}

impl VisualType {
    pub fn as_str(&self) -> &str {
        match self {
            VisualType::Bar => "bar",
            VisualType::Line => "line",
            VisualType::Area => "area",
            VisualType::Combo => "combo",
            VisualType::Pie => "pie",
            VisualType::MultiLine => "multiline",
            VisualType::Table => "table",
            VisualType::Card => "card",
            VisualType::Matrix => "matrix",
            VisualType::Other(name) => name,
        }
    }
}

impl From<&str> for VisualType {
    fn from(value: &str) -> Self {
        match value {
            "bar" => VisualType::Bar,
            "line" => VisualType::Line,
            "area" => VisualType::Area,
            "combo" => VisualType::Combo,
            "pie" => VisualType::Pie,
            "multiline" => VisualType::MultiLine,
            "table" => VisualType::Table,
            "card" => VisualType::Card,
            "matrix" => VisualType::Matrix,
            other => VisualType::Other(other.to_string()),
        }
    }
}

impl From<String> for VisualType {
    fn from(value: String) -> Self {
        VisualType::from(value.as_str())
    }
}

impl From<VisualType> for String {
    fn from(value: VisualType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for VisualType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// KPI card reduction over every numeric value of the measure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Calculation {
    #[default]
    Sum,
    Average,
    Min,
    Max,
    Count,
    Last,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    ValueDesc,
    ValueAsc,
    NameAsc,
    NameDesc,
    None,
}

/// Declarative configuration of one chart.
///
/// Which fields matter is decided by the [`VisualType`] the config is
/// paired with; the rest are ignored. Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(default)]
    pub measure: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure2: Option<String>,
    #[serde(default)]
    pub group_by: String,
    #[serde(default)]
    pub date_granularity: DateGranularity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation: Option<Calculation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_rows: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_columns: Option<Vec<String>>,
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

impl ChartConfig {
    pub fn measure(&self) -> Option<&str> {
        non_empty(&self.measure)
    }

    pub fn measure2(&self) -> Option<&str> {
        self.measure2.as_deref().and_then(non_empty)
    }

    pub fn group_by(&self) -> Option<&str> {
        non_empty(&self.group_by)
    }

    pub fn calculation(&self) -> Calculation {
        self.calculation.unwrap_or_default()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_by.unwrap_or_default()
    }

    pub fn selected_columns(&self) -> &[String] {
        self.selected_columns.as_deref().unwrap_or_default()
    }

    pub fn matrix_rows(&self) -> &[String] {
        self.matrix_rows.as_deref().unwrap_or_default()
    }

    pub fn matrix_columns(&self) -> &[String] {
        self.matrix_columns.as_deref().unwrap_or_default()
    }
}
