use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data_store::{Record, Value};
use crate::time_bucket::parse_date;

/// A slicer restriction on one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    #[serde(flatten)]
    pub operator: FilterOperator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operator", rename_all = "kebab-case")]
pub enum FilterOperator {
    /// Keep records whose cell equals any of `values`
    Equals { values: Vec<Value> },
    /// Inclusive numeric bounds; a missing bound is open
    NumericRange { min: Option<f64>, max: Option<f64> },
    /// Inclusive calendar date bounds; a missing bound is open
    DateRange {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl Filter {
    pub fn equals(field: &str, values: Vec<Value>) -> Self {
        Self {
            field: field.to_string(),
            operator: FilterOperator::Equals { values },
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        let cell = record.get(&self.field);
        match &self.operator {
            FilterOperator::Equals { values } => {
                cell.is_some_and(|cell| values.iter().any(|v| same_value(cell, v)))
            }
            FilterOperator::NumericRange { min, max } => cell
                .and_then(Value::as_number)
                .is_some_and(|n| min.map_or(true, |min| n >= min) && max.map_or(true, |max| n <= max)),
            FilterOperator::DateRange { from, to } => cell
                .and_then(Value::as_str)
                .and_then(parse_date)
                .is_some_and(|d| from.map_or(true, |from| d >= from) && to.map_or(true, |to| d <= to)),
        }
    }
}

/// Numbers compare numerically so `7` matches `7.0`; everything else by value
fn same_value(cell: &Value, wanted: &Value) -> bool {
    match (cell.as_number(), wanted.as_number()) {
        (Some(a), Some(b)) => a == b,
        _ => cell == wanted,
    }
}

/// Records matching every filter, in input order
pub fn apply_filters(records: &[Record], filters: &[Filter]) -> Vec<Record> {
    records
        .iter()
        .filter(|record| filters.iter().all(|f| f.matches(record)))
        .cloned()
        .collect()
}

/// Distinct non-null values of `field` in first-seen order, for dropdown
/// and list slicers
pub fn unique_values(records: &[Record], field: &str) -> Vec<Value> {
    let mut seen: IndexMap<(u8, String), Value> = IndexMap::new();
    for value in records.iter().filter_map(|r| r.get(field)) {
        let kind = match value {
            Value::Null => continue,
            Value::Boolean(_) => 0,
            Value::Int(_) | Value::Float(_) => 1,
            Value::String(_) => 2,
        };
        seen.entry((kind, value.to_label()))
            .or_insert_with(|| value.clone());
    }
    seen.into_values().collect()
}
