mod local;
mod warehouse_type;

pub use local::LocalDataStore;
pub use warehouse_type::{decode_row, WarehouseType};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

use crate::time_bucket::parse_date;

/// One row of campaign performance data, keyed by column name.
///
/// Column order is the order the source delivered them in.
pub type Record = IndexMap<String, Value>;

/// A single cell of a [`Record`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Numeric view of the cell. Text, null and non-finite floats are absent.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) if f.is_finite() => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Null and empty text carry no label.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Text used when the cell becomes part of a category or group key
    pub fn to_label(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Boolean(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

/// Column metadata as reported by a warehouse schema endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

impl Field {
    pub fn new(name: &str, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
        }
    }
}

/// DataStore hands the engine an already materialized set of records.
///
/// Ordering contract: records must be returned most recent first. The
/// `last` card calculation and the table visual both read records in the
/// order returned here and never re-sort them. Sources that cannot
/// guarantee this should pass their rows through
/// [`order_most_recent_first`] before returning them.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Fetch every record of the bound source
    async fn fetch_records(&self) -> Result<Vec<Record>, DataStoreError>;
}

#[derive(Error, Debug)]
pub enum DataStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown warehouse type: {0}")]
    UnknownType(String),
}

/// Stable sort putting the newest `date_column` value first.
///
/// Records whose date is missing or unparsable keep their relative order
/// and go after every dated record.
pub fn order_most_recent_first(records: &mut [Record], date_column: &str) {
    records.sort_by(|a, b| {
        let a = a.get(date_column).and_then(Value::as_str).and_then(parse_date);
        let b = b.get(date_column).and_then(Value::as_str).and_then(parse_date);
        match (a, b) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    fn dated(name: &str, date: Option<&str>) -> Record {
        let mut record = Record::new();
        record.insert("campaign_name".to_string(), name.into());
        record.insert(
            "date".to_string(),
            date.map(Value::from).unwrap_or(Value::Null),
        );
        record
    }

    #[test]
    fn test_records_deserialize_preserving_order() {
        let json = r#"{"campaign_name": "A", "clicks": 10, "ctr": 1.5, "date": null}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        let columns: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(columns, vec!["campaign_name", "clicks", "ctr", "date"]);
        assert_eq!(record["clicks"], Value::Int(10));
        assert_eq!(record["ctr"], Value::Float(1.5));
        assert_eq!(record["date"], Value::Null);
    }

    #[rstest]
    #[case::int(Value::Int(3), Some(3.0))]
    #[case::float(Value::Float(2.5), Some(2.5))]
    #[case::nan(Value::Float(f64::NAN), None)]
    #[case::text(Value::String("7".to_string()), None)]
    #[case::null(Value::Null, None)]
    fn test_as_number(#[case] value: Value, #[case] expected: Option<f64>) {
        assert_eq!(value.as_number(), expected);
    }

    #[rstest]
    #[case::whole_float(Value::Float(2.0), "2")]
    #[case::fraction(Value::Float(2.25), "2.25")]
    #[case::int(Value::Int(-4), "-4")]
    #[case::boolean(Value::Boolean(true), "true")]
    fn test_to_label(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(value.to_label(), expected);
    }

    #[test]
    fn test_order_most_recent_first() {
        let mut records = vec![
            dated("old", Some("2024-01-01")),
            dated("undated", None),
            dated("new", Some("2024-03-01")),
            dated("mid", Some("2024-02-01T10:00:00Z")),
        ];
        order_most_recent_first(&mut records, "date");
        let names: Vec<String> = records
            .iter()
            .map(|r| r["campaign_name"].to_label())
            .collect();
        assert_eq!(names, vec!["new", "mid", "old", "undated"]);
    }
}
