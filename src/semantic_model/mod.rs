pub mod cache;
pub mod display;

pub use cache::SchemaCache;
pub use display::display_name;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data_store::{DataStoreError, Field, Record, Value, WarehouseType};
use crate::utils::text::locale_compare;

/// Columns never offered as measures or dimensions when classifying a sample record
pub const SAMPLE_DENY_LIST: [&str; 5] = ["id", "created_at", "date", "start_date", "end_date"];

/// Columns never offered when an explicit field list is available.
/// Date and timestamp typed columns are dropped on top of these.
pub const FIELD_DENY_LIST: [&str; 2] = ["id", "created_at"];

/// Measures and dimensions discovered for one data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    pub measures: Vec<String>,
    pub dimensions: Vec<String>,
    pub all_columns: Vec<String>,
}

impl ColumnSchema {
    /// A schema is usable for default chart configs once it offers both kinds of column
    pub fn is_ready(&self) -> bool {
        !self.measures.is_empty() && !self.dimensions.is_empty()
    }
}

/// What a schema source can tell us about its columns
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaSample {
    /// One representative record; types are observed from its values
    Record(Record),
    /// Declared `{name, type}` pairs from a schema endpoint
    Fields(Vec<Field>),
}

/// Supplies the raw material for column classification
#[async_trait]
pub trait SchemaSource: Send + Sync {
    async fn schema_sample(&self) -> Result<SchemaSample, DataStoreError>;
}

#[derive(Error, Debug)]
pub enum SemanticModelError {
    #[error("Schema source failed: {0}")]
    Source(#[from] DataStoreError),

    #[error("Schema source returned no columns")]
    EmptySchema,
}

/// Classify with the default deny-list for the kind of sample given
pub fn classify(sample: &SchemaSample) -> ColumnSchema {
    match sample {
        SchemaSample::Record(record) => classify_record(record, &SAMPLE_DENY_LIST),
        SchemaSample::Fields(fields) => classify_fields(fields, &FIELD_DENY_LIST),
    }
}

/// Numbers become measures, text becomes dimensions. Null and boolean
/// cells are neither, but are still listed in `all_columns`.
pub fn classify_record(record: &Record, deny_list: &[&str]) -> ColumnSchema {
    let mut schema = ColumnSchema::default();
    for (column, value) in record {
        if deny_list.contains(&column.as_str()) {
            continue;
        }
        schema.all_columns.push(column.clone());
        match value {
            Value::Int(_) | Value::Float(_) => schema.measures.push(column.clone()),
            Value::String(_) => schema.dimensions.push(column.clone()),
            Value::Null | Value::Boolean(_) => {}
        }
    }
    sort_by_display_name(schema)
}

/// Declared numeric types become measures; every other non-temporal type,
/// including ones we do not recognise, becomes a dimension.
pub fn classify_fields(fields: &[Field], deny_list: &[&str]) -> ColumnSchema {
    let mut schema = ColumnSchema::default();
    for field in fields {
        if deny_list
            .iter()
            .any(|denied| denied.eq_ignore_ascii_case(&field.name))
        {
            continue;
        }
        let data_type = field.data_type.parse::<WarehouseType>().ok();
        if data_type.is_some_and(|t| t.is_temporal()) {
            continue;
        }
        schema.all_columns.push(field.name.clone());
        if data_type.is_some_and(|t| t.is_numeric()) {
            schema.measures.push(field.name.clone());
        } else {
            schema.dimensions.push(field.name.clone());
        }
    }
    sort_by_display_name(schema)
}

fn sort_by_display_name(mut schema: ColumnSchema) -> ColumnSchema {
    let by_display = |a: &String, b: &String| locale_compare(&display_name(a), &display_name(b));
    schema.measures.sort_by(by_display);
    schema.measures.dedup();
    schema.dimensions.sort_by(by_display);
    schema.dimensions.dedup();
    schema
}

/// Fetch a sample from `source` and classify it
pub async fn discover<S>(source: &S) -> Result<ColumnSchema, SemanticModelError>
where
    S: SchemaSource + ?Sized,
{
    let sample = source.schema_sample().await?;
    let schema = classify(&sample);
    if schema.all_columns.is_empty() {
        return Err(SemanticModelError::EmptySchema);
    }
    Ok(schema)
}
