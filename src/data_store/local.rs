use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;

use super::{decode_row, order_most_recent_first, DataStore, DataStoreError, Field, Record};
use crate::semantic_model::{SchemaSample, SchemaSource};

/// Records held in memory, loaded from a JSON file or handed in directly.
#[derive(Debug, Clone, Default)]
pub struct LocalDataStore {
    records: Vec<Record>,
    fields: Option<Vec<Field>>,
}

/// Accepted file layouts: a plain array of records, or a warehouse export
/// with a positional schema and rows of raw textual cells.
#[derive(Deserialize)]
#[serde(untagged)]
enum LocalFile {
    Records(Vec<Record>),
    Warehouse {
        schema: Vec<Field>,
        rows: Vec<Vec<Option<String>>>,
    },
}

impl LocalDataStore {
    /// Records are kept in the order given.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            fields: None,
        }
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Parse a JSON document and order its records most recent first
    pub fn from_json(json: &str, date_column: &str) -> Result<Self, DataStoreError> {
        let mut store = match serde_json::from_str::<LocalFile>(json)? {
            LocalFile::Records(records) => Self::from_records(records),
            LocalFile::Warehouse { schema, rows } => {
                let records = rows.iter().map(|row| decode_row(&schema, row)).collect();
                Self::from_records(records).with_fields(schema)
            }
        };
        order_most_recent_first(&mut store.records, date_column);
        debug!(
            "Loaded {} records (explicit schema: {})",
            store.records.len(),
            store.fields.is_some()
        );
        Ok(store)
    }

    pub async fn from_path(path: &str, date_column: &str) -> Result<Self, DataStoreError> {
        info!("Loading records from {}", path);
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json, date_column)
    }

    pub fn mock() -> Self {
        let json = r#"[
            {"id": "1", "campaign_name": "Spring Sale", "platform": "facebook", "clicks": 120, "spend": 40.5, "ctr": 1.2, "date": "2024-03-15"},
            {"id": "2", "campaign_name": "Spring Sale", "platform": "instagram", "clicks": 80, "spend": 22.0, "ctr": 0.8, "date": "2024-03-14"},
            {"id": "3", "campaign_name": "Brand Awareness", "platform": "facebook", "clicks": 45, "spend": 30.0, "ctr": 0.5, "date": "2024-02-02"},
            {"id": "4", "campaign_name": "Retargeting", "platform": "instagram", "clicks": 200, "spend": 55.25, "ctr": 2.4, "date": "2024-01-20"}
        ]"#;
        let records = serde_json::from_str(json).unwrap_or_default();
        Self::from_records(records)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

#[async_trait]
impl DataStore for LocalDataStore {
    async fn fetch_records(&self) -> Result<Vec<Record>, DataStoreError> {
        Ok(self.records.clone())
    }
}

#[async_trait]
impl SchemaSource for LocalDataStore {
    async fn schema_sample(&self) -> Result<SchemaSample, DataStoreError> {
        if let Some(fields) = &self.fields {
            return Ok(SchemaSample::Fields(fields.clone()));
        }
        Ok(SchemaSample::Record(
            self.records.first().cloned().unwrap_or_default(),
        ))
    }
}
