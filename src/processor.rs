use log::{debug, info};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::aggregation::{Aggregator, DataPoint};
use crate::chart::ChartSlot;
use crate::config::EngineConfig;
use crate::data_store::{DataStore, DataStoreError, Record, Value};
use crate::filter::{apply_filters, unique_values, Filter};
use crate::semantic_model::{ColumnSchema, SchemaCache, SchemaSource, SemanticModelError};

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Data store error: {0}")]
    DataStore(#[from] DataStoreError),

    #[error("Semantic model error: {0}")]
    SemanticModel(#[from] SemanticModelError),
}

/// Series computed for one chart of a dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRender {
    pub chart_id: String,
    pub points: Vec<DataPoint>,
}

/// Ties the record and schema sources to the aggregation engine.
///
/// Each call fetches the records once and reuses them for every chart.
pub struct DashboardProcessor<D, S> {
    data_store: D,
    schema_source: S,
    schema_cache: Mutex<SchemaCache>,
    aggregator: Aggregator,
}

impl<D, S> DashboardProcessor<D, S>
where
    D: DataStore,
    S: SchemaSource,
{
    pub fn new(data_store: D, schema_source: S, config: &EngineConfig) -> Self {
        Self {
            data_store,
            schema_source,
            schema_cache: Mutex::new(SchemaCache::new(config.schema_cache_ttl())),
            aggregator: Aggregator::with_date_column(&config.date_column),
        }
    }

    /// Column classification of the bound source, cached for the configured TTL
    pub async fn schema(&self) -> Result<ColumnSchema, ProcessorError> {
        let mut cache = self.schema_cache.lock().await;
        Ok(cache.get_or_discover(&self.schema_source).await?)
    }

    /// Forget the cached schema, e.g. after the bound source changed
    pub async fn invalidate_schema(&self) {
        info!("Invalidating cached schema");
        self.schema_cache.lock().await.invalidate();
    }

    async fn filtered_records(&self, filters: &[Filter]) -> Result<Vec<Record>, ProcessorError> {
        let records = self.data_store.fetch_records().await?;
        if filters.is_empty() {
            return Ok(records);
        }
        let filtered = apply_filters(&records, filters);
        debug!(
            "{} of {} records kept by {} filters",
            filtered.len(),
            records.len(),
            filters.len()
        );
        Ok(filtered)
    }

    /// Editor pass: charts without a config receive a synthesized default
    /// once the schema is ready, then every chart is aggregated.
    ///
    /// A schema that cannot be discovered yet leaves unconfigured charts
    /// empty instead of failing the whole dashboard.
    pub async fn render_charts(
        &self,
        charts: &mut [ChartSlot],
        filters: &[Filter],
    ) -> Result<Vec<ChartRender>, ProcessorError> {
        if charts.iter().any(|chart| chart.config.is_none()) {
            match self.schema().await {
                Ok(schema) => {
                    for chart in charts.iter_mut() {
                        chart.ensure_config(&schema);
                    }
                }
                Err(ProcessorError::SemanticModel(SemanticModelError::EmptySchema)) => {
                    debug!("Schema not ready, deferring default chart configs");
                }
                Err(e) => return Err(e),
            }
        }
        self.view_charts(charts, filters).await
    }

    /// Read-only pass: charts are aggregated with the config they carry and
    /// never receive defaults.
    pub async fn view_charts(
        &self,
        charts: &[ChartSlot],
        filters: &[Filter],
    ) -> Result<Vec<ChartRender>, ProcessorError> {
        let records = self.filtered_records(filters).await?;
        Ok(charts
            .iter()
            .map(|chart| ChartRender {
                chart_id: chart.id.clone(),
                points: match &chart.config {
                    Some(config) => self.aggregator.aggregate(&records, config, &chart.visual_type),
                    None => vec![],
                },
            })
            .collect())
    }

    /// Choices for a dropdown or list slicer bound to `field`
    pub async fn slicer_values(&self, field: &str) -> Result<Vec<Value>, ProcessorError> {
        let records = self.data_store.fetch_records().await?;
        Ok(unique_values(&records, field))
    }
}
