use std::time::Duration;

use envconfig::Envconfig;
use log::debug;

#[derive(Envconfig, Clone)]
pub struct EngineConfig {
    #[envconfig(from = "RECORDS_PATH", default = "records.json")]
    pub records_path: String,

    /// How long a discovered column schema stays fresh
    #[envconfig(from = "SCHEMA_CACHE_TTL_SECS", default = "1800")]
    pub schema_cache_ttl_secs: u64,

    #[envconfig(from = "DATE_COLUMN", default = "date")]
    pub date_column: String,
}

impl EngineConfig {
    pub fn new() -> Result<Self, envconfig::Error> {
        let config = Self::init_from_env()?;
        debug!(
            "EngineConfig loaded: records_path={}, schema_cache_ttl_secs={}, date_column={}",
            config.records_path, config.schema_cache_ttl_secs, config.date_column
        );
        Ok(config)
    }

    pub fn schema_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.schema_cache_ttl_secs)
    }
}

#[derive(Envconfig, Clone)]
pub struct ChartRequestConfig {
    /// JSON file holding a chart configuration; a default is synthesized when unset
    #[envconfig(from = "CHART_CONFIG_PATH")]
    pub chart_config_path: Option<String>,

    #[envconfig(from = "VISUAL_TYPE", default = "bar")]
    pub visual_type: String,

    /// JSON file holding a list of slicer filters
    #[envconfig(from = "FILTERS_PATH")]
    pub filters_path: Option<String>,
}

impl ChartRequestConfig {
    pub fn new() -> Result<Self, envconfig::Error> {
        let config = Self::init_from_env()?;
        debug!(
            "ChartRequestConfig loaded: chart_config_path={:?}, visual_type={}, filters_path={:?}",
            config.chart_config_path, config.visual_type, config.filters_path
        );
        Ok(config)
    }
}
