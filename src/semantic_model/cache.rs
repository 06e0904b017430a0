use log::debug;
use std::time::{Duration, Instant};

use super::{discover, ColumnSchema, SchemaSource, SemanticModelError};

/// Holds the last discovered [`ColumnSchema`] of one source for `ttl`.
#[derive(Debug, Clone)]
pub struct SchemaCache {
    ttl: Duration,
    entry: Option<(Instant, ColumnSchema)>,
}

impl SchemaCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Cached schema if it is still fresh at `now`
    pub fn get_at(&self, now: Instant) -> Option<&ColumnSchema> {
        self.entry
            .as_ref()
            .filter(|(stored_at, _)| now.saturating_duration_since(*stored_at) < self.ttl)
            .map(|(_, schema)| schema)
    }

    pub fn get(&self) -> Option<&ColumnSchema> {
        self.get_at(Instant::now())
    }

    pub fn store(&mut self, schema: ColumnSchema) {
        self.entry = Some((Instant::now(), schema));
    }

    /// Drop the cached schema, e.g. after the bound source changed
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub async fn get_or_discover<S>(&mut self, source: &S) -> Result<ColumnSchema, SemanticModelError>
    where
        S: SchemaSource + ?Sized,
    {
        if let Some(schema) = self.get() {
            return Ok(schema.clone());
        }
        debug!("Schema cache miss, discovering columns");
        let schema = discover(source).await?;
        self.store(schema.clone());
        Ok(schema)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data_store::LocalDataStore;

    #[test]
    fn test_entry_expires_after_ttl() {
        let mut cache = SchemaCache::new(Duration::from_secs(60));
        assert!(cache.get().is_none());

        cache.store(ColumnSchema::default());
        let now = Instant::now();
        assert!(cache.get_at(now).is_some());
        assert!(cache.get_at(now + Duration::from_secs(61)).is_none());
    }

    #[test]
    fn test_invalidate() {
        let mut cache = SchemaCache::new(Duration::from_secs(60));
        cache.store(ColumnSchema::default());
        cache.invalidate();
        assert!(cache.get().is_none());
    }

    #[test_log::test(tokio::test)]
    async fn test_get_or_discover_fills_cache() {
        let mut cache = SchemaCache::new(Duration::from_secs(1800));
        let schema = cache
            .get_or_discover(&LocalDataStore::mock())
            .await
            .unwrap();
        assert_eq!(schema.dimensions, vec!["campaign_name", "platform"]);
        assert_eq!(cache.get(), Some(&schema));
    }

    #[test_log::test(tokio::test)]
    async fn test_empty_source_is_an_error() {
        let mut cache = SchemaCache::new(Duration::from_secs(1800));
        let result = cache
            .get_or_discover(&LocalDataStore::from_records(vec![]))
            .await;
        assert!(matches!(result, Err(SemanticModelError::EmptySchema)));
        assert!(cache.get().is_none());
    }
}
