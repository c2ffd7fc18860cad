use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use econ_swarm_models::context::DataSourceStatus;
use econ_swarm_models::economics::Indicator;
use moka::future::Cache;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::DataError;
use crate::source::EconomicDataSource;

/// In-memory hot cache in front of a data source, backed by moka.
///
/// Only successful fetches are cached, so an outage is retried on the next
/// lookup. Entries are evicted after the TTL.
pub struct CachedDataSource {
    inner: Arc<dyn EconomicDataSource>,
    cache: Cache<Indicator, Decimal>,
}

impl CachedDataSource {
    pub fn new(inner: Arc<dyn EconomicDataSource>, max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn invalidate(&self, indicator: Indicator) {
        self.cache.invalidate(&indicator).await;
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl EconomicDataSource for CachedDataSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn provenance(&self) -> DataSourceStatus {
        self.inner.provenance()
    }

    async fn fetch_indicator(&self, indicator: Indicator) -> Result<Decimal, DataError> {
        if let Some(value) = self.cache.get(&indicator).await {
            debug!(series = indicator.series_id(), "Indicator cache hit");
            return Ok(value);
        }

        let value = self.inner.fetch_indicator(indicator).await?;
        self.cache.insert(indicator, value).await;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDataSource;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn second_fetch_is_served_from_cache() {
        let inner = Arc::new(MockDataSource::scripted([(Indicator::Gdp, dec!(2.1))]));
        let cached = CachedDataSource::new(inner.clone(), 100, Duration::from_secs(60));

        assert_eq!(cached.fetch_indicator(Indicator::Gdp).await.unwrap(), dec!(2.1));
        assert_eq!(cached.fetch_indicator(Indicator::Gdp).await.unwrap(), dec!(2.1));
        assert_eq!(inner.call_count(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let inner = Arc::new(MockDataSource::unreachable());
        let cached = CachedDataSource::new(inner.clone(), 100, Duration::from_secs(60));

        assert!(cached.fetch_indicator(Indicator::Gdp).await.is_err());
        assert!(cached.fetch_indicator(Indicator::Gdp).await.is_err());
        assert_eq!(inner.call_count(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let inner = Arc::new(MockDataSource::scripted([(Indicator::Gdp, dec!(2.1))]));
        let cached = CachedDataSource::new(inner.clone(), 100, Duration::from_secs(60));

        cached.fetch_indicator(Indicator::Gdp).await.unwrap();
        cached.invalidate(Indicator::Gdp).await;
        cached.fetch_indicator(Indicator::Gdp).await.unwrap();
        assert_eq!(inner.call_count(), 2);
    }

    #[tokio::test]
    async fn ttl_expiration() {
        let inner = Arc::new(MockDataSource::scripted([(Indicator::Gdp, dec!(2.1))]));
        let cached = CachedDataSource::new(inner.clone(), 100, Duration::from_millis(50));

        cached.fetch_indicator(Indicator::Gdp).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        cached.fetch_indicator(Indicator::Gdp).await.unwrap();
        assert_eq!(inner.call_count(), 2);
    }

    #[tokio::test]
    async fn provenance_follows_inner_source() {
        let cached = CachedDataSource::new(
            Arc::new(MockDataSource::placeholder()),
            10,
            Duration::from_secs(60),
        );
        assert_eq!(cached.provenance(), DataSourceStatus::Mock);
        assert_eq!(cached.name(), "mock");
    }
}
