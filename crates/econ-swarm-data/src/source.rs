use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use econ_swarm_models::config::DataConfig;
use econ_swarm_models::context::DataSourceStatus;
use econ_swarm_models::economics::Indicator;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::DataError;
use crate::fred::FredClient;
use crate::memory::CachedDataSource;
use crate::mock::MockDataSource;

/// Source of economic indicator values. Mockable for testing.
#[async_trait]
pub trait EconomicDataSource: Send + Sync {
    fn name(&self) -> &str;

    /// Provenance recorded for values this source returns successfully.
    fn provenance(&self) -> DataSourceStatus;

    async fn fetch_indicator(&self, indicator: Indicator) -> Result<Decimal, DataError>;
}

/// Build the data source described by the configuration.
///
/// A live configuration without an API key falls back to placeholder data
/// rather than failing construction.
pub fn build_source(config: &DataConfig) -> Result<Arc<dyn EconomicDataSource>, DataError> {
    if !config.use_live {
        info!("Live data disabled, using placeholder indicators");
        return Ok(Arc::new(MockDataSource::placeholder()));
    }

    let Some(api_key) = config.api_key.as_deref().filter(|k| !k.is_empty()) else {
        warn!("No FRED API key configured, using placeholder indicators");
        return Ok(Arc::new(MockDataSource::placeholder()));
    };

    let fred = FredClient::new(
        &config.fred_base_url,
        api_key,
        Duration::from_secs(config.request_timeout_seconds),
    )?;

    Ok(Arc::new(CachedDataSource::new(
        Arc::new(fred),
        config.cache_max_capacity,
        Duration::from_secs(config.cache_ttl_seconds),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_live_data_uses_placeholders() {
        let config = DataConfig {
            use_live: false,
            ..DataConfig::default()
        };
        let source = build_source(&config).unwrap();
        assert_eq!(source.provenance(), DataSourceStatus::Mock);
    }

    #[test]
    fn missing_api_key_uses_placeholders() {
        let config = DataConfig::default();
        let source = build_source(&config).unwrap();
        assert_eq!(source.provenance(), DataSourceStatus::Mock);
    }

    #[test]
    fn api_key_selects_fred() {
        let config = DataConfig {
            api_key: Some("test-key".to_string()),
            ..DataConfig::default()
        };
        let source = build_source(&config).unwrap();
        assert_eq!(source.provenance(), DataSourceStatus::Live);
        assert_eq!(source.name(), "fred");
    }
}
