//! Federal Reserve Economic Data (FRED) client.
//!
//! Only the latest observation of a series is needed, so the client asks for
//! a handful of observations in descending order and takes the first one that
//! carries a number (FRED reports missing values as `"."`).

use std::time::Duration;

use async_trait::async_trait;
use econ_swarm_models::context::DataSourceStatus;
use econ_swarm_models::economics::Indicator;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::error::DataError;
use crate::source::EconomicDataSource;

/// Observations requested per lookup; enough to skip a few missing values.
const OBSERVATION_LIMIT: u32 = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct Observation {
    pub date: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

pub struct FredClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FredClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, DataError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Latest numeric observation for a series.
    pub async fn latest_value(&self, series_id: &str) -> Result<(String, Decimal), DataError> {
        let url = format!("{}/series/observations", self.base_url);
        let limit = OBSERVATION_LIMIT.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DataError::Unavailable(format!(
                "FRED returned {} for {series_id}",
                response.status()
            )));
        }

        let data: ObservationsResponse = response.json().await?;
        latest_numeric(series_id, &data.observations)
    }
}

/// First observation whose value parses as a number.
fn latest_numeric(
    series_id: &str,
    observations: &[Observation],
) -> Result<(String, Decimal), DataError> {
    let obs = observations
        .iter()
        .find(|o| o.value.trim() != ".")
        .ok_or_else(|| DataError::NoObservations(series_id.to_string()))?;

    let value = obs
        .value
        .trim()
        .parse::<Decimal>()
        .map_err(|_| DataError::InvalidObservation {
            series: series_id.to_string(),
            value: obs.value.clone(),
        })?;

    Ok((obs.date.clone(), value))
}

#[async_trait]
impl EconomicDataSource for FredClient {
    fn name(&self) -> &str {
        "fred"
    }

    fn provenance(&self) -> DataSourceStatus {
        DataSourceStatus::Live
    }

    async fn fetch_indicator(&self, indicator: Indicator) -> Result<Decimal, DataError> {
        let (date, value) = self.latest_value(indicator.series_id()).await?;
        debug!(series = indicator.series_id(), %date, %value, "Fetched FRED observation");
        Ok(value)
    }
}
