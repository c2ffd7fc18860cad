use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use econ_swarm_models::context::DataSourceStatus;
use econ_swarm_models::economics::Indicator;
use rust_decimal::Decimal;

use crate::error::DataError;
use crate::source::EconomicDataSource;

/// In-process data source with fixed values.
///
/// `placeholder()` is the fallback used when no live source is configured;
/// `scripted()` stands in for a reachable live source in tests.
pub struct MockDataSource {
    values: HashMap<Indicator, Decimal>,
    failing: HashSet<Indicator>,
    provenance: DataSourceStatus,
    calls: AtomicUsize,
}

impl MockDataSource {
    /// Placeholder values, flagged as mock data.
    pub fn placeholder() -> Self {
        Self {
            values: Indicator::ALL
                .iter()
                .map(|&i| (i, i.mock_value()))
                .collect(),
            failing: HashSet::new(),
            provenance: DataSourceStatus::Mock,
            calls: AtomicUsize::new(0),
        }
    }

    /// Behaves like a reachable live source returning the given values.
    pub fn scripted(values: impl IntoIterator<Item = (Indicator, Decimal)>) -> Self {
        Self {
            values: values.into_iter().collect(),
            failing: HashSet::new(),
            provenance: DataSourceStatus::Live,
            calls: AtomicUsize::new(0),
        }
    }

    /// A live source that cannot be reached for any indicator.
    pub fn unreachable() -> Self {
        Self {
            values: HashMap::new(),
            failing: Indicator::ALL.iter().copied().collect(),
            provenance: DataSourceStatus::Live,
            calls: AtomicUsize::new(0),
        }
    }

    /// Make a single indicator fail.
    pub fn with_failure(mut self, indicator: Indicator) -> Self {
        self.failing.insert(indicator);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EconomicDataSource for MockDataSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn provenance(&self) -> DataSourceStatus {
        self.provenance
    }

    async fn fetch_indicator(&self, indicator: Indicator) -> Result<Decimal, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(&indicator) {
            return Err(DataError::Unavailable(format!(
                "connection refused fetching {indicator}"
            )));
        }

        self.values
            .get(&indicator)
            .copied()
            .ok_or_else(|| DataError::NoObservations(indicator.series_id().to_string()))
    }
}
