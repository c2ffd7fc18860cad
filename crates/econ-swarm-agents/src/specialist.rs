use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use econ_swarm_data::{exposure_for, EconomicDataSource};
use econ_swarm_models::{AgentRole, ContextField, ContextStore, DataSourceStatus, Indicator, ToolRef};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::AgentError;
use crate::factory::RoleProfile;
use crate::model::LanguageModel;
use crate::orchestrator::compose_recommendation;
use crate::prompts::company_impact_query;
use crate::tools::{assess_risk, extract_tickers};

/// What a stage reports back to the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartialResult {
    pub role: AgentRole,
    pub summary: String,
    pub fields_written: Vec<ContextField>,
}

/// Trait for specialist agents. Mockable for testing.
#[async_trait]
pub trait SpecialistAgent: Send + Sync {
    fn role(&self) -> AgentRole;
    fn name(&self) -> &str;

    /// Run this role's step for `query`, writing only the fields it owns.
    async fn act(
        &self,
        query: &str,
        store: &mut ContextStore,
    ) -> Result<PartialResult, AgentError>;
}

/// A role-bound agent. Behaviour is selected by the profile's role.
pub struct Specialist {
    profile: Arc<RoleProfile>,
    model: Arc<dyn LanguageModel>,
    data: Option<Arc<dyn EconomicDataSource>>,
}

impl Specialist {
    pub fn new(
        profile: Arc<RoleProfile>,
        model: Arc<dyn LanguageModel>,
        data: Option<Arc<dyn EconomicDataSource>>,
    ) -> Self {
        Self {
            profile,
            model,
            data,
        }
    }

    pub fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    pub fn has_data_source(&self) -> bool {
        self.data.is_some()
    }

    fn role_tools(&self) -> Vec<ToolRef> {
        self.profile.tool_list()
    }

    async fn ask(&self, query: &str, store: &ContextStore) -> Result<String, AgentError> {
        let text = self
            .model
            .invoke(
                self.profile.instructions.as_deref().unwrap_or_default(),
                &self.role_tools(),
                query,
                store.get(),
            )
            .await?;
        Ok(text.trim().to_string())
    }

    async fn collect(
        &self,
        query: &str,
        store: &mut ContextStore,
    ) -> Result<PartialResult, AgentError> {
        let role = self.profile.role;
        let data = self.data.as_ref().ok_or_else(|| {
            AgentError::Configuration(format!(
                "{role} has no access to {}",
                ToolRef::EconomicIndicator.name()
            ))
        })?;

        let mut sources = BTreeMap::new();
        for indicator in Indicator::ALL {
            let (value, status) = match data.fetch_indicator(indicator).await {
                Ok(value) => (value, data.provenance()),
                Err(err) => {
                    let err = AgentError::from(err);
                    warn!(
                        series = indicator.series_id(),
                        source = data.name(),
                        error = %err,
                        "Indicator fetch failed, substituting placeholder"
                    );
                    (indicator.mock_value(), DataSourceStatus::Mock)
                }
            };
            debug!(series = indicator.series_id(), %value, ?status, "Indicator collected");
            store.set_indicator(role, indicator, value)?;
            sources.insert(indicator, status);
        }

        let overall = if sources.values().all(|s| *s == DataSourceStatus::Live) {
            DataSourceStatus::Live
        } else {
            DataSourceStatus::Mock
        };
        store.set_indicator_sources(role, sources)?;
        store.set_data_source_status(role, overall)?;
        info!(role = %role, data_source = ?overall, "Indicators written");

        let summary = self.ask(query, store).await?;

        Ok(PartialResult {
            role,
            summary,
            fields_written: vec![
                ContextField::Gdp,
                ContextField::UnemploymentRate,
                ContextField::InterestRate,
                ContextField::IndicatorSources,
                ContextField::DataSourceStatus,
            ],
        })
    }

    async fn analyze(
        &self,
        query: &str,
        store: &mut ContextStore,
    ) -> Result<PartialResult, AgentError> {
        let role = self.profile.role;
        let tickers = extract_tickers(query);
        debug!(role = %role, ?tickers, "Tickers extracted");

        let exposures: BTreeMap<String, _> = tickers
            .iter()
            .filter_map(|t| exposure_for(t).map(|e| (t.clone(), e)))
            .collect();
        store.set_company_exposures(role, exposures)?;

        let mut impacts = BTreeMap::new();
        for ticker in &tickers {
            let exposure = store
                .get()
                .company_exposures
                .as_ref()
                .and_then(|m| m.get(ticker));
            let ticker_query = company_impact_query(query, ticker, exposure)?;
            let impact = self.ask(&ticker_query, store).await?;
            impacts.insert(ticker.clone(), impact);
        }
        store.set_company_impacts(role, impacts)?;

        let summary = if tickers.is_empty() {
            "No companies named in the query".to_string()
        } else {
            format!("Assessed {} companies: {}", tickers.len(), tickers.join(", "))
        };

        Ok(PartialResult {
            role,
            summary,
            fields_written: vec![ContextField::CompanyExposures, ContextField::CompanyImpacts],
        })
    }

    async fn assess(
        &self,
        query: &str,
        store: &mut ContextStore,
    ) -> Result<PartialResult, AgentError> {
        let role = self.profile.role;
        let assessment = assess_risk(store.get());
        info!(
            role = %role,
            risk_level = %assessment.risk_level,
            risk_score = assessment.risk_score,
            systemic = ?assessment.systemic.level,
            "Risk assessed"
        );
        let summary = format!(
            "Risk level {} (score {}), systemic risk {:?}",
            assessment.risk_level, assessment.risk_score, assessment.systemic.level
        );
        store.set_risk_assessment(role, assessment)?;

        let notes = self.ask(query, store).await?;
        store.set_risk_notes(role, notes)?;

        Ok(PartialResult {
            role,
            summary,
            fields_written: vec![ContextField::RiskAssessment, ContextField::RiskNotes],
        })
    }

    fn coordinate(&self, store: &ContextStore) -> Result<PartialResult, AgentError> {
        Ok(PartialResult {
            role: self.profile.role,
            summary: compose_recommendation(store.get())?,
            fields_written: Vec::new(),
        })
    }
}

#[async_trait]
impl SpecialistAgent for Specialist {
    fn role(&self) -> AgentRole {
        self.profile.role
    }

    fn name(&self) -> &str {
        self.profile.role.name()
    }

    async fn act(
        &self,
        query: &str,
        store: &mut ContextStore,
    ) -> Result<PartialResult, AgentError> {
        match self.profile.role {
            AgentRole::DataCollector => self.collect(query, store).await,
            AgentRole::Analyst => self.analyze(query, store).await,
            AgentRole::RiskAssessor => self.assess(query, store).await,
            AgentRole::Coordinator => self.coordinate(store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedModel;
    use econ_swarm_data::MockDataSource;
    use rust_decimal_macros::dec;

    fn specialist(
        role: AgentRole,
        model: Arc<ScriptedModel>,
        data: Option<Arc<dyn EconomicDataSource>>,
    ) -> Specialist {
        Specialist::new(Arc::new(RoleProfile::new(role, None)), model, data)
    }

    fn live_source() -> Arc<dyn EconomicDataSource> {
        Arc::new(MockDataSource::scripted([
            (Indicator::Gdp, dec!(2.1)),
            (Indicator::UnemploymentRate, dec!(3.8)),
            (Indicator::InterestRate, dec!(5.25)),
        ]))
    }

    #[tokio::test]
    async fn collector_writes_live_indicators() {
        let model = Arc::new(ScriptedModel::new());
        let collector = specialist(AgentRole::DataCollector, model, Some(live_source()));
        let mut store = ContextStore::new();

        let result = collector.act("How is the economy?", &mut store).await.unwrap();

        let ctx = store.get();
        assert_eq!(ctx.gdp, Some(dec!(2.1)));
        assert_eq!(ctx.unemployment_rate, Some(dec!(3.8)));
        assert_eq!(ctx.interest_rate, Some(dec!(5.25)));
        assert_eq!(ctx.data_source_status, Some(DataSourceStatus::Live));
        assert_eq!(
            ctx.fields_set(),
            vec![
                ContextField::Gdp,
                ContextField::UnemploymentRate,
                ContextField::InterestRate,
                ContextField::DataSourceStatus,
                ContextField::IndicatorSources,
            ]
        );
        assert_eq!(result.fields_written.len(), 5);
        assert!(!result.summary.is_empty());
    }

    #[tokio::test]
    async fn collector_substitutes_placeholder_per_indicator() {
        let source: Arc<dyn EconomicDataSource> = Arc::new(
            MockDataSource::scripted([
                (Indicator::Gdp, dec!(2.1)),
                (Indicator::UnemploymentRate, dec!(3.8)),
                (Indicator::InterestRate, dec!(5.25)),
            ])
            .with_failure(Indicator::InterestRate),
        );
        let collector = specialist(
            AgentRole::DataCollector,
            Arc::new(ScriptedModel::new()),
            Some(source),
        );
        let mut store = ContextStore::new();

        collector.act("rates?", &mut store).await.unwrap();

        let ctx = store.get();
        assert_eq!(ctx.gdp, Some(dec!(2.1)));
        assert_eq!(ctx.interest_rate, Some(dec!(5.33)));
        assert_eq!(ctx.data_source_status, Some(DataSourceStatus::Mock));
        let sources = ctx.indicator_sources.as_ref().unwrap();
        assert_eq!(sources[&Indicator::Gdp], DataSourceStatus::Live);
        assert_eq!(sources[&Indicator::InterestRate], DataSourceStatus::Mock);
    }

    #[tokio::test]
    async fn collector_without_data_tool_is_misconfigured() {
        let collector = specialist(
            AgentRole::DataCollector,
            Arc::new(ScriptedModel::new()),
            None,
        );
        let mut store = ContextStore::new();
        assert!(matches!(
            collector.act("q", &mut store).await,
            Err(AgentError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn analyst_impacts_match_tickers() {
        let model = Arc::new(ScriptedModel::new());
        let analyst = specialist(AgentRole::Analyst, model.clone(), None);
        let mut store = ContextStore::new();

        analyst
            .act("Analyze AAPL and $ZZZZ under GDP stress", &mut store)
            .await
            .unwrap();

        let ctx = store.get();
        let impacts = ctx.company_impacts.as_ref().unwrap();
        assert_eq!(impacts.keys().collect::<Vec<_>>(), vec!["AAPL", "ZZZZ"]);
        assert!(impacts["AAPL"].contains("AAPL"));
        // Only known tickers carry an exposure profile.
        let exposures = ctx.company_exposures.as_ref().unwrap();
        assert_eq!(exposures.keys().collect::<Vec<_>>(), vec!["AAPL"]);
        assert_eq!(model.calls_for(AgentRole::Analyst), 2);
    }

    #[tokio::test]
    async fn analyst_with_no_tickers_writes_empty_maps() {
        let model = Arc::new(ScriptedModel::new());
        let analyst = specialist(AgentRole::Analyst, model.clone(), None);
        let mut store = ContextStore::new();

        let result = analyst.act("How is the economy?", &mut store).await.unwrap();

        assert!(store.get().company_impacts.as_ref().unwrap().is_empty());
        assert_eq!(result.summary, "No companies named in the query");
        assert_eq!(model.calls_for(AgentRole::Analyst), 0);
    }

    #[tokio::test]
    async fn model_failure_is_upstream_unavailable() {
        let model = Arc::new(ScriptedModel::new().failing_at(AgentRole::RiskAssessor));
        let assessor = specialist(AgentRole::RiskAssessor, model, None);
        let mut store = ContextStore::new();

        let err = assessor.act("q", &mut store).await.unwrap_err();
        assert!(matches!(err, AgentError::UpstreamUnavailable(_)));
        // The computed assessment was written before the model call.
        assert!(store.get().risk_assessment.is_some());
        assert!(store.get().risk_notes.is_none());
    }

    #[tokio::test]
    async fn coordinator_needs_completed_context() {
        let coordinator = specialist(
            AgentRole::Coordinator,
            Arc::new(ScriptedModel::new()),
            None,
        );
        let mut store = ContextStore::new();
        assert!(matches!(
            coordinator.act("q", &mut store).await,
            Err(AgentError::IncompleteContext(_))
        ));
    }
}
