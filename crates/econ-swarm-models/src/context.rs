//! The shared context carried across one handoff run.
//!
//! `SharedContext` is an immutable snapshot. Every `with_*` transition returns
//! a new snapshot and refuses to touch a field that is already set or that
//! belongs to another role. `ContextStore` holds the current snapshot for the
//! duration of a single query.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::economics::{CompanyExposure, Indicator, IndicatorReading, RiskAssessment, RiskLevel};
use crate::role::AgentRole;

/// Provenance of the economic indicators.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSourceStatus {
    Live,
    Mock,
}

/// Names every write-once field of the context.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContextField {
    Gdp,
    UnemploymentRate,
    InterestRate,
    DataSourceStatus,
    IndicatorSources,
    CompanyImpacts,
    CompanyExposures,
    RiskNotes,
    RiskAssessment,
}

impl ContextField {
    pub fn owner(&self) -> AgentRole {
        match self {
            ContextField::Gdp
            | ContextField::UnemploymentRate
            | ContextField::InterestRate
            | ContextField::DataSourceStatus
            | ContextField::IndicatorSources => AgentRole::DataCollector,
            ContextField::CompanyImpacts | ContextField::CompanyExposures => AgentRole::Analyst,
            ContextField::RiskNotes | ContextField::RiskAssessment => AgentRole::RiskAssessor,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContextField::Gdp => "gdp",
            ContextField::UnemploymentRate => "unemployment_rate",
            ContextField::InterestRate => "interest_rate",
            ContextField::DataSourceStatus => "data_source_status",
            ContextField::IndicatorSources => "indicator_sources",
            ContextField::CompanyImpacts => "company_impacts",
            ContextField::CompanyExposures => "company_exposures",
            ContextField::RiskNotes => "risk_notes",
            ContextField::RiskAssessment => "risk_assessment",
        }
    }
}

impl fmt::Display for ContextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A stage tried to write a field it may not write.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateConflict {
    #[error("field {field} is already set; {writer} may not overwrite it")]
    AlreadySet {
        field: ContextField,
        writer: AgentRole,
    },

    #[error("field {field} is owned by {owner}, not {writer}")]
    NotOwner {
        field: ContextField,
        owner: AgentRole,
        writer: AgentRole,
    },
}

fn guard(field: ContextField, writer: AgentRole, already_set: bool) -> Result<(), StateConflict> {
    let owner = field.owner();
    if owner != writer {
        return Err(StateConflict::NotOwner {
            field,
            owner,
            writer,
        });
    }
    if already_set {
        return Err(StateConflict::AlreadySet { field, writer });
    }
    Ok(())
}

/// Cross-stage findings for one query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SharedContext {
    pub gdp: Option<Decimal>,
    pub unemployment_rate: Option<Decimal>,
    pub interest_rate: Option<Decimal>,
    pub data_source_status: Option<DataSourceStatus>,
    /// Per-indicator provenance; some indicators may be live while others are mocked.
    pub indicator_sources: Option<BTreeMap<Indicator, DataSourceStatus>>,
    /// Ticker -> free-text impact assessment.
    pub company_impacts: Option<BTreeMap<String, String>>,
    pub company_exposures: Option<BTreeMap<String, CompanyExposure>>,
    pub risk_notes: Option<String>,
    pub risk_assessment: Option<RiskAssessment>,
}

impl SharedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gdp(&self, writer: AgentRole, value: Decimal) -> Result<Self, StateConflict> {
        guard(ContextField::Gdp, writer, self.gdp.is_some())?;
        Ok(Self {
            gdp: Some(value),
            ..self.clone()
        })
    }

    pub fn with_unemployment_rate(
        &self,
        writer: AgentRole,
        value: Decimal,
    ) -> Result<Self, StateConflict> {
        guard(
            ContextField::UnemploymentRate,
            writer,
            self.unemployment_rate.is_some(),
        )?;
        Ok(Self {
            unemployment_rate: Some(value),
            ..self.clone()
        })
    }

    pub fn with_interest_rate(
        &self,
        writer: AgentRole,
        value: Decimal,
    ) -> Result<Self, StateConflict> {
        guard(
            ContextField::InterestRate,
            writer,
            self.interest_rate.is_some(),
        )?;
        Ok(Self {
            interest_rate: Some(value),
            ..self.clone()
        })
    }

    pub fn with_data_source_status(
        &self,
        writer: AgentRole,
        status: DataSourceStatus,
    ) -> Result<Self, StateConflict> {
        guard(
            ContextField::DataSourceStatus,
            writer,
            self.data_source_status.is_some(),
        )?;
        Ok(Self {
            data_source_status: Some(status),
            ..self.clone()
        })
    }

    pub fn with_indicator_sources(
        &self,
        writer: AgentRole,
        sources: BTreeMap<Indicator, DataSourceStatus>,
    ) -> Result<Self, StateConflict> {
        guard(
            ContextField::IndicatorSources,
            writer,
            self.indicator_sources.is_some(),
        )?;
        Ok(Self {
            indicator_sources: Some(sources),
            ..self.clone()
        })
    }

    pub fn with_company_impacts(
        &self,
        writer: AgentRole,
        impacts: BTreeMap<String, String>,
    ) -> Result<Self, StateConflict> {
        guard(
            ContextField::CompanyImpacts,
            writer,
            self.company_impacts.is_some(),
        )?;
        Ok(Self {
            company_impacts: Some(impacts),
            ..self.clone()
        })
    }

    pub fn with_company_exposures(
        &self,
        writer: AgentRole,
        exposures: BTreeMap<String, CompanyExposure>,
    ) -> Result<Self, StateConflict> {
        guard(
            ContextField::CompanyExposures,
            writer,
            self.company_exposures.is_some(),
        )?;
        Ok(Self {
            company_exposures: Some(exposures),
            ..self.clone()
        })
    }

    pub fn with_risk_notes(&self, writer: AgentRole, notes: String) -> Result<Self, StateConflict> {
        guard(ContextField::RiskNotes, writer, self.risk_notes.is_some())?;
        Ok(Self {
            risk_notes: Some(notes),
            ..self.clone()
        })
    }

    pub fn with_risk_assessment(
        &self,
        writer: AgentRole,
        assessment: RiskAssessment,
    ) -> Result<Self, StateConflict> {
        guard(
            ContextField::RiskAssessment,
            writer,
            self.risk_assessment.is_some(),
        )?;
        Ok(Self {
            risk_assessment: Some(assessment),
            ..self.clone()
        })
    }

    /// Fields that currently hold a value, in declaration order.
    pub fn fields_set(&self) -> Vec<ContextField> {
        let checks = [
            (ContextField::Gdp, self.gdp.is_some()),
            (
                ContextField::UnemploymentRate,
                self.unemployment_rate.is_some(),
            ),
            (ContextField::InterestRate, self.interest_rate.is_some()),
            (
                ContextField::DataSourceStatus,
                self.data_source_status.is_some(),
            ),
            (
                ContextField::IndicatorSources,
                self.indicator_sources.is_some(),
            ),
            (ContextField::CompanyImpacts, self.company_impacts.is_some()),
            (
                ContextField::CompanyExposures,
                self.company_exposures.is_some(),
            ),
            (ContextField::RiskNotes, self.risk_notes.is_some()),
            (ContextField::RiskAssessment, self.risk_assessment.is_some()),
        ];
        checks
            .into_iter()
            .filter_map(|(field, set)| set.then_some(field))
            .collect()
    }

    pub fn indicator(&self, indicator: Indicator) -> Option<Decimal> {
        match indicator {
            Indicator::Gdp => self.gdp,
            Indicator::UnemploymentRate => self.unemployment_rate,
            Indicator::InterestRate => self.interest_rate,
        }
    }

    /// Collected indicators with their risk classification.
    pub fn indicator_readings(&self) -> Vec<IndicatorReading> {
        Indicator::ALL
            .iter()
            .filter_map(|&indicator| {
                self.indicator(indicator).map(|value| IndicatorReading {
                    indicator,
                    value,
                    risk: indicator.classify(value),
                })
            })
            .collect()
    }

    pub fn high_risk_indicators(&self) -> Vec<IndicatorReading> {
        self.indicator_readings()
            .into_iter()
            .filter(|r| r.risk.is_high())
            .collect()
    }

    /// Tickers whose exposure score marks them as vulnerable.
    pub fn vulnerable_companies(&self) -> Vec<String> {
        self.company_exposures
            .iter()
            .flatten()
            .filter(|(_, exposure)| exposure.is_vulnerable())
            .map(|(ticker, _)| ticker.clone())
            .collect()
    }

    pub fn summary(&self) -> ContextSummary {
        ContextSummary {
            indicators_collected: self.indicator_readings().len(),
            companies_analyzed: self.company_impacts.as_ref().map_or(0, |m| m.len()),
            high_risk_indicators: self.high_risk_indicators().len(),
            vulnerable_companies: self.vulnerable_companies(),
            latest_risk_level: self.risk_assessment.as_ref().map(|a| a.risk_level),
            data_source_status: self.data_source_status,
        }
    }
}

/// Counts and highlights of a context, included in every report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextSummary {
    pub indicators_collected: usize,
    pub companies_analyzed: usize,
    pub high_risk_indicators: usize,
    pub vulnerable_companies: Vec<String>,
    pub latest_risk_level: Option<RiskLevel>,
    pub data_source_status: Option<DataSourceStatus>,
}

/// Holds the current snapshot for a single query.
///
/// There is exactly one writer at any instant, so the store carries no lock;
/// the write-once guard is a correctness check only.
#[derive(Debug, Default)]
pub struct ContextStore {
    current: SharedContext,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &SharedContext {
        &self.current
    }

    pub fn into_snapshot(self) -> SharedContext {
        self.current
    }

    pub fn set_gdp(&mut self, writer: AgentRole, value: Decimal) -> Result<(), StateConflict> {
        self.current = self.current.with_gdp(writer, value)?;
        Ok(())
    }

    pub fn set_unemployment_rate(
        &mut self,
        writer: AgentRole,
        value: Decimal,
    ) -> Result<(), StateConflict> {
        self.current = self.current.with_unemployment_rate(writer, value)?;
        Ok(())
    }

    pub fn set_interest_rate(
        &mut self,
        writer: AgentRole,
        value: Decimal,
    ) -> Result<(), StateConflict> {
        self.current = self.current.with_interest_rate(writer, value)?;
        Ok(())
    }

    /// Routes an indicator value to its field.
    pub fn set_indicator(
        &mut self,
        writer: AgentRole,
        indicator: Indicator,
        value: Decimal,
    ) -> Result<(), StateConflict> {
        match indicator {
            Indicator::Gdp => self.set_gdp(writer, value),
            Indicator::UnemploymentRate => self.set_unemployment_rate(writer, value),
            Indicator::InterestRate => self.set_interest_rate(writer, value),
        }
    }

    pub fn set_data_source_status(
        &mut self,
        writer: AgentRole,
        status: DataSourceStatus,
    ) -> Result<(), StateConflict> {
        self.current = self.current.with_data_source_status(writer, status)?;
        Ok(())
    }

    pub fn set_indicator_sources(
        &mut self,
        writer: AgentRole,
        sources: BTreeMap<Indicator, DataSourceStatus>,
    ) -> Result<(), StateConflict> {
        self.current = self.current.with_indicator_sources(writer, sources)?;
        Ok(())
    }

    pub fn set_company_impacts(
        &mut self,
        writer: AgentRole,
        impacts: BTreeMap<String, String>,
    ) -> Result<(), StateConflict> {
        self.current = self.current.with_company_impacts(writer, impacts)?;
        Ok(())
    }

    pub fn set_company_exposures(
        &mut self,
        writer: AgentRole,
        exposures: BTreeMap<String, CompanyExposure>,
    ) -> Result<(), StateConflict> {
        self.current = self.current.with_company_exposures(writer, exposures)?;
        Ok(())
    }

    pub fn set_risk_notes(&mut self, writer: AgentRole, notes: String) -> Result<(), StateConflict> {
        self.current = self.current.with_risk_notes(writer, notes)?;
        Ok(())
    }

    pub fn set_risk_assessment(
        &mut self,
        writer: AgentRole,
        assessment: RiskAssessment,
    ) -> Result<(), StateConflict> {
        self.current = self.current.with_risk_assessment(writer, assessment)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economics::Sensitivity;
    use rust_decimal_macros::dec;

    #[test]
    fn new_context_is_empty() {
        let store = ContextStore::new();
        assert!(store.get().fields_set().is_empty());
        assert_eq!(store.get().summary().indicators_collected, 0);
    }

    #[test]
    fn second_write_is_a_state_conflict() {
        let mut store = ContextStore::new();
        store.set_gdp(AgentRole::DataCollector, dec!(2.1)).unwrap();

        let err = store
            .set_gdp(AgentRole::DataCollector, dec!(9.9))
            .unwrap_err();
        assert_eq!(
            err,
            StateConflict::AlreadySet {
                field: ContextField::Gdp,
                writer: AgentRole::DataCollector,
            }
        );
        assert_eq!(store.get().gdp, Some(dec!(2.1)));
    }

    #[test]
    fn every_field_rejects_a_second_write() {
        let mut store = ContextStore::new();
        let collector = AgentRole::DataCollector;
        let analyst = AgentRole::Analyst;
        let assessor = AgentRole::RiskAssessor;

        store.set_gdp(collector, dec!(1)).unwrap();
        store.set_unemployment_rate(collector, dec!(1)).unwrap();
        store.set_interest_rate(collector, dec!(1)).unwrap();
        store
            .set_data_source_status(collector, DataSourceStatus::Live)
            .unwrap();
        store
            .set_indicator_sources(collector, BTreeMap::new())
            .unwrap();
        store.set_company_impacts(analyst, BTreeMap::new()).unwrap();
        store.set_company_exposures(analyst, BTreeMap::new()).unwrap();
        store.set_risk_notes(assessor, "ok".to_string()).unwrap();

        assert!(store.set_gdp(collector, dec!(2)).is_err());
        assert!(store.set_unemployment_rate(collector, dec!(2)).is_err());
        assert!(store.set_interest_rate(collector, dec!(2)).is_err());
        assert!(store
            .set_data_source_status(collector, DataSourceStatus::Mock)
            .is_err());
        assert!(store
            .set_indicator_sources(collector, BTreeMap::new())
            .is_err());
        assert!(store.set_company_impacts(analyst, BTreeMap::new()).is_err());
        assert!(store
            .set_company_exposures(analyst, BTreeMap::new())
            .is_err());
        assert!(store.set_risk_notes(assessor, "again".to_string()).is_err());
        assert_eq!(store.get().risk_notes.as_deref(), Some("ok"));
    }

    #[test]
    fn only_the_owner_may_write() {
        let mut store = ContextStore::new();
        let err = store
            .set_company_impacts(AgentRole::RiskAssessor, BTreeMap::new())
            .unwrap_err();
        assert_eq!(
            err,
            StateConflict::NotOwner {
                field: ContextField::CompanyImpacts,
                owner: AgentRole::Analyst,
                writer: AgentRole::RiskAssessor,
            }
        );
        assert!(store.get().company_impacts.is_none());

        assert!(store.set_gdp(AgentRole::Coordinator, dec!(1)).is_err());
    }

    #[test]
    fn transitions_leave_the_original_snapshot_untouched() {
        let empty = SharedContext::new();
        let next = empty.with_gdp(AgentRole::DataCollector, dec!(2.1)).unwrap();
        assert!(empty.gdp.is_none());
        assert_eq!(next.gdp, Some(dec!(2.1)));
    }

    #[test]
    fn set_indicator_routes_to_field() {
        let mut store = ContextStore::new();
        store
            .set_indicator(AgentRole::DataCollector, Indicator::InterestRate, dec!(5.25))
            .unwrap();
        assert_eq!(store.get().interest_rate, Some(dec!(5.25)));
        assert_eq!(store.get().fields_set(), vec![ContextField::InterestRate]);
    }

    #[test]
    fn summary_reports_vulnerable_companies_and_high_risk() {
        let mut store = ContextStore::new();
        store
            .set_unemployment_rate(AgentRole::DataCollector, dec!(6.5))
            .unwrap();
        let mut exposures = BTreeMap::new();
        exposures.insert(
            "AAPL".to_string(),
            CompanyExposure {
                ticker: "AAPL".to_string(),
                interest_rate_sensitivity: Sensitivity::High,
                inflation_sensitivity: Sensitivity::Medium,
                volatility_sensitivity: Sensitivity::High,
                debt_to_equity: dec!(1.95),
                international_revenue: dec!(0.58),
            },
        );
        store
            .set_company_exposures(AgentRole::Analyst, exposures)
            .unwrap();

        let summary = store.get().summary();
        assert_eq!(summary.indicators_collected, 1);
        assert_eq!(summary.high_risk_indicators, 1);
        assert_eq!(summary.vulnerable_companies, vec!["AAPL".to_string()]);
        assert!(summary.latest_risk_level.is_none());
    }

    #[test]
    fn status_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&DataSourceStatus::Mock).unwrap(),
            "\"MOCK\""
        );
    }

    #[test]
    fn context_with_indicator_keys_roundtrips() {
        let mut sources = BTreeMap::new();
        sources.insert(Indicator::Gdp, DataSourceStatus::Live);
        sources.insert(Indicator::InterestRate, DataSourceStatus::Mock);
        let ctx = SharedContext::new()
            .with_indicator_sources(AgentRole::DataCollector, sources)
            .unwrap();

        let json = serde_json::to_string(&ctx).unwrap();
        let parsed: SharedContext = serde_json::from_str(&json).unwrap();
        assert_eq!(ctx, parsed);
    }
}
