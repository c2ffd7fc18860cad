use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four specialist roles taking part in a handoff run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Coordinator,
    DataCollector,
    Analyst,
    RiskAssessor,
}

impl AgentRole {
    pub const ALL: [AgentRole; 4] = [
        AgentRole::Coordinator,
        AgentRole::DataCollector,
        AgentRole::Analyst,
        AgentRole::RiskAssessor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AgentRole::Coordinator => "coordinator",
            AgentRole::DataCollector => "data_collector",
            AgentRole::Analyst => "analyst",
            AgentRole::RiskAssessor => "risk_assessor",
        }
    }

    /// External tools this role is permitted to invoke.
    pub fn tools(&self) -> &'static [ToolRef] {
        match self {
            AgentRole::Coordinator => &[],
            AgentRole::DataCollector => &[ToolRef::EconomicIndicator],
            AgentRole::Analyst => &[ToolRef::CompanyExposure],
            AgentRole::RiskAssessor => &[
                ToolRef::RiskScore,
                ToolRef::CompanyExposure,
                ToolRef::SystemicRisk,
            ],
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown agent role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for AgentRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coordinator" => Ok(AgentRole::Coordinator),
            "data_collector" => Ok(AgentRole::DataCollector),
            "analyst" => Ok(AgentRole::Analyst),
            "risk_assessor" => Ok(AgentRole::RiskAssessor),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// External tools a specialist may be granted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ToolRef {
    /// Economic-data retrieval (FRED or mock).
    EconomicIndicator,
    CompanyExposure,
    RiskScore,
    SystemicRisk,
}

impl ToolRef {
    pub fn name(&self) -> &'static str {
        match self {
            ToolRef::EconomicIndicator => "get_economic_indicator",
            ToolRef::CompanyExposure => "get_company_exposure",
            ToolRef::RiskScore => "calculate_risk_score",
            ToolRef::SystemicRisk => "analyze_systemic_risk",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_parse_back() {
        for role in AgentRole::ALL {
            assert_eq!(role.name().parse::<AgentRole>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = "portfolio_manager".parse::<AgentRole>().unwrap_err();
        assert_eq!(err, UnknownRole("portfolio_manager".to_string()));
    }

    #[test]
    fn only_collector_may_fetch_indicators() {
        for role in AgentRole::ALL {
            let allowed = role.tools().contains(&ToolRef::EconomicIndicator);
            assert_eq!(allowed, role == AgentRole::DataCollector, "{role}");
        }
    }

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AgentRole::RiskAssessor).unwrap(),
            "\"risk_assessor\""
        );
    }
}
