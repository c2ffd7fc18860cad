use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::economics::RiskLevel;

/// Headline financial metrics for one company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyFinancials {
    pub ticker: String,
    pub revenue_billions: Decimal,
    pub eps: Decimal,
    pub debt_to_equity: Decimal,
    pub pe_ratio: Decimal,
    /// Percent.
    pub profit_margin: Decimal,
    /// Return on equity, percent.
    pub roe: Decimal,
}

impl CompanyFinancials {
    /// Debt to equity above 1.5.
    pub fn is_high_debt(&self) -> bool {
        self.debt_to_equity > Decimal::new(15, 1)
    }

    /// Price/earnings to growth. `None` for zero growth.
    pub fn peg_ratio(&self, growth_rate: Decimal) -> Option<Decimal> {
        self.pe_ratio.checked_div(growth_rate)
    }
}

/// Direction an indicator has been moving.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Growing,
    Stable,
    Moderate,
    Elevated,
    Rising,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Growing => "growing",
            Trend::Stable => "stable",
            Trend::Moderate => "moderate",
            Trend::Elevated => "elevated",
            Trend::Rising => "rising",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A market-wide series keyed by its FRED name (GDP, UNRATE, VIXCLS, DFF, CPI).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketIndicator {
    pub name: String,
    pub value: Decimal,
    pub unit: String,
    pub trend: Trend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskLevel>,
}

impl MarketIndicator {
    pub fn is_elevated(&self) -> bool {
        matches!(self.trend, Trend::Elevated | Trend::Rising)
    }

    /// 1 for low, 2 for medium, 3 for high or critical, 0 when unrated.
    pub fn risk_score(&self) -> u32 {
        match self.risk {
            Some(RiskLevel::Low) => 1,
            Some(RiskLevel::Medium) => 2,
            Some(RiskLevel::High | RiskLevel::Critical) => 3,
            None => 0,
        }
    }
}
