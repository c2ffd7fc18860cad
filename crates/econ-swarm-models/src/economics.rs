use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Economic indicators gathered by the data collector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    /// Real GDP growth, annualized quarterly percent change.
    Gdp,
    UnemploymentRate,
    /// Effective federal funds rate.
    InterestRate,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [
        Indicator::Gdp,
        Indicator::UnemploymentRate,
        Indicator::InterestRate,
    ];

    /// FRED series id backing this indicator.
    pub fn series_id(&self) -> &'static str {
        match self {
            Indicator::Gdp => "A191RL1Q225SBEA",
            Indicator::UnemploymentRate => "UNRATE",
            Indicator::InterestRate => "DFF",
        }
    }

    pub fn unit(&self) -> &'static str {
        "Percent"
    }

    /// Placeholder substituted when the data source cannot be reached.
    pub fn mock_value(&self) -> Decimal {
        match self {
            Indicator::Gdp => Decimal::new(25, 1),
            Indicator::UnemploymentRate => Decimal::new(37, 1),
            Indicator::InterestRate => Decimal::new(533, 2),
        }
    }

    /// Risk bucket for a reading of this indicator.
    ///
    /// - GDP growth: below -2% critical, below 0% high, below 1% medium
    /// - Unemployment: above 7% critical, above 6% high, above 4.5% medium
    /// - Fed funds: above 8% critical, above 6% high, above 4% medium
    pub fn classify(&self, value: Decimal) -> RiskLevel {
        match self {
            Indicator::Gdp => {
                if value < Decimal::new(-2, 0) {
                    RiskLevel::Critical
                } else if value < Decimal::ZERO {
                    RiskLevel::High
                } else if value < Decimal::ONE {
                    RiskLevel::Medium
                } else {
                    RiskLevel::Low
                }
            }
            Indicator::UnemploymentRate => {
                if value > Decimal::new(7, 0) {
                    RiskLevel::Critical
                } else if value > Decimal::new(6, 0) {
                    RiskLevel::High
                } else if value > Decimal::new(45, 1) {
                    RiskLevel::Medium
                } else {
                    RiskLevel::Low
                }
            }
            Indicator::InterestRate => {
                if value > Decimal::new(8, 0) {
                    RiskLevel::Critical
                } else if value > Decimal::new(6, 0) {
                    RiskLevel::High
                } else if value > Decimal::new(4, 0) {
                    RiskLevel::Medium
                } else {
                    RiskLevel::Low
                }
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Indicator::Gdp => "GDP growth",
            Indicator::UnemploymentRate => "Unemployment rate",
            Indicator::InterestRate => "Interest rate",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.series_id())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn is_high(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a company reacts to an economic factor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    Low,
    Medium,
    High,
    /// Benefits from the factor.
    Positive,
    /// Harmed by the factor.
    Negative,
}

/// A single indicator value with its risk classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndicatorReading {
    pub indicator: Indicator,
    pub value: Decimal,
    pub risk: RiskLevel,
}

/// A company's exposure to macroeconomic factors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyExposure {
    pub ticker: String,
    pub interest_rate_sensitivity: Sensitivity,
    pub inflation_sensitivity: Sensitivity,
    pub volatility_sensitivity: Sensitivity,
    pub debt_to_equity: Decimal,
    /// Share of revenue earned abroad, 0.0 to 1.0.
    pub international_revenue: Decimal,
}

impl CompanyExposure {
    /// Weighted exposure score. Scores above 5 mark a vulnerable company.
    pub fn risk_score(&self) -> u32 {
        let mut score = 0;

        score += match self.interest_rate_sensitivity {
            Sensitivity::High => 3,
            Sensitivity::Medium => 2,
            _ => 0,
        };

        score += match self.inflation_sensitivity {
            Sensitivity::High | Sensitivity::Negative => 2,
            Sensitivity::Medium => 1,
            _ => 0,
        };

        score += match self.volatility_sensitivity {
            Sensitivity::High => 2,
            Sensitivity::Medium => 1,
            _ => 0,
        };

        if self.debt_to_equity > Decimal::TWO {
            score += 3;
        } else if self.debt_to_equity > Decimal::ONE {
            score += 1;
        }

        if self.international_revenue > Decimal::new(5, 1) {
            score += 1;
        }

        score
    }

    pub fn is_vulnerable(&self) -> bool {
        self.risk_score() > 5
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemicLevel {
    Normal,
    Elevated,
    Critical,
}

/// Market-wide risk derived from indicators and vulnerable companies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemicRisk {
    pub level: SystemicLevel,
    pub score: u32,
    pub high_risk_indicators: Vec<Indicator>,
    pub vulnerable_companies: Vec<String>,
    pub recommended_actions: Vec<String>,
}

/// Structured output of the risk assessor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub risk_score: u32,
    pub risk_factors: Vec<String>,
    pub affected_companies: Vec<String>,
    pub recommendations: Vec<String>,
    pub systemic: SystemicRisk,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn exposure(
        interest: Sensitivity,
        inflation: Sensitivity,
        volatility: Sensitivity,
        debt_to_equity: Decimal,
        international_revenue: Decimal,
    ) -> CompanyExposure {
        CompanyExposure {
            ticker: "TEST".to_string(),
            interest_rate_sensitivity: interest,
            inflation_sensitivity: inflation,
            volatility_sensitivity: volatility,
            debt_to_equity,
            international_revenue,
        }
    }

    #[test]
    fn rate_sensitive_leveraged_company_is_vulnerable() {
        let e = exposure(
            Sensitivity::High,
            Sensitivity::Medium,
            Sensitivity::High,
            dec!(1.95),
            dec!(0.58),
        );
        // 3 + 1 + 2 + 1 + 1
        assert_eq!(e.risk_score(), 8);
        assert!(e.is_vulnerable());
    }

    #[test]
    fn bank_benefiting_from_rates_is_not_vulnerable() {
        let e = exposure(
            Sensitivity::Positive,
            Sensitivity::Low,
            Sensitivity::Medium,
            dec!(0.92),
            dec!(0.23),
        );
        assert_eq!(e.risk_score(), 1);
        assert!(!e.is_vulnerable());
    }

    #[test]
    fn heavy_debt_adds_three_points() {
        let e = exposure(
            Sensitivity::Low,
            Sensitivity::Negative,
            Sensitivity::Low,
            dec!(2.5),
            dec!(0.1),
        );
        assert_eq!(e.risk_score(), 5);
    }

    #[test]
    fn classify_interest_rate() {
        assert_eq!(Indicator::InterestRate.classify(dec!(5.25)), RiskLevel::Medium);
        assert_eq!(Indicator::InterestRate.classify(dec!(3.0)), RiskLevel::Low);
        assert_eq!(Indicator::InterestRate.classify(dec!(6.5)), RiskLevel::High);
    }

    #[test]
    fn classify_gdp_contraction_is_high() {
        assert_eq!(Indicator::Gdp.classify(dec!(2.1)), RiskLevel::Low);
        assert_eq!(Indicator::Gdp.classify(dec!(0.4)), RiskLevel::Medium);
        assert_eq!(Indicator::Gdp.classify(dec!(-0.5)), RiskLevel::High);
        assert_eq!(Indicator::Gdp.classify(dec!(-3.0)), RiskLevel::Critical);
    }

    #[test]
    fn classify_unemployment() {
        assert_eq!(
            Indicator::UnemploymentRate.classify(dec!(3.8)),
            RiskLevel::Low
        );
        assert_eq!(
            Indicator::UnemploymentRate.classify(dec!(6.4)),
            RiskLevel::High
        );
    }

    #[test]
    fn mock_values_are_plausible() {
        assert_eq!(Indicator::Gdp.mock_value(), dec!(2.5));
        assert_eq!(Indicator::UnemploymentRate.mock_value(), dec!(3.7));
        assert_eq!(Indicator::InterestRate.mock_value(), dec!(5.33));
    }

    #[test]
    fn systemic_level_serialization() {
        assert_eq!(
            serde_json::to_string(&SystemicLevel::Elevated).unwrap(),
            "\"ELEVATED\""
        );
    }
}
