//! Portfolio risk metrics: value at risk, concentration, risk-adjusted return
//! and scenario stress tests. All figures are computed, never asked of the
//! model.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use econ_swarm_models::{Portfolio, PortfolioSummary, RiskLevel};
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Daily volatility assumed when none is given (2%).
pub const DEFAULT_DAILY_VOLATILITY: Decimal = Decimal::from_parts(2, 0, 0, false, 2);

/// Annual risk-free rate assumed when none is given (4%).
pub const DEFAULT_RISK_FREE_RATE: Decimal = Decimal::from_parts(4, 0, 0, false, 2);

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    P95,
    P99,
}

impl Confidence {
    /// One-tailed normal z-score.
    pub fn z_score(&self) -> Decimal {
        match self {
            Confidence::P95 => Decimal::new(165, 2),
            Confidence::P99 => Decimal::new(233, 2),
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::P95 => f.write_str("95%"),
            Confidence::P99 => f.write_str("99%"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VarEstimate {
    pub portfolio_value: Decimal,
    pub var: Decimal,
    pub confidence: Confidence,
    pub daily_volatility: Decimal,
    pub interpretation: String,
}

/// Parametric one-day value at risk.
pub fn calculate_var(
    portfolio: &Portfolio,
    confidence: Confidence,
    daily_volatility: Decimal,
) -> Result<VarEstimate, AgentError> {
    let value = portfolio.total_value();
    if value.is_zero() {
        return Err(AgentError::EmptyPortfolio);
    }

    let var = (value * daily_volatility * confidence.z_score()).round_dp(2);
    Ok(VarEstimate {
        portfolio_value: value.round_dp(2),
        var,
        confidence,
        daily_volatility,
        interpretation: format!(
            "With {confidence} confidence, daily loss won't exceed ${var}"
        ),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConcentrationRisk {
    /// Weight of the largest holding, percent.
    pub max_concentration: Decimal,
    pub largest_position: Option<String>,
    pub risk_level: RiskLevel,
    pub diversification_score: Decimal,
    pub position_weights: BTreeMap<String, Decimal>,
    pub recommendations: Vec<String>,
}

/// Grade the largest holding's weight: above 40% critical, above 30% high,
/// above 20% medium.
pub fn assess_concentration_risk(portfolio: &Portfolio) -> ConcentrationRisk {
    let concentration = portfolio.concentration();
    let max = concentration
        .as_ref()
        .map_or(Decimal::ZERO, |c| c.max_pct);
    let largest = concentration.as_ref().map(|c| c.symbol.clone());

    let risk_level = if max > Decimal::from(40) {
        RiskLevel::Critical
    } else if max > Decimal::from(30) {
        RiskLevel::High
    } else if max > Decimal::from(20) {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    let recommendations = match risk_level {
        RiskLevel::High | RiskLevel::Critical => vec![
            format!(
                "Reduce {} position - too concentrated ({}%)",
                largest.as_deref().unwrap_or_default(),
                max.round_dp(1)
            ),
            "Add more diversified holdings".to_string(),
            "Consider position size limits (e.g., max 20% per position)".to_string(),
        ],
        RiskLevel::Medium => vec![
            "Monitor concentration levels".to_string(),
            "Consider rebalancing quarterly".to_string(),
        ],
        RiskLevel::Low => vec![
            "Portfolio well diversified".to_string(),
            "Maintain current allocation strategy".to_string(),
        ],
    };

    ConcentrationRisk {
        max_concentration: max,
        largest_position: largest,
        risk_level,
        diversification_score: portfolio.diversification_score(),
        position_weights: concentration.map(|c| c.weights).unwrap_or_default(),
        recommendations,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SharpeRatio {
    pub sharpe_ratio: Decimal,
    /// Percent.
    pub portfolio_return: Decimal,
    /// Percent.
    pub risk_free_rate: Decimal,
    /// Sample standard deviation of position returns, percent.
    pub volatility: Decimal,
    pub interpretation: String,
}

/// Excess return over `risk_free_rate` per unit of cross-position return
/// dispersion. Zero when there is no dispersion to measure.
pub fn calculate_sharpe_ratio(portfolio: &Portfolio, risk_free_rate: Decimal) -> SharpeRatio {
    let portfolio_return = portfolio.total_return_pct() / HUNDRED;
    let returns: Vec<Decimal> = portfolio
        .positions
        .iter()
        .map(|p| p.return_pct() / HUNDRED)
        .collect();

    let std_dev = if returns.len() > 1 {
        let n = Decimal::from(returns.len());
        let mean = returns.iter().sum::<Decimal>() / n;
        let variance = returns
            .iter()
            .map(|r| (r - mean) * (r - mean))
            .sum::<Decimal>()
            / (n - Decimal::ONE);
        variance.sqrt().unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    let sharpe = ((portfolio_return - risk_free_rate)
        .checked_div(std_dev)
        .unwrap_or(Decimal::ZERO))
    .round_dp(2);

    let interpretation = if sharpe > Decimal::TWO {
        "Excellent risk-adjusted returns"
    } else if sharpe > Decimal::ONE {
        "Good risk-adjusted returns"
    } else if sharpe > Decimal::ZERO {
        "Positive but modest risk-adjusted returns"
    } else {
        "Poor risk-adjusted returns"
    };

    SharpeRatio {
        sharpe_ratio: sharpe,
        portfolio_return: (portfolio_return * HUNDRED).round_dp(2),
        risk_free_rate: (risk_free_rate * HUNDRED).round_dp(2),
        volatility: (std_dev * HUNDRED).round_dp(2),
        interpretation: interpretation.to_string(),
    }
}

/// A uniform price shock applied to every holding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StressScenario {
    MarketCrash,
    Recession,
    Inflation,
}

impl StressScenario {
    pub const ALL: [StressScenario; 3] = [
        StressScenario::MarketCrash,
        StressScenario::Recession,
        StressScenario::Inflation,
    ];

    /// Fraction of value that survives the shock.
    pub fn factor(&self) -> Decimal {
        match self {
            StressScenario::MarketCrash => Decimal::new(70, 2),
            StressScenario::Recession => Decimal::new(85, 2),
            StressScenario::Inflation => Decimal::new(90, 2),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StressScenario::MarketCrash => "Market Crash (-30%)",
            StressScenario::Recession => "Recession (-15%)",
            StressScenario::Inflation => "High Inflation (-10%)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StressScenario::MarketCrash => "Severe market downturn",
            StressScenario::Recession => "Economic recession",
            StressScenario::Inflation => "High inflation environment",
        }
    }
}

impl FromStr for StressScenario {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "market_crash" => Ok(StressScenario::MarketCrash),
            "recession" => Ok(StressScenario::Recession),
            "inflation" => Ok(StressScenario::Inflation),
            other => Err(AgentError::UnknownScenario(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionImpact {
    pub symbol: String,
    pub current_value: Decimal,
    pub stressed_value: Decimal,
    pub loss: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StressTestResult {
    pub scenario: StressScenario,
    pub label: String,
    pub description: String,
    pub current_portfolio_value: Decimal,
    pub stressed_portfolio_value: Decimal,
    pub total_loss: Decimal,
    /// Percent.
    pub loss_percentage: Decimal,
    pub position_impacts: Vec<PositionImpact>,
}

pub fn stress_test(portfolio: &Portfolio, scenario: StressScenario) -> StressTestResult {
    let factor = scenario.factor();
    let current = portfolio.total_value();
    let stressed = current * factor;

    let position_impacts = portfolio
        .positions
        .iter()
        .map(|p| {
            let value = p.value();
            let stressed_value = value * factor;
            PositionImpact {
                symbol: p.symbol.clone(),
                current_value: value.round_dp(2),
                stressed_value: stressed_value.round_dp(2),
                loss: (value - stressed_value).round_dp(2),
            }
        })
        .collect();

    StressTestResult {
        scenario,
        label: scenario.label().to_string(),
        description: scenario.description().to_string(),
        current_portfolio_value: current.round_dp(2),
        stressed_portfolio_value: stressed.round_dp(2),
        total_loss: (current - stressed).round_dp(2),
        loss_percentage: ((Decimal::ONE - factor) * HUNDRED).round_dp(1),
        position_impacts,
    }
}

/// Holdings summary plus every risk metric at default assumptions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioRiskReport {
    pub summary: PortfolioSummary,
    /// Absent for a portfolio with no value.
    pub var_95: Option<VarEstimate>,
    pub var_99: Option<VarEstimate>,
    pub concentration: ConcentrationRisk,
    pub sharpe_ratio: SharpeRatio,
    pub stress_tests: Vec<StressTestResult>,
}

pub fn portfolio_report(portfolio: &Portfolio) -> PortfolioRiskReport {
    PortfolioRiskReport {
        summary: portfolio.summary(),
        var_95: calculate_var(portfolio, Confidence::P95, DEFAULT_DAILY_VOLATILITY).ok(),
        var_99: calculate_var(portfolio, Confidence::P99, DEFAULT_DAILY_VOLATILITY).ok(),
        concentration: assess_concentration_risk(portfolio),
        sharpe_ratio: calculate_sharpe_ratio(portfolio, DEFAULT_RISK_FREE_RATE),
        stress_tests: StressScenario::ALL
            .iter()
            .map(|&s| stress_test(portfolio, s))
            .collect(),
    }
}
