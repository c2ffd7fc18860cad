//! Company fundamentals and how they line up against market-wide series.

use std::collections::BTreeMap;

use econ_swarm_data::{financials_for, market_indicator, MARKET_INDICATORS};
use econ_swarm_models::{CompanyFinancials, MarketIndicator, Trend};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Growth rate used for the PEG ratio in company reports, percent.
pub const DEFAULT_GROWTH_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

pub fn company_financials(ticker: &str) -> Result<CompanyFinancials, AgentError> {
    financials_for(ticker).ok_or_else(|| AgentError::UnknownSymbol(ticker.to_string()))
}

pub fn economic_indicator(name: &str) -> Result<MarketIndicator, AgentError> {
    market_indicator(name).ok_or_else(|| AgentError::UnknownIndicator(name.to_string()))
}

/// Plain-text read of one company against one series.
///
/// - DFF above 5%: debt to equity decides rate vulnerability
/// - VIXCLS: above 25 calls for protection
/// - CPI while rising: margins above 30% absorb the pressure
pub fn correlate(company: &CompanyFinancials, indicator: &MarketIndicator) -> String {
    let ticker = &company.ticker;
    let mut notes = Vec::new();

    match indicator.name.as_str() {
        "DFF" if indicator.value > Decimal::from(5) => {
            if company.is_high_debt() {
                notes.push(format!(
                    "{ticker} has high debt ({}x) - vulnerable to high rates ({}%)",
                    company.debt_to_equity.round_dp(1),
                    indicator.value
                ));
            } else {
                notes.push(format!(
                    "{ticker} has low debt ({}x) - resilient to rate hikes",
                    company.debt_to_equity.round_dp(1)
                ));
            }
        }
        "VIXCLS" => {
            if indicator.value > Decimal::from(25) {
                notes.push(format!(
                    "High volatility (VIX: {}) - consider protective strategies for {ticker}",
                    indicator.value
                ));
            } else {
                notes.push(format!(
                    "Low volatility (VIX: {}) - stable environment for {ticker}",
                    indicator.value
                ));
            }
        }
        "CPI" if indicator.trend == Trend::Rising => {
            if company.profit_margin > Decimal::from(30) {
                notes.push(format!(
                    "{ticker} has strong margins ({}%) - can absorb inflation pressure",
                    company.profit_margin.round_dp(1)
                ));
            } else {
                notes.push(format!(
                    "Rising inflation may pressure {ticker}'s margins ({}%)",
                    company.profit_margin.round_dp(1)
                ));
            }
        }
        _ => {}
    }

    if notes.is_empty() {
        format!("Neutral relationship between {ticker} and {}", indicator.name)
    } else {
        notes.join(" | ")
    }
}

/// Look up both sides by name and correlate them.
pub fn analyze_company_correlation(ticker: &str, indicator: &str) -> Result<String, AgentError> {
    let company = company_financials(ticker)?;
    let indicator = economic_indicator(indicator)?;
    Ok(correlate(&company, &indicator))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyReport {
    pub financials: CompanyFinancials,
    /// At `DEFAULT_GROWTH_RATE`.
    pub peg_ratio: Option<Decimal>,
    /// Keyed by FRED series name.
    pub correlations: BTreeMap<String, String>,
}

/// Fundamentals plus a correlation note for every series in the snapshot.
pub fn company_report(ticker: &str) -> Result<CompanyReport, AgentError> {
    let financials = company_financials(ticker)?;
    let correlations = MARKET_INDICATORS
        .iter()
        .copied()
        .filter_map(market_indicator)
        .map(|indicator| {
            let note = correlate(&financials, &indicator);
            (indicator.name, note)
        })
        .collect();

    Ok(CompanyReport {
        peg_ratio: financials.peg_ratio(DEFAULT_GROWTH_RATE).map(|p| p.round_dp(2)),
        financials,
        correlations,
    })
}
