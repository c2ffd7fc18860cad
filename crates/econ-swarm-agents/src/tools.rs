//! Deterministic risk tools used by the risk assessor, plus ticker extraction
//! for the analyst.

use econ_swarm_data::is_known_symbol;
use econ_swarm_models::{RiskAssessment, RiskLevel, SharedContext, SystemicLevel, SystemicRisk};
use serde::{Deserialize, Serialize};

/// Result of scoring a list of free-text risk factors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskScore {
    pub score: u32,
    pub level: RiskLevel,
    pub factors: Vec<String>,
    pub recommendation: String,
}

/// Score risk factors by the severity word each one contains.
///
/// `high`/`critical` add 3, `medium`/`moderate` add 2, `low` adds 1.
pub fn calculate_risk_score(factors: &[String]) -> RiskScore {
    let score: u32 = factors
        .iter()
        .map(|factor| {
            let factor = factor.to_lowercase();
            if factor.contains("high") || factor.contains("critical") {
                3
            } else if factor.contains("medium") || factor.contains("moderate") {
                2
            } else if factor.contains("low") {
                1
            } else {
                0
            }
        })
        .sum();

    let (level, recommendation) = match score {
        s if s > 8 => (
            RiskLevel::Critical,
            "Immediate action needed - reduce exposure",
        ),
        s if s > 5 => (RiskLevel::High, "Monitor closely and consider hedging"),
        s if s > 3 => (RiskLevel::Medium, "Monitor and prepare contingency plans"),
        _ => (RiskLevel::Low, "Maintain current strategy"),
    };

    RiskScore {
        score,
        level,
        factors: factors.to_vec(),
        recommendation: recommendation.to_string(),
    }
}

/// Market-wide risk from the indicators and company exposures in the context.
pub fn analyze_systemic_risk(context: &SharedContext) -> SystemicRisk {
    let high_risk_indicators: Vec<_> = context
        .high_risk_indicators()
        .into_iter()
        .map(|r| r.indicator)
        .collect();
    let vulnerable_companies = context.vulnerable_companies();

    let score = high_risk_indicators.len() as u32 * 2 + vulnerable_companies.len() as u32;

    let (level, actions): (SystemicLevel, &[&str]) = match score {
        s if s > 6 => (
            SystemicLevel::Critical,
            &[
                "Reduce overall portfolio exposure",
                "Implement defensive strategies",
                "Increase cash allocation",
            ],
        ),
        s if s > 3 => (
            SystemicLevel::Elevated,
            &[
                "Review and adjust positions",
                "Consider protective hedges",
                "Monitor daily",
            ],
        ),
        _ => (
            SystemicLevel::Normal,
            &["Maintain positions", "Regular monitoring", "Stay informed"],
        ),
    };

    SystemicRisk {
        level,
        score,
        high_risk_indicators,
        vulnerable_companies,
        recommended_actions: actions.iter().map(|a| a.to_string()).collect(),
    }
}

/// Risk factors implied by the context: one per indicator reading, one per
/// vulnerable company.
pub fn risk_factors(context: &SharedContext) -> Vec<String> {
    let mut factors: Vec<String> = context
        .indicator_readings()
        .into_iter()
        .map(|r| {
            format!("{} {} risk ({}%)", r.indicator.label(), r.risk, r.value)
        })
        .collect();

    if let Some(exposures) = &context.company_exposures {
        for exposure in exposures.values().filter(|e| e.is_vulnerable()) {
            factors.push(format!(
                "{} high exposure (score {})",
                exposure.ticker,
                exposure.risk_score()
            ));
        }
    }

    factors
}

/// Full risk assessment for the context as it stands after analysis.
pub fn assess_risk(context: &SharedContext) -> RiskAssessment {
    let factors = risk_factors(context);
    let scored = calculate_risk_score(&factors);
    let systemic = analyze_systemic_risk(context);

    RiskAssessment {
        risk_level: scored.level,
        risk_score: scored.score,
        risk_factors: scored.factors,
        affected_companies: systemic.vulnerable_companies.clone(),
        recommendations: vec![scored.recommendation],
        systemic,
    }
}

/// Ticker symbols named in a query, upper-cased, in order of first appearance.
///
/// A token is a ticker when it carries a `$` prefix (any 1-5 letter symbol)
/// or names a known company symbol in any letter case. All-caps words such as
/// BUY or the S and P of "S&P" are not tickers.
pub fn extract_tickers(query: &str) -> Vec<String> {
    let mut tickers: Vec<String> = Vec::new();

    for token in query.split(|c: char| !(c.is_ascii_alphanumeric() || c == '$')) {
        let (explicit, symbol) = match token.strip_prefix('$') {
            Some(rest) => (true, rest),
            None => (false, token),
        };

        let shaped = (1..=5).contains(&symbol.len())
            && symbol.chars().all(|c| c.is_ascii_alphabetic());
        if !shaped || !(explicit || is_known_symbol(symbol)) {
            continue;
        }
        let symbol = symbol.to_ascii_uppercase();
        if !tickers.contains(&symbol) {
            tickers.push(symbol);
        }
    }

    tickers
}

#[cfg(test)]
mod tests {
    use super::*;
    use econ_swarm_models::{AgentRole, CompanyExposure, Sensitivity};
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn factors(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn risk_score_levels() {
        assert_eq!(calculate_risk_score(&[]).level, RiskLevel::Low);

        let low = calculate_risk_score(&factors(&["moderate inflation", "low growth"]));
        assert_eq!(low.score, 3);
        assert_eq!(low.level, RiskLevel::Low);

        let medium = calculate_risk_score(&factors(&["medium rates", "medium debt"]));
        assert_eq!(medium.score, 4);
        assert_eq!(medium.level, RiskLevel::Medium);

        let high = calculate_risk_score(&factors(&["high rates", "critical debt"]));
        assert_eq!(high.score, 6);
        assert_eq!(high.level, RiskLevel::High);
        assert_eq!(high.recommendation, "Monitor closely and consider hedging");

        let critical =
            calculate_risk_score(&factors(&["high rates", "critical debt", "HIGH volatility"]));
        assert_eq!(critical.score, 9);
        assert_eq!(critical.level, RiskLevel::Critical);
    }

    #[test]
    fn unrecognised_factor_scores_zero() {
        assert_eq!(calculate_risk_score(&factors(&["stable outlook"])).score, 0);
    }

    fn aapl() -> CompanyExposure {
        CompanyExposure {
            ticker: "AAPL".to_string(),
            interest_rate_sensitivity: Sensitivity::High,
            inflation_sensitivity: Sensitivity::Medium,
            volatility_sensitivity: Sensitivity::High,
            debt_to_equity: dec!(1.95),
            international_revenue: dec!(0.58),
        }
    }

    fn context(gdp: rust_decimal::Decimal, unrate: rust_decimal::Decimal) -> SharedContext {
        let collector = AgentRole::DataCollector;
        SharedContext::new()
            .with_gdp(collector, gdp)
            .unwrap()
            .with_unemployment_rate(collector, unrate)
            .unwrap()
            .with_interest_rate(collector, dec!(5.25))
            .unwrap()
            .with_company_exposures(
                AgentRole::Analyst,
                BTreeMap::from([("AAPL".to_string(), aapl())]),
            )
            .unwrap()
    }

    #[test]
    fn systemic_risk_normal() {
        let systemic = analyze_systemic_risk(&context(dec!(2.1), dec!(3.8)));
        assert_eq!(systemic.score, 1);
        assert_eq!(systemic.level, SystemicLevel::Normal);
        assert_eq!(systemic.vulnerable_companies, vec!["AAPL".to_string()]);
        assert_eq!(systemic.recommended_actions[0], "Maintain positions");
    }

    #[test]
    fn systemic_risk_elevated_and_critical() {
        // Contracting GDP and high unemployment: two high-risk indicators.
        let systemic = analyze_systemic_risk(&context(dec!(-1.0), dec!(6.5)));
        assert_eq!(systemic.score, 5);
        assert_eq!(systemic.level, SystemicLevel::Elevated);

        let collector = AgentRole::DataCollector;
        let ctx = SharedContext::new()
            .with_gdp(collector, dec!(-3))
            .unwrap()
            .with_unemployment_rate(collector, dec!(8))
            .unwrap()
            .with_interest_rate(collector, dec!(9))
            .unwrap()
            .with_company_exposures(
                AgentRole::Analyst,
                BTreeMap::from([("AAPL".to_string(), aapl())]),
            )
            .unwrap();
        let systemic = analyze_systemic_risk(&ctx);
        assert_eq!(systemic.score, 7);
        assert_eq!(systemic.level, SystemicLevel::Critical);
        assert_eq!(systemic.recommended_actions[2], "Increase cash allocation");
    }

    #[test]
    fn assessment_combines_indicators_and_companies() {
        let assessment = assess_risk(&context(dec!(2.1), dec!(3.8)));

        // low + low + medium + vulnerable company
        assert_eq!(assessment.risk_score, 7);
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert_eq!(assessment.risk_factors.len(), 4);
        assert!(assessment.risk_factors[3].starts_with("AAPL high exposure"));
        assert_eq!(assessment.affected_companies, vec!["AAPL".to_string()]);
        assert_eq!(assessment.systemic.level, SystemicLevel::Normal);
    }

    #[test]
    fn tickers_from_query() {
        assert_eq!(
            extract_tickers("Analyze AAPL and JPM given current economic conditions"),
            vec!["AAPL", "JPM"]
        );
    }

    #[test]
    fn indicator_acronyms_are_not_tickers() {
        assert_eq!(
            extract_tickers("How do GDP, CPI and the VIX affect XOM? I wonder."),
            vec!["XOM"]
        );
    }

    #[test]
    fn dollar_prefix_and_dedup() {
        assert_eq!(
            extract_tickers("$F vs $GDP vs AAPL, then AAPL again"),
            vec!["F", "GDP", "AAPL"]
        );
    }

    #[test]
    fn long_and_unknown_tokens_are_ignored() {
        assert!(extract_tickers("UNRATE and VIXCLS are series, Apple is a name").is_empty());
    }

    #[test]
    fn emphasis_words_are_not_tickers() {
        assert_eq!(
            extract_tickers("Should I BUY AAPL or SELL JPM? NOT sure."),
            vec!["AAPL", "JPM"]
        );
    }

    #[test]
    fn index_names_are_not_tickers() {
        assert!(extract_tickers("How exposed is the S&P 500?").is_empty());
    }

    #[test]
    fn lower_case_symbols_are_recognised() {
        assert_eq!(extract_tickers("analyze aapl and jpm"), vec!["AAPL", "JPM"]);
        assert_eq!(extract_tickers("compare $zzz with Msft"), vec!["ZZZ", "MSFT"]);
    }
}
