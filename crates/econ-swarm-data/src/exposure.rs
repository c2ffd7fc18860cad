use econ_swarm_models::economics::{CompanyExposure, Sensitivity};
use rust_decimal::Decimal;

/// Known company exposure profiles. Unknown tickers have no profile.
pub fn exposure_for(ticker: &str) -> Option<CompanyExposure> {
    let ticker = ticker.trim().to_ascii_uppercase();
    let (interest, inflation, volatility, debt_to_equity, international_revenue) =
        match ticker.as_str() {
            "AAPL" => (
                Sensitivity::High,
                Sensitivity::Medium,
                Sensitivity::High,
                Decimal::new(195, 2),
                Decimal::new(58, 2),
            ),
            "JPM" => (
                Sensitivity::Positive,
                Sensitivity::Low,
                Sensitivity::Medium,
                Decimal::new(92, 2),
                Decimal::new(23, 2),
            ),
            "XOM" => (
                Sensitivity::Low,
                Sensitivity::Positive,
                Sensitivity::Medium,
                Decimal::new(41, 2),
                Decimal::new(65, 2),
            ),
            _ => return None,
        };

    Some(CompanyExposure {
        ticker,
        interest_rate_sensitivity: interest,
        inflation_sensitivity: inflation,
        volatility_sensitivity: volatility,
        debt_to_equity,
        international_revenue,
    })
}
