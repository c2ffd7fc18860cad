use econ_swarm_models::economics::RiskLevel;
use econ_swarm_models::market::{CompanyFinancials, MarketIndicator, Trend};
use rust_decimal::Decimal;

/// Reference financials for the companies the market tools cover.
pub fn financials_for(ticker: &str) -> Option<CompanyFinancials> {
    let ticker = ticker.trim().to_ascii_uppercase();
    let (revenue, eps, debt_to_equity, pe, margin, roe) = match ticker.as_str() {
        "AAPL" => (3833, 613, 195, 302, 253, 1479),
        "MSFT" => (2451, 1182, 58, 355, 367, 392),
        "GOOGL" => (3074, 561, 11, 248, 278, 306),
        _ => return None,
    };

    Some(CompanyFinancials {
        ticker,
        revenue_billions: Decimal::new(revenue, 1),
        eps: Decimal::new(eps, 2),
        debt_to_equity: Decimal::new(debt_to_equity, 2),
        pe_ratio: Decimal::new(pe, 1),
        profit_margin: Decimal::new(margin, 1),
        roe: Decimal::new(roe, 1),
    })
}

/// FRED names of the series in the market snapshot.
pub const MARKET_INDICATORS: [&str; 5] = ["GDP", "UNRATE", "VIXCLS", "DFF", "CPI"];

/// Snapshot of market-wide series by FRED name, case-insensitive.
pub fn market_indicator(name: &str) -> Option<MarketIndicator> {
    let name = name.trim().to_ascii_uppercase();
    let (value, unit, trend, risk) = match name.as_str() {
        "GDP" => (Decimal::new(2796, 2), "Trillion USD", Trend::Growing, RiskLevel::Low),
        "UNRATE" => (Decimal::new(37, 1), "Percent", Trend::Stable, RiskLevel::Low),
        "VIXCLS" => (Decimal::new(185, 1), "Index", Trend::Moderate, RiskLevel::Medium),
        "DFF" => (Decimal::new(533, 2), "Percent", Trend::Elevated, RiskLevel::Medium),
        "CPI" => (Decimal::new(3185, 1), "Index", Trend::Rising, RiskLevel::Medium),
        _ => return None,
    };

    Some(MarketIndicator {
        name,
        value,
        unit: unit.to_string(),
        trend,
        risk: Some(risk),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn financials_lookup() {
        let aapl = financials_for("aapl").unwrap();
        assert_eq!(aapl.ticker, "AAPL");
        assert_eq!(aapl.debt_to_equity, dec!(1.95));
        assert!(aapl.is_high_debt());

        let msft = financials_for("MSFT").unwrap();
        assert_eq!(msft.eps, dec!(11.82));
        assert_eq!(msft.profit_margin, dec!(36.7));
        assert!(!msft.is_high_debt());

        assert!(financials_for("ZZZZ").is_none());
    }

    #[test]
    fn indicator_snapshot() {
        let dff = market_indicator("dff").unwrap();
        assert_eq!(dff.value, dec!(5.33));
        assert!(dff.is_elevated());
        assert_eq!(market_indicator("VIXCLS").unwrap().risk_score(), 2);
        assert!(market_indicator("SP500").is_none());
        assert!(MARKET_INDICATORS.iter().all(|n| market_indicator(n).is_some()));
    }
}
