use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// One holding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub symbol: String,
    pub shares: u32,
    pub buy_price: Decimal,
    pub current_price: Decimal,
}

impl Position {
    pub fn new(
        symbol: impl Into<String>,
        shares: u32,
        buy_price: Decimal,
        current_price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            shares,
            buy_price,
            current_price,
        }
    }

    pub fn value(&self) -> Decimal {
        Decimal::from(self.shares) * self.current_price
    }

    pub fn cost_basis(&self) -> Decimal {
        Decimal::from(self.shares) * self.buy_price
    }

    pub fn pnl(&self) -> Decimal {
        self.value() - self.cost_basis()
    }

    /// Percent gain over the buy price. Zero when bought at zero.
    pub fn return_pct(&self) -> Decimal {
        match self.current_price.checked_div(self.buy_price) {
            Some(ratio) => (ratio - Decimal::ONE) * HUNDRED,
            None => Decimal::ZERO,
        }
    }

    pub fn summary(&self) -> PositionSummary {
        PositionSummary {
            symbol: self.symbol.clone(),
            shares: self.shares,
            buy_price: self.buy_price,
            current_price: self.current_price,
            value: self.value().round_dp(2),
            pnl: self.pnl().round_dp(2),
            return_pct: self.return_pct().round_dp(2),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionSummary {
    pub symbol: String,
    pub shares: u32,
    pub buy_price: Decimal,
    pub current_price: Decimal,
    pub value: Decimal,
    pub pnl: Decimal,
    pub return_pct: Decimal,
}

/// Weight of the largest holding and of every holding, in percent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Concentration {
    pub max_pct: Decimal,
    pub symbol: String,
    pub value: Decimal,
    pub weights: BTreeMap<String, Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioSummary {
    pub total_value: Decimal,
    pub total_cost_basis: Decimal,
    pub total_pnl: Decimal,
    pub total_return_pct: Decimal,
    pub position_count: usize,
    pub diversification_score: Decimal,
    pub positions: Vec<PositionSummary>,
}

/// An ordered set of holdings. Loadable from TOML as `[[positions]]` tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Portfolio {
    #[serde(default)]
    pub positions: Vec<Position>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_position(&mut self, position: Position) -> &Position {
        self.positions.push(position);
        &self.positions[self.positions.len() - 1]
    }

    /// Remove every holding of `symbol`. Returns whether any was removed.
    pub fn remove_position(&mut self, symbol: &str) -> bool {
        let before = self.positions.len();
        self.positions.retain(|p| p.symbol != symbol);
        self.positions.len() < before
    }

    pub fn get_position(&self, symbol: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.symbol == symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn total_value(&self) -> Decimal {
        self.positions.iter().map(Position::value).sum()
    }

    pub fn total_cost_basis(&self) -> Decimal {
        self.positions.iter().map(Position::cost_basis).sum()
    }

    pub fn total_pnl(&self) -> Decimal {
        self.positions.iter().map(Position::pnl).sum()
    }

    pub fn total_return_pct(&self) -> Decimal {
        match self.total_value().checked_div(self.total_cost_basis()) {
            Some(ratio) => (ratio - Decimal::ONE) * HUNDRED,
            None => Decimal::ZERO,
        }
    }

    /// `None` for an empty or worthless portfolio. Ties go to the first holding.
    pub fn concentration(&self) -> Option<Concentration> {
        let total = self.total_value();
        if total.is_zero() {
            return None;
        }
        let largest = self
            .positions
            .iter()
            .reduce(|max, p| if p.value() > max.value() { p } else { max })?;

        let weights = self
            .positions
            .iter()
            .map(|p| (p.symbol.clone(), (p.value() / total * HUNDRED).round_dp(2)))
            .collect();

        Some(Concentration {
            max_pct: (largest.value() / total * HUNDRED).round_dp(2),
            symbol: largest.symbol.clone(),
            value: largest.value().round_dp(2),
            weights,
        })
    }

    /// 0 to 100, higher is better spread. The score falls by two points per
    /// percentage point the largest weight sits away from an equal split.
    pub fn diversification_score(&self) -> Decimal {
        if self.positions.len() <= 1 {
            return Decimal::ZERO;
        }
        let Some(concentration) = self.concentration() else {
            return Decimal::ZERO;
        };
        let ideal = HUNDRED / Decimal::from(self.positions.len());
        let score = HUNDRED - (concentration.max_pct - ideal).abs() * Decimal::TWO;
        score.max(Decimal::ZERO).round_dp(2)
    }

    pub fn summary(&self) -> PortfolioSummary {
        PortfolioSummary {
            total_value: self.total_value().round_dp(2),
            total_cost_basis: self.total_cost_basis().round_dp(2),
            total_pnl: self.total_pnl().round_dp(2),
            total_return_pct: self.total_return_pct().round_dp(2),
            position_count: self.positions.len(),
            diversification_score: self.diversification_score(),
            positions: self.positions.iter().map(Position::summary).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Portfolio {
        let mut portfolio = Portfolio::new();
        portfolio.add_position(Position::new("AAPL", 100, dec!(150), dec!(180)));
        portfolio.add_position(Position::new("MSFT", 50, dec!(300), dec!(350)));
        portfolio.add_position(Position::new("GOOGL", 30, dec!(120), dec!(140)));
        portfolio
    }

    #[test]
    fn position_metrics() {
        let position = Position::new("AAPL", 100, dec!(150), dec!(180));
        assert_eq!(position.value(), dec!(18000));
        assert_eq!(position.cost_basis(), dec!(15000));
        assert_eq!(position.pnl(), dec!(3000));
        assert_eq!(position.return_pct(), dec!(20));
    }

    #[test]
    fn zero_buy_price_has_zero_return() {
        assert_eq!(Position::new("X", 1, dec!(0), dec!(5)).return_pct(), dec!(0));
    }

    #[test]
    fn totals() {
        let portfolio = sample();
        // 18000 + 17500 + 4200
        assert_eq!(portfolio.total_value(), dec!(39700));
        assert_eq!(portfolio.total_cost_basis(), dec!(33600));
        assert_eq!(portfolio.total_pnl(), dec!(6100));
        assert_eq!(portfolio.summary().total_return_pct, dec!(18.15));
    }

    #[test]
    fn concentration_and_diversification() {
        let portfolio = sample();
        let concentration = portfolio.concentration().unwrap();
        assert_eq!(concentration.symbol, "AAPL");
        assert_eq!(concentration.max_pct, dec!(45.34));
        assert_eq!(concentration.weights["GOOGL"], dec!(10.58));
        // 100 - |45.34 - 33.33..| * 2
        assert_eq!(portfolio.diversification_score(), dec!(75.99));
    }

    #[test]
    fn single_or_empty_portfolio_is_undiversified() {
        let mut portfolio = Portfolio::new();
        assert!(portfolio.concentration().is_none());
        assert_eq!(portfolio.diversification_score(), dec!(0));

        portfolio.add_position(Position::new("AAPL", 10, dec!(1), dec!(1)));
        assert_eq!(portfolio.concentration().unwrap().max_pct, dec!(100));
        assert_eq!(portfolio.diversification_score(), dec!(0));
    }

    #[test]
    fn remove_and_lookup() {
        let mut portfolio = sample();
        assert!(portfolio.get_position("MSFT").is_some());
        assert!(portfolio.remove_position("MSFT"));
        assert!(!portfolio.remove_position("MSFT"));
        assert!(portfolio.get_position("MSFT").is_none());
        assert_eq!(portfolio.summary().position_count, 2);
    }

    #[test]
    fn loads_from_toml() {
        let portfolio: Portfolio = toml::from_str(
            r#"
[[positions]]
symbol = "JPM"
shares = 20
buy_price = "140.50"
current_price = "195.00"
"#,
        )
        .unwrap();
        assert_eq!(portfolio.positions.len(), 1);
        assert_eq!(portfolio.positions[0].buy_price, dec!(140.50));
    }
}
