pub mod error;
pub mod exposure;
pub mod fred;
pub mod market;
pub mod memory;
pub mod mock;
pub mod source;
pub mod symbols;

pub use error::DataError;
pub use exposure::exposure_for;
pub use fred::FredClient;
pub use market::{financials_for, market_indicator, MARKET_INDICATORS};
pub use memory::CachedDataSource;
pub use mock::MockDataSource;
pub use source::{build_source, EconomicDataSource};
pub use symbols::is_known_symbol;
