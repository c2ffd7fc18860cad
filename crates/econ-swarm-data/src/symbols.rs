use crate::exposure::exposure_for;
use crate::market::financials_for;

/// Widely held symbols recognised in free text in any letter case.
///
/// Symbols that double as English words (ON, ALL, CAT, COST, IT) are left out;
/// queries name those with a `$` prefix.
const KNOWN_SYMBOLS: &[&str] = &[
    "AAPL", "ABBV", "ADBE", "AMD", "AMZN", "AVGO", "BAC", "CRM", "CSCO", "CVX", "GOOG",
    "GOOGL", "GS", "HSBC", "IBM", "INTC", "JNJ", "JPM", "KO", "LLY", "MCD", "MRK", "MSFT",
    "NFLX", "NKE", "NVDA", "ORCL", "PFE", "PG", "QCOM", "SBUX", "TSLA", "TSM", "UNH",
    "WFC", "WMT", "XOM",
];

/// Whether `symbol` names a company this crate knows about.
pub fn is_known_symbol(symbol: &str) -> bool {
    let symbol = symbol.trim().to_ascii_uppercase();
    KNOWN_SYMBOLS.contains(&symbol.as_str())
        || exposure_for(&symbol).is_some()
        || financials_for(&symbol).is_some()
}
