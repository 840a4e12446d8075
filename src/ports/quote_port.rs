//! Market data access port trait.

use chrono::NaiveDate;

/// Which field of a daily OHLC bar to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
}

/// Read-only per-ticker, per-day price lookup.
///
/// `None` means the price is not available that day (market holiday,
/// ticker not yet listed, gap in the source data).
pub trait QuotePort {
    fn price(&self, ticker: &str, date: NaiveDate, field: PriceField) -> Option<f64>;

    fn tickers(&self) -> Vec<String>;
}
