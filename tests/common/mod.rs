#![allow(dead_code)]

use chrono::NaiveDate;
use marketsim::domain::error::MarketsimError;
use marketsim::domain::ledger::LedgerView;
pub use marketsim::domain::ohlc::OhlcBar;
use marketsim::domain::order::DayIntents;
use marketsim::domain::strategy::Strategy;
use marketsim::ports::quote_port::{PriceField, QuotePort};
use std::collections::{BTreeMap, HashMap};

pub struct MockQuotes {
    pub bars: HashMap<String, BTreeMap<NaiveDate, OhlcBar>>,
}

impl MockQuotes {
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcBar>) -> Self {
        self.bars
            .insert(ticker.to_string(), bars.into_iter().map(|b| (b.date, b)).collect());
        self
    }
}

impl QuotePort for MockQuotes {
    fn price(&self, ticker: &str, date: NaiveDate, field: PriceField) -> Option<f64> {
        let bar = self.bars.get(ticker)?.get(&date)?;
        Some(match field {
            PriceField::Open => bar.open,
            PriceField::High => bar.high,
            PriceField::Low => bar.low,
            PriceField::Close => bar.close,
        })
    }

    fn tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self.bars.keys().cloned().collect();
        tickers.sort();
        tickers
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_bar(day: &str, open: f64, high: f64, low: f64, close: f64) -> OhlcBar {
    OhlcBar {
        date: date(day),
        open,
        high,
        low,
        close,
        volume: 1000,
    }
}

/// Flat bar where every field is the same price.
pub fn flat_bar(day: &str, price: f64) -> OhlcBar {
    make_bar(day, price, price, price, price)
}

/// Replays a fixed sequence of day intents, one per evaluation.
#[derive(Debug)]
pub struct ScriptedStrategy {
    script: Vec<DayIntents>,
    next: usize,
}

impl ScriptedStrategy {
    pub fn new(script: Vec<DayIntents>) -> Self {
        Self { script, next: 0 }
    }
}

impl Strategy for ScriptedStrategy {
    fn name(&self) -> &str {
        "scripted"
    }

    fn evaluate(
        &mut self,
        _day: NaiveDate,
        _quotes: &dyn QuotePort,
        _ledger: &LedgerView,
    ) -> Result<DayIntents, MarketsimError> {
        let intents = self
            .script
            .get(self.next)
            .cloned()
            .unwrap_or_else(DayIntents::none);
        self.next += 1;
        Ok(intents)
    }
}

pub fn buy_intent(ticker: &str) -> DayIntents {
    DayIntents {
        buy: vec![ticker.to_string()],
        sell: Vec::new(),
    }
}

pub fn sell_intent(ticker: &str) -> DayIntents {
    DayIntents {
        buy: Vec::new(),
        sell: vec![ticker.to_string()],
    }
}
