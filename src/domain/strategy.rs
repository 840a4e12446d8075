//! Strategy trait and built-in strategies.
//!
//! A strategy decides on day N what to trade at day N+1's open. It sees
//! market data through the quote port and the portfolio through a
//! read-only [`LedgerView`]; all mutation stays inside the simulator.

use chrono::NaiveDate;
use std::collections::HashMap;

use super::analysis::moving_average::simple_moving_average;
use super::error::MarketsimError;
use super::ledger::LedgerView;
use super::order::DayIntents;
use crate::ports::quote_port::{PriceField, QuotePort};

pub trait Strategy: std::fmt::Debug {
    fn name(&self) -> &str {
        "strategy"
    }

    /// Called once per trading day, after that day's deferred orders have
    /// been applied. Returns intents for the next session's open.
    fn evaluate(
        &mut self,
        day: NaiveDate,
        quotes: &dyn QuotePort,
        ledger: &LedgerView,
    ) -> Result<DayIntents, MarketsimError>;
}

/// Close-over-SMA strategy: buy a watched ticker when its close is above
/// the moving average of recent closes, sell when it drops below.
///
/// Keeps its own per-ticker close history, so it only ever needs the
/// day-level quote lookup the simulator already provides.
#[derive(Debug)]
pub struct SmaCrossStrategy {
    tickers: Vec<String>,
    window: usize,
    closes: HashMap<String, Vec<f64>>,
}

impl SmaCrossStrategy {
    pub fn new(tickers: Vec<String>, window: usize) -> Self {
        Self {
            tickers,
            window,
            closes: HashMap::new(),
        }
    }
}

impl Strategy for SmaCrossStrategy {
    fn name(&self) -> &str {
        "sma_cross"
    }

    fn evaluate(
        &mut self,
        day: NaiveDate,
        quotes: &dyn QuotePort,
        ledger: &LedgerView,
    ) -> Result<DayIntents, MarketsimError> {
        let mut intents = DayIntents::none();

        for tck in &self.tickers {
            let Some(close) = quotes.price(tck, day, PriceField::Close) else {
                continue;
            };
            let history = self.closes.entry(tck.clone()).or_default();
            history.push(close);

            // No signal until a full window of closes exists.
            let sma = simple_moving_average(history, self.window, self.window);
            let Some(Some(sma)) = sma.last().copied() else {
                continue;
            };

            let held = ledger.volume_of(tck) > 0;
            if close > sma && !held {
                intents.buy.push(tck.clone());
            } else if close < sma && held {
                intents.sell.push(tck.clone());
            }
        }

        Ok(intents)
    }
}
