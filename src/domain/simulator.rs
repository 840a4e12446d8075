//! Day-by-day strategy simulation over a historical time series.
//!
//! Each trading day runs a fixed phase sequence: apply yesterday's
//! deferred buy intents, apply yesterday's deferred sell intents, ask the
//! strategy for tomorrow's intents, enforce take-profit/stop-loss policy,
//! mark held positions at the close, and record a valuation snapshot.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;

use super::commission::round2;
use super::error::MarketsimError;
use super::ledger::{calculate_investment_value, Ledger};
use super::strategy::Strategy;
use crate::ports::quote_port::{PriceField, QuotePort};

/// Risk-control and sizing parameters for one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Maximum number of different tickers held at once; sizes each
    /// purchase at an equal share of total value.
    pub max_positions: u32,
    /// Sell once unrealized change exceeds this fraction. 0 disables.
    pub take_profit: f64,
    /// Sell once unrealized change falls below minus this fraction.
    /// 0 disables.
    pub stop_loss: f64,
    /// When true, exits fill intraday against the session high/low
    /// instead of waiting for the next day's open.
    pub live_trading: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            max_positions: 5,
            take_profit: 0.0,
            stop_loss: 0.0,
            live_trading: false,
        }
    }
}

/// One row of the simulation output: portfolio value at end of day.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationSnapshot {
    pub date: NaiveDate,
    pub total_value: f64,
}

/// How a recorded fill came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    Buy,
    Sell,
    TakeProfit,
    StopLoss,
}

impl TradeAction {
    pub fn label(&self) -> &'static str {
        match self {
            TradeAction::Buy => "B",
            TradeAction::Sell => "S",
            TradeAction::TakeProfit => "TP",
            TradeAction::StopLoss => "SL",
        }
    }

    /// Whether the fill realized or booked a gain relative to entry.
    pub fn is_exit(&self) -> bool {
        !matches!(self, TradeAction::Buy)
    }
}

/// An executed fill, kept for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub action: TradeAction,
    pub ticker: String,
    pub volume: u64,
    pub price: f64,
}

impl fmt::Display for TradeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:<2} {} \t {:>4} \t for {}",
            self.date,
            self.action.label(),
            self.ticker,
            self.volume,
            round2(self.price),
        )
    }
}

/// The execution engine: owns the ledger and drives the day loop.
///
/// Single-threaded by design; parameter sweeps need one `Simulator` per
/// run, nothing is shared safely across runs.
#[derive(Debug)]
pub struct Simulator {
    days: Vec<NaiveDate>,
    ledger: Ledger,
    config: SimulatorConfig,
    pending_buys: Vec<String>,
    pending_sells: Vec<String>,
    history: Vec<ValuationSnapshot>,
    trades: Vec<TradeRecord>,
}

impl Simulator {
    /// `days` must already be filtered to trading days; the simulator
    /// does no holiday skipping of its own.
    pub fn new(days: Vec<NaiveDate>, ledger: Ledger, config: SimulatorConfig) -> Self {
        Self {
            days,
            ledger,
            config,
            pending_buys: Vec::new(),
            pending_sells: Vec::new(),
            history: Vec::new(),
            trades: Vec::new(),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Valuation history recorded so far; on an aborted run it holds
    /// every day up to the failure.
    pub fn history(&self) -> &[ValuationSnapshot] {
        &self.history
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    /// Restore the configured initial state for a fresh strategy trial.
    pub fn reset(&mut self) {
        self.ledger.reset();
        self.pending_buys.clear();
        self.pending_sells.clear();
        self.history.clear();
        self.trades.clear();
    }

    /// Run the strategy over the whole day sequence. Returns the recorded
    /// valuation history; a strategy failure aborts the run and reports
    /// the last successfully recorded snapshot date.
    pub fn run(
        &mut self,
        quotes: &dyn QuotePort,
        strategy: &mut dyn Strategy,
    ) -> Result<Vec<ValuationSnapshot>, MarketsimError> {
        let days = self.days.clone();
        for day in days {
            self.step(day, quotes, strategy)?;
        }
        Ok(self.history.clone())
    }

    fn step(
        &mut self,
        day: NaiveDate,
        quotes: &dyn QuotePort,
        strategy: &mut dyn Strategy,
    ) -> Result<(), MarketsimError> {
        let buys = std::mem::take(&mut self.pending_buys);
        let mut sells = std::mem::take(&mut self.pending_sells);

        // Deferred buys, selected the day before. List order matters:
        // the strategy ranks candidates, high priority first.
        for tck in &buys {
            if self.ledger.volume_of(tck) > 0 {
                continue;
            }
            let Some(open) = quotes.price(tck, day, PriceField::Open) else {
                continue;
            };
            let mut investable = calculate_investment_value(&self.ledger, self.config.max_positions);
            investable -= self.ledger.commission().fee(investable);
            let volume = if investable > 0.0 {
                (investable / open).floor() as u64
            } else {
                0
            };
            if volume > 0 && self.ledger.buy(tck, volume, open) {
                self.record(day, TradeAction::Buy, tck, volume, open);
                // A same-day re-buy cancels a pending sell.
                sells.retain(|t| t != tck);
            }
        }

        // Deferred sells. Order is irrelevant here, so duplicates are
        // collapsed away.
        for tck in sells.iter().collect::<BTreeSet<_>>() {
            if self.ledger.volume_of(tck) == 0 {
                continue;
            }
            if let Some(open) = quotes.price(tck, day, PriceField::Open) {
                let volume = self.ledger.sell_all(tck, open);
                if volume > 0 {
                    self.record(day, TradeAction::Sell, tck, volume, open);
                }
            }
        }

        // Ask the strategy for tomorrow's intents. Strategy errors are
        // fatal; the run stops with a pointer at the partial history.
        let intents = strategy
            .evaluate(day, quotes, &self.ledger.view())
            .map_err(|e| MarketsimError::RunAborted {
                day,
                last_snapshot: self.history.last().map(|s| s.date),
                source: Box::new(e),
            })?;
        self.pending_buys = intents.buy;
        self.pending_sells = intents.sell;

        if self.config.live_trading {
            self.check_intraday_exits(day, quotes);
        }

        self.close_of_day(day, quotes);

        self.history.push(ValuationSnapshot {
            date: day,
            total_value: self.ledger.total_value(),
        });
        Ok(())
    }

    /// Intraday exit policy: take-profit against the session high, then
    /// stop-loss against the session low. A take-profit exit skips the
    /// stop-loss check for that ticker the same day. Fills model an
    /// intraday limit order at the threshold price, not the session
    /// extreme.
    fn check_intraday_exits(&mut self, day: NaiveDate, quotes: &dyn QuotePort) {
        let take_profit = self.config.take_profit;
        let stop_loss = self.config.stop_loss;

        for tck in self.ledger.held_tickers() {
            if take_profit > 0.0 {
                if let Some(high) = quotes.price(&tck, day, PriceField::High) {
                    self.ledger.mark_to_market(&tck, high);
                }
                if let Some(pos) = self.ledger.position(&tck) {
                    if pos.unrealized_change() > take_profit {
                        let price = round2(pos.cost_basis * (1.0 + take_profit));
                        let volume = self.ledger.sell_all(&tck, price);
                        self.record(day, TradeAction::TakeProfit, &tck, volume, price);
                        continue;
                    }
                }
            }

            if stop_loss > 0.0 {
                if let Some(low) = quotes.price(&tck, day, PriceField::Low) {
                    self.ledger.mark_to_market(&tck, low);
                }
                if let Some(pos) = self.ledger.position(&tck) {
                    if pos.unrealized_change() < -stop_loss {
                        let price = round2(pos.cost_basis * (1.0 - stop_loss));
                        let volume = self.ledger.sell_all(&tck, price);
                        self.record(day, TradeAction::StopLoss, &tck, volume, price);
                    }
                }
            }
        }
    }

    /// Mark every held position at the close. When live trading is off,
    /// exit thresholds queue a sale for tomorrow's open instead of
    /// filling immediately; a ticker is queued at most once per day.
    fn close_of_day(&mut self, day: NaiveDate, quotes: &dyn QuotePort) {
        let take_profit = self.config.take_profit;
        let stop_loss = self.config.stop_loss;

        for tck in self.ledger.held_tickers() {
            if let Some(close) = quotes.price(&tck, day, PriceField::Close) {
                self.ledger.mark_to_market(&tck, close);
            }

            if self.config.live_trading {
                continue;
            }
            let Some(pos) = self.ledger.position(&tck) else {
                continue;
            };
            let change = pos.unrealized_change();
            let tp_tripped = take_profit > 0.0 && change > take_profit;
            let sl_tripped = stop_loss > 0.0 && change < -stop_loss;
            if (tp_tripped || sl_tripped) && !self.pending_sells.contains(&tck) {
                self.pending_sells.push(tck);
            }
        }
    }

    fn record(&mut self, date: NaiveDate, action: TradeAction, ticker: &str, volume: u64, price: f64) {
        self.trades.push(TradeRecord {
            date,
            action,
            ticker: ticker.to_string(),
            volume,
            price,
        });
    }
}
