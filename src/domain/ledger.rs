//! Cash-and-positions ledger with commission-aware accounting.
//!
//! All mutation goes through [`Ledger`] methods; strategies only ever see
//! the read-only [`LedgerView`]. Operations that would overdraw cash or
//! oversell a position are rejected without partial effects.

use std::collections::HashMap;

use super::commission::Commission;
use super::error::MarketsimError;
use super::position::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    cash: f64,
    initial_cash: f64,
    commission: Commission,
    positions: HashMap<String, Position>,
}

impl Ledger {
    pub fn new(commission: Commission, initial_cash: f64) -> Self {
        Self {
            cash: initial_cash,
            initial_cash,
            commission,
            positions: HashMap::new(),
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn commission(&self) -> &Commission {
        &self.commission
    }

    /// Mark-to-market value of all open positions.
    pub fn positions_value(&self) -> f64 {
        self.positions.values().map(Position::market_value).sum()
    }

    pub fn total_value(&self) -> f64 {
        self.cash + self.positions_value()
    }

    pub fn position(&self, ticker: &str) -> Option<&Position> {
        self.positions.get(ticker)
    }

    pub fn volume_of(&self, ticker: &str) -> u64 {
        self.positions.get(ticker).map_or(0, |p| p.volume)
    }

    pub fn cost_basis_of(&self, ticker: &str) -> Option<f64> {
        self.positions.get(ticker).map(|p| p.cost_basis)
    }

    /// Snapshot of currently held tickers, sorted for deterministic
    /// iteration.
    pub fn held_tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self.positions.keys().cloned().collect();
        tickers.sort();
        tickers
    }

    /// Buy `volume` shares at `price`. The full debit is
    /// `volume * price + fee`. Returns `false` without any state change
    /// when the debit exceeds available cash.
    pub fn buy(&mut self, ticker: &str, volume: u64, price: f64) -> bool {
        if volume == 0 || price <= 0.0 {
            return false;
        }

        let cost = volume as f64 * price;
        let debit = cost + self.commission.fee(cost);
        if debit > self.cash {
            return false;
        }

        match self.positions.get_mut(ticker) {
            Some(pos) => {
                // Accumulate into the weighted-average purchase price.
                let old_volume = pos.volume as f64;
                pos.cost_basis = (price * volume as f64 + pos.cost_basis * old_volume)
                    / (volume as f64 + old_volume);
                pos.volume += volume;
                pos.mark_price = price;
            }
            None => {
                self.positions.insert(
                    ticker.to_string(),
                    Position {
                        ticker: ticker.to_string(),
                        volume,
                        cost_basis: price,
                        mark_price: price,
                    },
                );
            }
        }

        self.cash -= debit;
        true
    }

    /// Sell `volume` shares at `price`, crediting proceeds net of fee.
    /// Returns `false` without any state change on oversell or when the
    /// ticker is not held. The position is removed once volume hits zero.
    pub fn sell(&mut self, ticker: &str, volume: u64, price: f64) -> bool {
        if volume == 0 || price <= 0.0 {
            return false;
        }

        let Some(pos) = self.positions.get_mut(ticker) else {
            return false;
        };
        if volume > pos.volume {
            return false;
        }

        if volume == pos.volume {
            self.positions.remove(ticker);
        } else {
            pos.volume -= volume;
            pos.mark_price = price;
        }

        let proceeds = volume as f64 * price;
        self.cash += proceeds - self.commission.fee(proceeds);
        true
    }

    /// Sell the entire held volume. Returns the volume sold, 0 if the
    /// ticker is not held.
    pub fn sell_all(&mut self, ticker: &str, price: f64) -> u64 {
        let volume = self.volume_of(ticker);
        if volume > 0 && self.sell(ticker, volume, price) {
            volume
        } else {
            0
        }
    }

    /// Update the recorded market price of a held position. No cash
    /// movement; no-op if the ticker is not held.
    pub fn mark_to_market(&mut self, ticker: &str, price: f64) {
        if let Some(pos) = self.positions.get_mut(ticker) {
            pos.mark_price = price;
        }
    }

    /// Relative change of the mark price against the purchase price.
    pub fn unrealized_change(&self, ticker: &str) -> Result<f64, MarketsimError> {
        self.positions
            .get(ticker)
            .map(Position::unrealized_change)
            .ok_or_else(|| MarketsimError::NotHeld {
                ticker: ticker.to_string(),
            })
    }

    /// Restore initial cash and drop all positions, for a fresh run.
    pub fn reset(&mut self) {
        self.cash = self.initial_cash;
        self.positions.clear();
    }

    pub fn view(&self) -> LedgerView<'_> {
        LedgerView { ledger: self }
    }
}

/// Read-only view of a [`Ledger`], handed to strategy code.
///
/// Strategies must not be able to move cash or shares; every accessor
/// here borrows immutably.
#[derive(Debug, Clone, Copy)]
pub struct LedgerView<'a> {
    ledger: &'a Ledger,
}

impl LedgerView<'_> {
    pub fn cash(&self) -> f64 {
        self.ledger.cash()
    }

    pub fn total_value(&self) -> f64 {
        self.ledger.total_value()
    }

    pub fn held_tickers(&self) -> Vec<String> {
        self.ledger.held_tickers()
    }

    pub fn volume_of(&self, ticker: &str) -> u64 {
        self.ledger.volume_of(ticker)
    }

    pub fn cost_basis_of(&self, ticker: &str) -> Option<f64> {
        self.ledger.cost_basis_of(ticker)
    }
}

/// Cash to commit to the next purchase: an equal share of total value per
/// position slot, floored at the minimal recommended investment and capped
/// at available cash. Zero when cash itself is below the recommended
/// minimum.
pub fn calculate_investment_value(ledger: &Ledger, max_positions: u32) -> f64 {
    let min_value = ledger.commission().minimal_recommended_investment();
    if ledger.cash() > min_value {
        let max_value = ledger.total_value() / max_positions as f64;
        max_value.max(min_value).min(ledger.cash())
    } else {
        0.0
    }
}
