//! Open position tracking.

/// A currently held stock position.
///
/// Exists only while `volume > 0`; the ledger removes it when the last
/// share is sold. `cost_basis` is the weighted-average purchase price,
/// `mark_price` the most recently observed market price.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub ticker: String,
    pub volume: u64,
    pub cost_basis: f64,
    pub mark_price: f64,
}

impl Position {
    pub fn market_value(&self) -> f64 {
        self.volume as f64 * self.mark_price
    }

    /// Relative change of the mark price against the purchase price.
    pub fn unrealized_change(&self) -> f64 {
        (self.mark_price - self.cost_basis) / self.cost_basis
    }
}
