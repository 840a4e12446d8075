//! Brokerage commission model.
//!
//! Fees are proportional to trade value with a broker-imposed floor:
//! `fee = max(rate * trade_value, minimum)`, rounded to cents.

use super::error::MarketsimError;

#[derive(Debug, Clone, PartialEq)]
pub struct Commission {
    rate: f64,
    minimum: f64,
}

/// Round to 2 decimal places, i.e. whole cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Commission {
    pub fn new(rate: f64, minimum: f64) -> Result<Self, MarketsimError> {
        if rate <= 0.0 {
            return Err(MarketsimError::InvalidCommission {
                reason: "rate has to be a positive value".to_string(),
            });
        }
        if minimum < 0.0 {
            return Err(MarketsimError::InvalidCommission {
                reason: "minimum has to be a non-negative value".to_string(),
            });
        }
        Ok(Self { rate, minimum })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    /// Fee charged for a trade of the given notional value.
    pub fn fee(&self, trade_value: f64) -> f64 {
        round2((self.rate * trade_value).max(self.minimum))
    }

    /// The trade size below which the minimum fee dominates the
    /// proportional rate. Investing less than this overpays commission.
    pub fn minimal_recommended_investment(&self) -> f64 {
        self.minimum / self.rate
    }
}
