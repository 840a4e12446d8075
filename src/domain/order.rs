//! Shared order intent types.

/// Which way a deferred order trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

/// A strategy's wish to trade a ticker at the next session's open.
///
/// Intents have no lifecycle of their own; they live in the simulator's
/// queues for exactly one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderIntent {
    pub ticker: String,
    pub side: Side,
}

/// What a strategy returns for one trading day.
///
/// Buy intents are an ordered list: the strategy ranks them and the
/// simulator fills them first-to-last while cash allows. Sell intents
/// carry no ordering; they are deduplicated before execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayIntents {
    pub buy: Vec<String>,
    pub sell: Vec<String>,
}

impl DayIntents {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn intents(&self) -> Vec<OrderIntent> {
        let buys = self.buy.iter().map(|t| OrderIntent {
            ticker: t.clone(),
            side: Side::Buy,
        });
        let sells = self.sell.iter().map(|t| OrderIntent {
            ticker: t.clone(),
            side: Side::Sell,
        });
        buys.chain(sells).collect()
    }
}
