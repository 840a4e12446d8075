//! Stateless price-series transforms.
//!
//! Nothing here touches the ledger or the simulator; these are plain
//! functions over already-fetched series, available to strategy code.

pub mod heikin_ashi;
pub mod macd;
pub mod moving_average;
pub mod price;
pub mod rsi;
