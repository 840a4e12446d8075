//! Core domain types and logic.

pub mod analysis;
pub mod commission;
pub mod error;
pub mod ledger;
pub mod ohlc;
pub mod order;
pub mod position;
pub mod settings;
pub mod simulator;
pub mod strategy;
