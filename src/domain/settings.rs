//! Typed simulation settings built and validated from a config port.

use chrono::{Datelike, NaiveDate, Weekday};

use super::commission::Commission;
use super::error::MarketsimError;
use super::ledger::Ledger;
use super::simulator::{Simulator, SimulatorConfig};
use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    pub commission_rate: f64,
    pub commission_minimum: f64,
    pub initial_cash: f64,
    pub max_positions: u32,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub live_trading: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub tickers: Vec<String>,
    pub strategy_name: String,
    pub strategy_window: usize,
}

impl SimulationSettings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, MarketsimError> {
        let commission_rate = config.get_double("commission", "rate", 0.0);
        if commission_rate <= 0.0 {
            return Err(invalid("commission", "rate", "rate must be positive"));
        }
        let commission_minimum = config.get_double("commission", "minimum", 0.0);
        if commission_minimum < 0.0 {
            return Err(invalid(
                "commission",
                "minimum",
                "minimum must be non-negative",
            ));
        }

        let initial_cash = config.get_double("simulation", "initial_cash", 0.0);
        if initial_cash < 0.0 {
            return Err(invalid(
                "simulation",
                "initial_cash",
                "initial_cash must be non-negative",
            ));
        }

        let max_positions = config.get_int("simulation", "max_positions", 5);
        if max_positions < 1 {
            return Err(invalid(
                "simulation",
                "max_positions",
                "max_positions must be at least 1",
            ));
        }

        let take_profit = config.get_double("simulation", "take_profit", 0.0);
        if take_profit < 0.0 {
            return Err(invalid(
                "simulation",
                "take_profit",
                "take_profit must be non-negative",
            ));
        }
        let stop_loss = config.get_double("simulation", "stop_loss", 0.0);
        if stop_loss < 0.0 {
            return Err(invalid(
                "simulation",
                "stop_loss",
                "stop_loss must be non-negative",
            ));
        }

        let live_trading = config.get_bool("simulation", "live_trading", false);

        let start_date = parse_date(config.get_string("simulation", "start_date"), "start_date")?;
        let end_date = parse_date(config.get_string("simulation", "end_date"), "end_date")?;
        if start_date >= end_date {
            return Err(invalid(
                "simulation",
                "start_date",
                "start_date must be before end_date",
            ));
        }

        let tickers_str = match config.get_string("simulation", "tickers") {
            Some(s) if !s.trim().is_empty() => s,
            _ => {
                return Err(MarketsimError::ConfigMissing {
                    section: "simulation".into(),
                    key: "tickers".into(),
                })
            }
        };
        let tickers = parse_tickers(&tickers_str)?;

        let strategy_name = config
            .get_string("strategy", "name")
            .unwrap_or_else(|| "sma_cross".to_string());
        let strategy_window = config.get_int("strategy", "window", 20);
        if strategy_window < 1 {
            return Err(invalid("strategy", "window", "window must be at least 1"));
        }

        Ok(Self {
            commission_rate,
            commission_minimum,
            initial_cash,
            max_positions: max_positions as u32,
            take_profit,
            stop_loss,
            live_trading,
            start_date,
            end_date,
            tickers,
            strategy_name,
            strategy_window: strategy_window as usize,
        })
    }

    pub fn commission(&self) -> Result<Commission, MarketsimError> {
        Commission::new(self.commission_rate, self.commission_minimum)
    }

    pub fn simulator_config(&self) -> SimulatorConfig {
        SimulatorConfig {
            max_positions: self.max_positions,
            take_profit: self.take_profit,
            stop_loss: self.stop_loss,
            live_trading: self.live_trading,
        }
    }

    /// Weekday sequence between the configured dates, inclusive. Exchange
    /// holidays stay in the list; days without quotes are skipped by the
    /// simulator anyway.
    pub fn trading_days(&self) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut day = self.start_date;
        while day <= self.end_date {
            if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                days.push(day);
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        days
    }

    pub fn build_simulator(&self) -> Result<Simulator, MarketsimError> {
        let ledger = Ledger::new(self.commission()?, self.initial_cash);
        Ok(Simulator::new(
            self.trading_days(),
            ledger,
            self.simulator_config(),
        ))
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> MarketsimError {
    MarketsimError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_date(value: Option<String>, field: &str) -> Result<NaiveDate, MarketsimError> {
    match value {
        None => Err(MarketsimError::ConfigMissing {
            section: "simulation".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
            invalid(
                "simulation",
                field,
                &format!("invalid {field} format, expected YYYY-MM-DD"),
            )
        }),
    }
}

/// Split a comma-separated ticker list, uppercased, rejecting empty
/// tokens and duplicates.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, MarketsimError> {
    let mut tickers = Vec::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(invalid(
                "simulation",
                "tickers",
                "empty token in ticker list",
            ));
        }
        let ticker = trimmed.to_uppercase();
        if tickers.contains(&ticker) {
            return Err(invalid(
                "simulation",
                "tickers",
                &format!("duplicate ticker: {ticker}"),
            ));
        }
        tickers.push(ticker);
    }

    Ok(tickers)
}
