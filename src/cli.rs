//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_history_adapter::write_history;
use crate::adapters::csv_quote_adapter::CsvQuoteAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::MarketsimError;
use crate::domain::settings::{parse_tickers, SimulationSettings};
use crate::domain::simulator::{TradeAction, TradeRecord};
use crate::domain::strategy::{SmaCrossStrategy, Strategy};
use crate::ports::quote_port::QuotePort;

#[derive(Parser, Debug)]
#[command(name = "marketsim", about = "Trading strategy simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a simulation
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory with per-ticker OHLCV CSV files
        #[arg(short, long)]
        data: PathBuf,
        /// Write the valuation history to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a simulation configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show date ranges for ticker data files
    Info {
        #[arg(short, long)]
        data: PathBuf,
        /// Comma-separated ticker list; defaults to every file found
        #[arg(long)]
        tickers: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            config,
            data,
            output,
        } => run_simulate(&config, &data, output.as_ref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { data, tickers } => run_info(&data, tickers.as_deref()),
    }
}

fn load_settings(path: &PathBuf) -> Result<SimulationSettings, MarketsimError> {
    let adapter =
        FileConfigAdapter::from_file(path).map_err(|e| MarketsimError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
    SimulationSettings::from_config(&adapter)
}

pub fn build_strategy(
    settings: &SimulationSettings,
) -> Result<Box<dyn Strategy>, MarketsimError> {
    match settings.strategy_name.as_str() {
        "sma_cross" => Ok(Box::new(SmaCrossStrategy::new(
            settings.tickers.clone(),
            settings.strategy_window,
        ))),
        other => Err(MarketsimError::ConfigInvalid {
            section: "strategy".into(),
            key: "name".into(),
            reason: format!("unknown strategy: {other}"),
        }),
    }
}

fn run_simulate(config_path: &PathBuf, data_path: &PathBuf, output: Option<&PathBuf>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Loading quotes for {} tickers from {}",
        settings.tickers.len(),
        data_path.display()
    );
    let quotes = match CsvQuoteAdapter::load(data_path, &settings.tickers) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut simulator = match settings.build_simulator() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let mut strategy = match build_strategy(&settings) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Simulating {} ({} - {}, {} trading days)",
        strategy.name(),
        settings.start_date,
        settings.end_date,
        settings.trading_days().len(),
    );

    let run_error = simulator.run(&quotes, strategy.as_mut()).err();

    for trade in simulator.trades() {
        println!("{}", format_trade(trade));
    }

    if let Some(last) = simulator.history().last() {
        let total_return = if settings.initial_cash > 0.0 {
            (last.total_value - settings.initial_cash) / settings.initial_cash * 100.0
        } else {
            0.0
        };
        println!(
            "Final value on {}: {:.2} ({:+.2}%)",
            last.date, last.total_value, total_return
        );
    }

    if let Some(path) = output {
        if let Err(e) = write_history(path, simulator.history()) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("History written to {}", path.display());
    }

    match run_error {
        Some(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
        None => ExitCode::SUCCESS,
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    match load_settings(config_path) {
        Ok(settings) => {
            println!(
                "Config OK: {} tickers, {} trading days",
                settings.tickers.len(),
                settings.trading_days().len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(data_path: &PathBuf, tickers: Option<&str>) -> ExitCode {
    let tickers = match tickers {
        Some(list) => match parse_tickers(list) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
        None => match discover_tickers(data_path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
    };

    let quotes = match CsvQuoteAdapter::load(data_path, &tickers) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for ticker in quotes.tickers() {
        let bars = quotes.bars(&ticker);
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => {
                println!("{}: {} - {} ({} bars)", ticker, first.date, last.date, bars.len())
            }
            _ => println!("{ticker}: no data"),
        }
    }
    ExitCode::SUCCESS
}

/// Every `*.csv` file stem in the data directory, sorted.
fn discover_tickers(data_path: &PathBuf) -> Result<Vec<String>, MarketsimError> {
    let entries = std::fs::read_dir(data_path).map_err(|e| MarketsimError::Data {
        reason: format!("failed to read directory {}: {}", data_path.display(), e),
    })?;

    let mut tickers = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MarketsimError::Data {
            reason: format!("directory entry error: {e}"),
        })?;
        let name = entry.file_name();
        let name_str = name.to_string_lossy();
        if let Some(stem) = name_str.strip_suffix(".csv") {
            tickers.push(stem.to_string());
        }
    }
    tickers.sort();
    Ok(tickers)
}

/// Trade line with the original report coloring: take-profit exits in
/// green, stop-loss exits in red.
fn format_trade(trade: &TradeRecord) -> String {
    match trade.action {
        TradeAction::TakeProfit => format!("\x1b[92m{trade}\x1b[0m"),
        TradeAction::StopLoss => format!("\x1b[91m{trade}\x1b[0m"),
        _ => trade.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_settings() -> SimulationSettings {
        SimulationSettings {
            commission_rate: 0.01,
            commission_minimum: 3.0,
            initial_cash: 1000.0,
            max_positions: 5,
            take_profit: 0.0,
            stop_loss: 0.0,
            live_trading: false,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            tickers: vec!["CCC".into()],
            strategy_name: "sma_cross".into(),
            strategy_window: 10,
        }
    }

    #[test]
    fn build_strategy_known_name() {
        let strategy = build_strategy(&sample_settings()).unwrap();
        assert_eq!(strategy.name(), "sma_cross");
    }

    #[test]
    fn build_strategy_unknown_name_fails() {
        let mut settings = sample_settings();
        settings.strategy_name = "astrology".into();
        let err = build_strategy(&settings).unwrap_err();
        assert!(matches!(err, MarketsimError::ConfigInvalid { key, .. } if key == "name"));
    }

    #[test]
    fn format_trade_colors_exits() {
        let trade = TradeRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
            action: TradeAction::TakeProfit,
            ticker: "CCC".into(),
            volume: 5,
            price: 110.0,
        };
        assert!(format_trade(&trade).starts_with("\x1b[92m"));

        let plain = TradeRecord {
            action: TradeAction::Buy,
            ..trade
        };
        assert!(!format_trade(&plain).contains('\x1b'));
    }
}
