//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for marketsim.
#[derive(Debug, thiserror::Error)]
pub enum MarketsimError {
    #[error("invalid commission: {reason}")]
    InvalidCommission { reason: String },

    #[error("no open position for {ticker}")]
    NotHeld { ticker: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("strategy error on {day}: {reason}")]
    Strategy { day: NaiveDate, reason: String },

    #[error(
        "run aborted on {day} (last recorded snapshot: {}): {source}",
        .last_snapshot.map_or_else(|| "none".to_string(), |d| d.to_string())
    )]
    RunAborted {
        day: NaiveDate,
        last_snapshot: Option<NaiveDate>,
        source: Box<MarketsimError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MarketsimError> for std::process::ExitCode {
    fn from(err: &MarketsimError) -> Self {
        let code: u8 = match err {
            MarketsimError::Io(_) => 1,
            MarketsimError::ConfigParse { .. }
            | MarketsimError::ConfigMissing { .. }
            | MarketsimError::ConfigInvalid { .. }
            | MarketsimError::InvalidCommission { .. } => 2,
            MarketsimError::Data { .. } => 3,
            MarketsimError::NotHeld { .. } => 4,
            MarketsimError::Strategy { .. } | MarketsimError::RunAborted { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
