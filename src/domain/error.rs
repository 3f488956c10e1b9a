//! Domain error types.
//!
//! Only unusable raw input or configuration produces an error. Indicator and
//! statistical edge cases resolve to sentinel values inside the domain.

use chrono::NaiveDate;

/// Top-level error type for confluence.
#[derive(Debug, thiserror::Error)]
pub enum ConfluenceError {
    #[error("no data for {symbol} between {start} and {end}")]
    DataUnavailable {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("malformed price data: {reason}")]
    MalformedData { reason: String },

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

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ConfluenceError> for std::process::ExitCode {
    fn from(err: &ConfluenceError) -> Self {
        let code: u8 = match err {
            ConfluenceError::Io(_) => 1,
            ConfluenceError::ConfigParse { .. }
            | ConfluenceError::ConfigMissing { .. }
            | ConfluenceError::ConfigInvalid { .. } => 2,
            ConfluenceError::DataSource { .. } => 3,
            ConfluenceError::DataUnavailable { .. } | ConfluenceError::MalformedData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
