//! Domain error types.

use chrono::NaiveDateTime;

/// Top-level error type for eventtrader.
#[derive(Debug, thiserror::Error)]
pub enum TraderError {
    #[error("unknown symbol {symbol}: not tracked by this portfolio")]
    UnknownSymbol { symbol: String },

    #[error("out of order market update: {next} is earlier than {previous}")]
    OutOfOrder {
        previous: NaiveDateTime,
        next: NaiveDateTime,
    },

    #[error("position quantity overflow for {symbol}: {quantity} shares")]
    QuantityOverflow { symbol: String, quantity: u64 },

    #[error("no market data for {symbol}")]
    NoData { symbol: String },

    #[error("event queue closed")]
    QueueClosed,

    #[error("data error: {reason}")]
    Data { reason: String },

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

impl From<&TraderError> for std::process::ExitCode {
    fn from(err: &TraderError) -> Self {
        let code: u8 = match err {
            TraderError::Io(_) => 1,
            TraderError::ConfigParse { .. }
            | TraderError::ConfigMissing { .. }
            | TraderError::ConfigInvalid { .. } => 2,
            TraderError::Data { .. } | TraderError::NoData { .. } => 3,
            TraderError::UnknownSymbol { .. }
            | TraderError::OutOfOrder { .. }
            | TraderError::QuantityOverflow { .. } => 4,
            TraderError::QueueClosed => 5,
        };
        std::process::ExitCode::from(code)
    }
}
