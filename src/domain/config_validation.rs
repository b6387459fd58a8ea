//! Configuration validation.
//!
//! Checks every `[backtest]` and `[strategy]` field before a run starts so
//! that bad input fails with a config error instead of mid-loop.

use crate::domain::error::TraderError;
use crate::domain::ohlcv::parse_timestamp;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDateTime;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;
pub const DEFAULT_PERIODS_PER_YEAR: f64 = 252.0;
pub const DEFAULT_STRATEGY: &str = "buy_and_hold";
pub const DEFAULT_SIGNAL_STRENGTH: f64 = 1.0;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TraderError> {
    parse_start_date(config)?;
    parse_initial_capital(config)?;
    parse_symbol_list(config)?;
    validate_exchange(config)?;
    parse_periods_per_year(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TraderError> {
    validate_strategy_name(config)?;
    parse_strength(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> TraderError {
    TraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

pub fn parse_start_date(config: &dyn ConfigPort) -> Result<NaiveDateTime, TraderError> {
    let raw = config
        .get_string("backtest", "start_date")
        .ok_or_else(|| TraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "start_date".to_string(),
        })?;
    parse_timestamp(&raw).ok_or_else(|| {
        invalid(
            "backtest",
            "start_date",
            "invalid start_date format, expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS",
        )
    })
}

pub fn parse_symbol_list(config: &dyn ConfigPort) -> Result<Vec<String>, TraderError> {
    let raw = config
        .get_string("backtest", "symbols")
        .ok_or_else(|| TraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbols".to_string(),
        })?;
    parse_symbols(&raw).map_err(|e| invalid("backtest", "symbols", e.to_string()))
}

/// Read a strictly positive number, falling back to `default` only when the
/// key is absent. Unparseable values are rejected.
fn positive_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, TraderError> {
    if config.get_string(section, key).is_none() {
        return Ok(default);
    }
    let value = config.get_double(section, key, f64::NAN);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            section,
            key,
            format!("{key} must be a positive number"),
        ));
    }
    Ok(value)
}

pub fn parse_initial_capital(config: &dyn ConfigPort) -> Result<f64, TraderError> {
    positive_double(config, "backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL)
}

pub fn parse_periods_per_year(config: &dyn ConfigPort) -> Result<f64, TraderError> {
    positive_double(config, "backtest", "periods_per_year", DEFAULT_PERIODS_PER_YEAR)
}

pub fn parse_strength(config: &dyn ConfigPort) -> Result<f64, TraderError> {
    positive_double(config, "strategy", "strength", DEFAULT_SIGNAL_STRENGTH)
}

fn validate_exchange(config: &dyn ConfigPort) -> Result<(), TraderError> {
    match config.get_string("backtest", "exchange") {
        Some(s) if s.trim().is_empty() => {
            Err(invalid("backtest", "exchange", "exchange must not be empty"))
        }
        _ => Ok(()),
    }
}

fn validate_strategy_name(config: &dyn ConfigPort) -> Result<(), TraderError> {
    match config.get_string("strategy", "name") {
        None => Ok(()),
        Some(name) if name.trim() == DEFAULT_STRATEGY => Ok(()),
        Some(name) => Err(invalid(
            "strategy",
            "name",
            format!("unknown strategy {:?}", name.trim()),
        )),
    }
}
