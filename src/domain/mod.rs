//! Core domain types and logic.

pub mod ohlcv;
pub mod event;
pub mod queue;
pub mod commission;
pub mod ledger;
pub mod portfolio;
pub mod execution;
pub mod strategy;
pub mod performance;
pub mod equity_curve;
pub mod metrics;
pub mod backtest;
pub mod universe;
pub mod config_validation;
pub mod error;
