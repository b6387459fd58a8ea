//! eventtrader: event-driven backtesting core.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. The binary front end lives in
//! [`cli`] with tracing setup in [`obs`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod obs;
