//! Position and holdings ledgers.
//!
//! The portfolio keeps one mutable "current" view of positions and holdings
//! and appends an immutable snapshot of each per market update.

use chrono::NaiveDateTime;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct PositionSnapshot {
    pub timestamp: NaiveDateTime,
    pub positions: BTreeMap<String, i64>,
}

impl PositionSnapshot {
    pub fn quantity(&self, symbol: &str) -> i64 {
        self.positions.get(symbol).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoldingsSnapshot {
    pub timestamp: NaiveDateTime,
    /// Market value per symbol.
    pub holdings: BTreeMap<String, f64>,
    pub cash: f64,
    /// Cumulative commission paid.
    pub commission: f64,
    pub total: f64,
}

impl HoldingsSnapshot {
    pub fn market_value(&self) -> f64 {
        self.holdings.values().sum()
    }

    /// `total == cash + Σ holdings` within `tolerance`.
    pub fn is_balanced(&self, tolerance: f64) -> bool {
        (self.total - (self.cash + self.market_value())).abs() <= tolerance
    }
}

/// Live holdings, mutated by fills between market updates.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentHoldings {
    pub holdings: BTreeMap<String, f64>,
    pub cash: f64,
    pub commission: f64,
    pub total: f64,
}

impl CurrentHoldings {
    pub fn new(symbols: &[String], initial_capital: f64) -> Self {
        CurrentHoldings {
            holdings: symbols.iter().map(|s| (s.clone(), 0.0)).collect(),
            cash: initial_capital,
            commission: 0.0,
            total: initial_capital,
        }
    }

    pub fn value(&self, symbol: &str) -> f64 {
        self.holdings.get(symbol).copied().unwrap_or(0.0)
    }
}
