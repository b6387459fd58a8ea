//! Market data access port.

use crate::domain::error::TraderError;
use crate::domain::ohlcv::Bar;

/// Read access to the bars seen so far by the backtest.
pub trait DataPort {
    fn symbols(&self) -> &[String];

    /// Up to `n` most recent bars for `symbol`, oldest first.
    fn latest_bars(&self, symbol: &str, n: usize) -> Result<Vec<Bar>, TraderError>;

    fn latest_bar(&self, symbol: &str) -> Result<Bar, TraderError> {
        self.latest_bars(symbol, 1)?
            .pop()
            .ok_or_else(|| TraderError::NoData {
                symbol: symbol.to_string(),
            })
    }
}

/// A data source that the dispatch loop can step forward one bar at a time.
pub trait BarFeed: DataPort {
    /// Advance to the next bar. Returns `false` once the data is exhausted.
    fn update_bars(&mut self) -> bool;
}
