//! Summary statistics for a finished backtest.

use super::equity_curve::EquityCurve;
use super::performance::{max_drawdown, sharpe_ratio};

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    /// Final cumulative equity, 1.0 meaning break-even.
    pub total_return: f64,
    pub sharpe_ratio: f64,
    /// Largest fall of the cumulative equity curve below its high-water mark.
    pub max_drawdown: f64,
    /// Longest run of bars spent in drawdown.
    pub drawdown_duration: usize,
}

impl SummaryStats {
    pub fn compute(curve: &EquityCurve, periods_per_year: f64) -> Self {
        let (max_drawdown, drawdown_duration) = max_drawdown(&curve.equity());
        SummaryStats {
            total_return: curve.total_return(),
            sharpe_ratio: sharpe_ratio(&curve.returns(), periods_per_year),
            max_drawdown,
            drawdown_duration,
        }
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        vec![
            (
                "Total Return".to_string(),
                format!("{:.2}%", (self.total_return - 1.0) * 100.0),
            ),
            (
                "Sharpe Ratio".to_string(),
                format!("{:.2}", self.sharpe_ratio),
            ),
            (
                "Max Drawdown".to_string(),
                format!("{:.2}%", self.max_drawdown * 100.0),
            ),
            (
                "Drawdown Duration".to_string(),
                format!("{}", self.drawdown_duration),
            ),
        ]
    }
}
