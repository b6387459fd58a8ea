//! Performance statistics over return and equity series.

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annualised Sharpe ratio against a zero benchmark.
///
/// `periods` is the number of return periods per year: 252 for daily bars,
/// 252 * 6.5 for hourly, 252 * 6.5 * 60 for minute bars. Uses the population
/// standard deviation. Returns 0.0 for an empty series or one with zero
/// variance, where the ratio is undefined.
pub fn sharpe_ratio(returns: &[f64], periods: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev > 0.0 {
        periods.sqrt() * mean / stddev
    } else {
        0.0
    }
}

/// Largest peak-to-trough drop of an equity curve and the longest run of
/// consecutive bars spent below the high-water mark.
///
/// The high-water mark starts at 0 and the first point only anchors the
/// series: it never raises the mark. A curve that falls straight from its
/// first value therefore reports a smaller drawdown than the true one.
pub fn max_drawdown(equity: &[f64]) -> (f64, usize) {
    if equity.len() < 2 {
        return (0.0, 0);
    }

    let mut hwm = 0.0_f64;
    let mut duration = 0usize;
    let mut max_dd = 0.0_f64;
    let mut max_duration = 0usize;

    for &value in &equity[1..] {
        hwm = hwm.max(value);
        let dd = hwm - value;
        duration = if dd == 0.0 { 0 } else { duration + 1 };
        max_dd = max_dd.max(dd);
        max_duration = max_duration.max(duration);
    }

    (max_dd, max_duration)
}
