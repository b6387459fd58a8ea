//! Equity curve derived from the holdings ledger.

use chrono::NaiveDateTime;

use super::ledger::HoldingsSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct EquityCurveRow {
    pub timestamp: NaiveDateTime,
    pub cash: f64,
    pub commission: f64,
    pub total: f64,
    /// Fractional change of `total` from the previous row. Undefined on the
    /// first row.
    pub returns: Option<f64>,
    /// Growth of 1.0 invested at the first row.
    pub equity_curve: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EquityCurve {
    pub rows: Vec<EquityCurveRow>,
}

impl EquityCurve {
    /// Build the curve from a chronological holdings ledger.
    ///
    /// A return off a zero previous total is recorded as 0.0.
    pub fn from_holdings(ledger: &[HoldingsSnapshot]) -> Self {
        let mut rows = Vec::with_capacity(ledger.len());
        let mut equity = 1.0_f64;
        let mut prev_total: Option<f64> = None;

        for snap in ledger {
            let returns = prev_total.map(|prev| {
                if prev != 0.0 {
                    snap.total / prev - 1.0
                } else {
                    0.0
                }
            });
            if let Some(r) = returns {
                equity *= 1.0 + r;
            }
            rows.push(EquityCurveRow {
                timestamp: snap.timestamp,
                cash: snap.cash,
                commission: snap.commission,
                total: snap.total,
                returns,
                equity_curve: equity,
            });
            prev_total = Some(snap.total);
        }

        EquityCurve { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns for every row after the first.
    pub fn returns(&self) -> Vec<f64> {
        self.rows.iter().filter_map(|r| r.returns).collect()
    }

    pub fn equity(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.equity_curve).collect()
    }

    /// Final cumulative equity, 1.0 for an empty curve.
    pub fn total_return(&self) -> f64 {
        self.rows.last().map(|r| r.equity_curve).unwrap_or(1.0)
    }
}
