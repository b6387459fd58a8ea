//! Broker commission schedule.
//!
//! Simplified Interactive Brokers US equity pricing: a per-share rate with a
//! $1.30 minimum, capped at 0.5% of the traded notional. Exchange and
//! regulatory fees are not included.

const MIN_COMMISSION: f64 = 1.3;
const SMALL_ORDER_RATE: f64 = 0.013;
const LARGE_ORDER_RATE: f64 = 0.008;
const SMALL_ORDER_MAX_QUANTITY: u64 = 500;
const MAX_NOTIONAL_PCT: f64 = 0.5;

/// Commission for `quantity` shares executed at `fill_cost` per share.
pub fn ib_commission(quantity: u64, fill_cost: f64) -> f64 {
    let q = quantity as f64;
    let per_share = if quantity <= SMALL_ORDER_MAX_QUANTITY {
        SMALL_ORDER_RATE * q
    } else {
        LARGE_ORDER_RATE * q
    };
    let commission = MIN_COMMISSION.max(per_share);
    commission.min(MAX_NOTIONAL_PCT / 100.0 * q * fill_cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn small_order_uses_small_rate() {
        assert_relative_eq!(ib_commission(500, 10.0), 6.5, epsilon = 1e-12);
    }

    #[test]
    fn large_order_uses_large_rate() {
        assert_relative_eq!(ib_commission(1000, 10.0), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn minimum_applies_to_tiny_orders() {
        assert_relative_eq!(ib_commission(10, 50.0), 1.3, epsilon = 1e-12);
    }

    #[test]
    fn capped_at_half_percent_of_notional() {
        // min(max(1.3, 80), 0.005 * 10000 * 0.01) = 0.5
        assert_relative_eq!(ib_commission(10_000, 0.01), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn cap_can_undercut_minimum() {
        // notional 100 * 1.0 → cap 0.5 < 1.3 floor
        assert_relative_eq!(ib_commission(100, 1.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn zero_quantity_costs_nothing() {
        assert_relative_eq!(ib_commission(0, 100.0), 0.0);
    }
}
