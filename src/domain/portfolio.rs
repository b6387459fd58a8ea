//! Portfolio state: current positions and holdings plus their per-bar ledgers.
//!
//! All mutation goes through [`Portfolio::update_timeindex`],
//! [`Portfolio::update_signal`] and [`Portfolio::update_fill`].
//!
//! Fills adjust `total` by the cash that changed hands, while market updates
//! recompute it from closing prices. The two views can disagree between a
//! fill and the next market update; the next snapshot reconciles them.

use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tracing::{debug, trace};

use super::commission::ib_commission;
use super::equity_curve::EquityCurve;
use super::error::TraderError;
use super::event::{Direction, Event, FillEvent, MarketEvent, OrderEvent, SignalEvent, SignalType};
use super::ledger::{CurrentHoldings, HoldingsSnapshot, PositionSnapshot};
use super::metrics::SummaryStats;
use super::performance::TRADING_DAYS_PER_YEAR;
use super::queue::EventSender;
use crate::ports::data_port::DataPort;

/// Shares ordered for a signal of strength 1.0.
const NAIVE_ORDER_SIZE: f64 = 100.0;

pub trait Portfolio {
    /// Snapshot positions and mark holdings to market for the newest bar.
    fn update_timeindex(
        &mut self,
        event: &MarketEvent,
        bars: &dyn DataPort,
    ) -> Result<(), TraderError>;

    /// Turn a signal into at most one order and enqueue it.
    fn update_signal(&mut self, signal: &SignalEvent) -> Result<Option<OrderEvent>, TraderError>;

    /// Apply an executed fill to current positions and holdings.
    fn update_fill(&mut self, fill: &FillEvent, bars: &dyn DataPort) -> Result<(), TraderError>;
}

/// Sends fixed-size orders straight through with no risk management or
/// position sizing beyond the signal strength.
#[derive(Debug)]
pub struct NaivePortfolio {
    symbols: Vec<String>,
    events: EventSender,
    start_date: NaiveDateTime,
    initial_capital: f64,
    periods_per_year: f64,
    all_positions: Vec<PositionSnapshot>,
    all_holdings: Vec<HoldingsSnapshot>,
    current_positions: BTreeMap<String, i64>,
    current_holdings: CurrentHoldings,
}

impl NaivePortfolio {
    pub fn new(
        symbols: Vec<String>,
        events: EventSender,
        start_date: NaiveDateTime,
        initial_capital: f64,
    ) -> Self {
        let current_positions: BTreeMap<String, i64> =
            symbols.iter().map(|s| (s.clone(), 0)).collect();
        let current_holdings = CurrentHoldings::new(&symbols, initial_capital);

        let all_positions = vec![PositionSnapshot {
            timestamp: start_date,
            positions: current_positions.clone(),
        }];
        let all_holdings = vec![HoldingsSnapshot {
            timestamp: start_date,
            holdings: current_holdings.holdings.clone(),
            cash: initial_capital,
            commission: 0.0,
            total: initial_capital,
        }];

        NaivePortfolio {
            symbols,
            events,
            start_date,
            initial_capital,
            periods_per_year: TRADING_DAYS_PER_YEAR,
            all_positions,
            all_holdings,
            current_positions,
            current_holdings,
        }
    }

    /// Annualisation factor for the Sharpe ratio; 252 for daily bars.
    pub fn with_periods_per_year(mut self, periods: f64) -> Self {
        self.periods_per_year = periods;
        self
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn start_date(&self) -> NaiveDateTime {
        self.start_date
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    pub fn all_positions(&self) -> &[PositionSnapshot] {
        &self.all_positions
    }

    pub fn all_holdings(&self) -> &[HoldingsSnapshot] {
        &self.all_holdings
    }

    pub fn current_positions(&self) -> &BTreeMap<String, i64> {
        &self.current_positions
    }

    pub fn current_holdings(&self) -> &CurrentHoldings {
        &self.current_holdings
    }

    /// Current signed share count for a tracked symbol.
    pub fn position(&self, symbol: &str) -> Result<i64, TraderError> {
        self.current_positions
            .get(symbol)
            .copied()
            .ok_or_else(|| TraderError::UnknownSymbol {
                symbol: symbol.to_string(),
            })
    }

    /// Rebuild the equity curve from the holdings ledger.
    pub fn create_equity_curve(&self) -> EquityCurve {
        EquityCurve::from_holdings(&self.all_holdings)
    }

    /// Total return, Sharpe ratio, max drawdown and drawdown duration as
    /// formatted `(label, value)` pairs.
    pub fn output_summary_stats(&self) -> Vec<(String, String)> {
        let curve = self.create_equity_curve();
        SummaryStats::compute(&curve, self.periods_per_year).to_pairs()
    }

    /// `floor(100 * strength)` shares, or 0 for a non-positive strength.
    fn target_quantity(&self, signal: &SignalEvent) -> Result<u64, TraderError> {
        let target = (NAIVE_ORDER_SIZE * signal.strength).floor();
        // Positions are signed 64-bit; 2^63 shares and up cannot be held.
        if target >= i64::MAX as f64 {
            return Err(TraderError::QuantityOverflow {
                symbol: signal.symbol.clone(),
                quantity: target as u64,
            });
        }
        Ok(if target.is_finite() && target > 0.0 {
            target as u64
        } else {
            0
        })
    }

    fn generate_naive_order(
        &self,
        signal: &SignalEvent,
        current: i64,
    ) -> Result<Option<OrderEvent>, TraderError> {
        let (quantity, direction) = match signal.signal_type {
            SignalType::Long if current == 0 => (self.target_quantity(signal)?, Direction::Buy),
            SignalType::Short if current == 0 => (self.target_quantity(signal)?, Direction::Sell),
            SignalType::Exit if current > 0 => (current.unsigned_abs(), Direction::Sell),
            SignalType::Exit if current < 0 => (current.unsigned_abs(), Direction::Buy),
            _ => return Ok(None),
        };

        if quantity == 0 {
            return Ok(None);
        }
        Ok(Some(OrderEvent::market(
            signal.symbol.clone(),
            quantity,
            direction,
        )))
    }
}

impl Portfolio for NaivePortfolio {
    fn update_timeindex(
        &mut self,
        _event: &MarketEvent,
        bars: &dyn DataPort,
    ) -> Result<(), TraderError> {
        let mut closes = Vec::with_capacity(self.symbols.len());
        let mut timestamp: Option<NaiveDateTime> = None;
        for symbol in &self.symbols {
            let bar = bars.latest_bars(symbol, 1)?.pop();
            if let Some(bar) = &bar {
                timestamp = Some(timestamp.map_or(bar.timestamp, |t| t.max(bar.timestamp)));
            }
            closes.push(bar.map(|b| b.close));
        }

        let timestamp = timestamp.ok_or_else(|| TraderError::NoData {
            symbol: self.symbols.join(","),
        })?;
        if let Some(previous) = self.all_holdings.last().map(|h| h.timestamp) {
            if timestamp < previous {
                return Err(TraderError::OutOfOrder {
                    previous,
                    next: timestamp,
                });
            }
        }

        let cash = self.current_holdings.cash;
        let mut holdings = BTreeMap::new();
        let mut total = cash;
        for (symbol, close) in self.symbols.iter().zip(&closes) {
            let quantity = self.current_positions.get(symbol).copied().unwrap_or(0);
            let market_value = match close {
                Some(close) => quantity as f64 * close,
                None if quantity == 0 => 0.0,
                None => {
                    return Err(TraderError::NoData {
                        symbol: symbol.clone(),
                    });
                }
            };
            holdings.insert(symbol.clone(), market_value);
            total += market_value;
        }

        self.all_positions.push(PositionSnapshot {
            timestamp,
            positions: self.current_positions.clone(),
        });
        self.all_holdings.push(HoldingsSnapshot {
            timestamp,
            holdings,
            cash,
            commission: self.current_holdings.commission,
            total,
        });
        trace!(%timestamp, cash, total, "holdings snapshot");
        Ok(())
    }

    fn update_signal(&mut self, signal: &SignalEvent) -> Result<Option<OrderEvent>, TraderError> {
        let current = self.position(&signal.symbol)?;
        let order = self.generate_naive_order(signal, current)?;

        match &order {
            Some(order) => {
                debug!(%order, "order generated");
                self.events.put(Event::Order(order.clone()))?;
            }
            None => {
                trace!(
                    symbol = %signal.symbol,
                    signal = ?signal.signal_type,
                    current,
                    "signal ignored"
                );
            }
        }
        Ok(order)
    }

    fn update_fill(&mut self, fill: &FillEvent, bars: &dyn DataPort) -> Result<(), TraderError> {
        let current = self.position(&fill.symbol)?;
        let price = match fill.fill_cost {
            Some(cost) => cost,
            None => bars.latest_bar(&fill.symbol)?.close,
        };
        let commission = fill
            .commission
            .unwrap_or_else(|| ib_commission(fill.quantity, price));

        let overflow = || TraderError::QuantityOverflow {
            symbol: fill.symbol.clone(),
            quantity: fill.quantity,
        };
        let sign = fill.direction.sign();
        let signed_quantity = i64::try_from(fill.quantity).map_err(|_| overflow())? * sign;
        let next = current.checked_add(signed_quantity).ok_or_else(overflow)?;
        self.current_positions.insert(fill.symbol.clone(), next);

        let cost = sign as f64 * price * fill.quantity as f64;
        *self
            .current_holdings
            .holdings
            .entry(fill.symbol.clone())
            .or_insert(0.0) += cost;
        self.current_holdings.commission += commission;
        self.current_holdings.cash -= cost + commission;
        self.current_holdings.total -= cost + commission;

        debug!(
            symbol = %fill.symbol,
            direction = %fill.direction,
            quantity = fill.quantity,
            price,
            commission,
            cash = self.current_holdings.cash,
            "fill applied"
        );
        Ok(())
    }
}
