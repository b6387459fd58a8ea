//! Event taxonomy carried on the event queue.
//!
//! Market updates flow to the portfolio, signals become orders, orders become
//! fills. Payloads are plain data; nothing is validated on construction.

use chrono::NaiveDateTime;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Market(MarketEvent),
    Signal(SignalEvent),
    Order(OrderEvent),
    Fill(FillEvent),
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Market(_) => "MARKET",
            Event::Signal(_) => "SIGNAL",
            Event::Order(_) => "ORDER",
            Event::Fill(_) => "FILL",
        }
    }
}

/// A new bar is available for every tracked symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalType {
    Long,
    Short,
    Exit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub symbol: String,
    pub timestamp: NaiveDateTime,
    pub signal_type: SignalType,
    /// Fraction of the nominal order size, nominally at most 1.0.
    pub strength: f64,
}

impl SignalEvent {
    pub fn new(
        symbol: impl Into<String>,
        timestamp: NaiveDateTime,
        signal_type: SignalType,
        strength: f64,
    ) -> Self {
        SignalEvent {
            symbol: symbol.into(),
            timestamp,
            signal_type,
            strength,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "MKT"),
            OrderType::Limit => write!(f, "LMT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    /// +1 for buys, -1 for sells.
    pub fn sign(self) -> i64 {
        match self {
            Direction::Buy => 1,
            Direction::Sell => -1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEvent {
    pub symbol: String,
    pub order_type: OrderType,
    pub quantity: u64,
    pub direction: Direction,
}

impl OrderEvent {
    pub fn new(
        symbol: impl Into<String>,
        order_type: OrderType,
        quantity: u64,
        direction: Direction,
    ) -> Self {
        OrderEvent {
            symbol: symbol.into(),
            order_type,
            quantity,
            direction,
        }
    }

    pub fn market(symbol: impl Into<String>, quantity: u64, direction: Direction) -> Self {
        Self::new(symbol, OrderType::Market, quantity, direction)
    }
}

impl fmt::Display for OrderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order: Symbol={}, Type={}, Quantity={}, Direction={}",
            self.symbol, self.order_type, self.quantity, self.direction
        )
    }
}

/// An executed order as reported by an execution handler.
///
/// `fill_cost` is `None` when the handler does not know the execution price;
/// `commission` is `None` when the consumer should derive it from the
/// commission schedule once the price is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FillEvent {
    pub time_index: NaiveDateTime,
    pub symbol: String,
    pub exchange: String,
    pub quantity: u64,
    pub direction: Direction,
    pub fill_cost: Option<f64>,
    pub commission: Option<f64>,
}

impl FillEvent {
    pub fn new(
        time_index: NaiveDateTime,
        symbol: impl Into<String>,
        exchange: impl Into<String>,
        quantity: u64,
        direction: Direction,
        fill_cost: Option<f64>,
    ) -> Self {
        FillEvent {
            time_index,
            symbol: symbol.into(),
            exchange: exchange.into(),
            quantity,
            direction,
            fill_cost,
            commission: None,
        }
    }

    pub fn with_commission(mut self, commission: f64) -> Self {
        self.commission = Some(commission);
        self
    }
}
