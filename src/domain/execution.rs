//! Order execution: converts order events into fill events.
//!
//! [`ExecutionHandler`] is the seam between the portfolio and a venue. The
//! simulated handler fills every order immediately and in full; a live broker
//! handler would implement the same trait.

use chrono::Utc;
use tracing::debug;

use super::error::TraderError;
use super::event::{Event, FillEvent, OrderEvent};
use super::queue::EventSender;

pub const DEFAULT_EXCHANGE: &str = "ARCA";

pub trait ExecutionHandler {
    /// Execute `order`, enqueuing zero or one fill.
    fn execute_order(&mut self, order: &OrderEvent) -> Result<(), TraderError>;
}

/// Fills orders instantly with no latency, slippage or liquidity check.
///
/// Fills carry no execution price or commission; the portfolio resolves both
/// when it applies the fill.
#[derive(Debug)]
pub struct SimulatedExecutionHandler {
    events: EventSender,
    exchange: String,
}

impl SimulatedExecutionHandler {
    pub fn new(events: EventSender) -> Self {
        Self::with_exchange(events, DEFAULT_EXCHANGE)
    }

    pub fn with_exchange(events: EventSender, exchange: impl Into<String>) -> Self {
        SimulatedExecutionHandler {
            events,
            exchange: exchange.into(),
        }
    }
}

impl ExecutionHandler for SimulatedExecutionHandler {
    fn execute_order(&mut self, order: &OrderEvent) -> Result<(), TraderError> {
        let fill = FillEvent::new(
            Utc::now().naive_utc(),
            order.symbol.clone(),
            self.exchange.clone(),
            order.quantity,
            order.direction,
            None,
        );
        debug!(
            symbol = %fill.symbol,
            quantity = fill.quantity,
            direction = %fill.direction,
            exchange = %fill.exchange,
            "simulated fill"
        );
        self.events.put(Event::Fill(fill))
    }
}
