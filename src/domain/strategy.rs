//! Signal generation from market updates.

use std::collections::BTreeSet;
use tracing::debug;

use super::error::TraderError;
use super::event::{Event, MarketEvent, SignalEvent, SignalType};
use super::queue::EventSender;
use crate::ports::data_port::DataPort;

pub trait Strategy {
    /// Inspect the latest bars and enqueue any signals.
    fn calculate_signals(
        &mut self,
        event: &MarketEvent,
        bars: &dyn DataPort,
    ) -> Result<(), TraderError>;
}

/// Goes long every symbol on its first bar and holds to the end.
#[derive(Debug)]
pub struct BuyAndHoldStrategy {
    events: EventSender,
    strength: f64,
    bought: BTreeSet<String>,
}

impl BuyAndHoldStrategy {
    pub fn new(events: EventSender, strength: f64) -> Self {
        BuyAndHoldStrategy {
            events,
            strength,
            bought: BTreeSet::new(),
        }
    }
}

impl Strategy for BuyAndHoldStrategy {
    fn calculate_signals(
        &mut self,
        _event: &MarketEvent,
        bars: &dyn DataPort,
    ) -> Result<(), TraderError> {
        for symbol in bars.symbols() {
            if self.bought.contains(symbol) {
                continue;
            }
            let Some(bar) = bars.latest_bars(symbol, 1)?.pop() else {
                continue;
            };
            let signal = SignalEvent::new(
                symbol.clone(),
                bar.timestamp,
                SignalType::Long,
                self.strength,
            );
            debug!(symbol = %symbol, timestamp = %bar.timestamp, "buy and hold entry");
            self.events.put(Event::Signal(signal))?;
            self.bought.insert(symbol.clone());
        }
        Ok(())
    }
}
