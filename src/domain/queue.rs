//! FIFO event queue shared by the backtest components.
//!
//! Any number of producers hold an [`EventSender`]; the dispatch loop owns the
//! single [`EventReceiver`]. Events come out in the order they were put in,
//! regardless of kind.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use super::error::TraderError;
use super::event::Event;

pub fn event_queue() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel();
    (EventSender { tx }, EventReceiver { rx })
}

/// Write-only handle to the event queue.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<Event>,
}

impl EventSender {
    pub fn put(&self, event: Event) -> Result<(), TraderError> {
        self.tx.send(event).map_err(|_| TraderError::QueueClosed)
    }
}

#[derive(Debug)]
pub struct EventReceiver {
    rx: Receiver<Event>,
}

impl EventReceiver {
    /// Next queued event, or `None` when the queue is currently empty.
    pub fn try_get(&self) -> Option<Event> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Drain everything currently queued, in FIFO order.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }
}
