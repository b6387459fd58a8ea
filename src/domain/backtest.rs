//! Backtest configuration and the event dispatch loop.
//!
//! Each step of the bar feed enqueues one market event, then the queue is
//! drained before the feed advances again. Events are handled strictly in
//! FIFO order, one at a time.

use chrono::NaiveDateTime;
use tracing::{debug, info};

use super::error::TraderError;
use super::event::{Event, MarketEvent};
use super::execution::{ExecutionHandler, SimulatedExecutionHandler};
use super::portfolio::{NaivePortfolio, Portfolio};
use super::queue::{EventReceiver, EventSender, event_queue};
use super::strategy::{BuyAndHoldStrategy, Strategy};
use crate::ports::data_port::{BarFeed, DataPort};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub start_date: NaiveDateTime,
    pub initial_capital: f64,
    pub symbols: Vec<String>,
    pub exchange: String,
    pub periods_per_year: f64,
    pub signal_strength: f64,
}

/// The components a dispatched event can be routed to.
pub struct Handlers<'a> {
    pub strategy: &'a mut dyn Strategy,
    pub portfolio: &'a mut dyn Portfolio,
    pub execution: &'a mut dyn ExecutionHandler,
}

impl Handlers<'_> {
    /// Route one event to its handler.
    pub fn dispatch(&mut self, event: Event, bars: &dyn DataPort) -> Result<(), TraderError> {
        match event {
            Event::Market(market) => {
                self.strategy.calculate_signals(&market, bars)?;
                self.portfolio.update_timeindex(&market, bars)
            }
            Event::Signal(signal) => self.portfolio.update_signal(&signal).map(|_| ()),
            Event::Order(order) => self.execution.execute_order(&order),
            Event::Fill(fill) => self.portfolio.update_fill(&fill, bars),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub bars: usize,
    pub events: usize,
    pub signals: usize,
    pub orders: usize,
    pub fills: usize,
}

/// Drive `feed` to exhaustion, dispatching every queued event.
pub fn run_event_loop<F: BarFeed>(
    feed: &mut F,
    sender: &EventSender,
    receiver: &EventReceiver,
    handlers: &mut Handlers<'_>,
) -> Result<LoopStats, TraderError> {
    let mut stats = LoopStats::default();

    while feed.update_bars() {
        stats.bars += 1;
        sender.put(Event::Market(MarketEvent))?;

        while let Some(event) = receiver.try_get() {
            match &event {
                Event::Market(_) => {}
                Event::Signal(_) => stats.signals += 1,
                Event::Order(_) => stats.orders += 1,
                Event::Fill(_) => stats.fills += 1,
            }
            debug!(kind = event.kind(), "dispatching event");
            handlers.dispatch(event, &*feed)?;
            stats.events += 1;
        }
    }

    Ok(stats)
}

#[derive(Debug)]
pub struct BacktestResult {
    pub portfolio: NaivePortfolio,
    pub stats: LoopStats,
}

/// Run a buy-and-hold backtest over `feed` with a naive portfolio and
/// simulated execution.
pub fn run_backtest<F: BarFeed>(
    feed: &mut F,
    config: &BacktestConfig,
) -> Result<BacktestResult, TraderError> {
    let (sender, receiver) = event_queue();

    let mut strategy = BuyAndHoldStrategy::new(sender.clone(), config.signal_strength);
    let mut portfolio = NaivePortfolio::new(
        config.symbols.clone(),
        sender.clone(),
        config.start_date,
        config.initial_capital,
    )
    .with_periods_per_year(config.periods_per_year);
    let mut execution =
        SimulatedExecutionHandler::with_exchange(sender.clone(), config.exchange.clone());

    info!(
        symbols = config.symbols.len(),
        start = %config.start_date,
        initial_capital = config.initial_capital,
        "starting backtest"
    );

    let stats = {
        let mut handlers = Handlers {
            strategy: &mut strategy,
            portfolio: &mut portfolio,
            execution: &mut execution,
        };
        run_event_loop(feed, &sender, &receiver, &mut handlers)?
    };

    info!(
        bars = stats.bars,
        events = stats.events,
        fills = stats.fills,
        "backtest finished"
    );

    Ok(BacktestResult { portfolio, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::historic_feed::HistoricBarFeed;
    use crate::domain::event::{Direction, FillEvent, OrderEvent, SignalEvent, SignalType};
    use crate::domain::ohlcv::Bar;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn bars(symbol: &str, closes: &[f64]) -> (String, Vec<Bar>) {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                symbol: symbol.to_string(),
                timestamp: ts(i as u32 + 1),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect();
        (symbol.to_string(), bars)
    }

    fn sample_config(symbols: &[&str]) -> BacktestConfig {
        BacktestConfig {
            start_date: ts(1),
            initial_capital: 100_000.0,
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            exchange: "ARCA".into(),
            periods_per_year: 252.0,
            signal_strength: 1.0,
        }
    }

    #[test]
    fn buy_and_hold_single_symbol() {
        let mut feed = HistoricBarFeed::new(vec![bars("X", &[50.0, 55.0, 60.0])]);
        let result = run_backtest(&mut feed, &sample_config(&["X"])).unwrap();

        assert_eq!(result.stats.bars, 3);
        assert_eq!(result.stats.signals, 1);
        assert_eq!(result.stats.orders, 1);
        assert_eq!(result.stats.fills, 1);
        assert_eq!(result.portfolio.position("X").unwrap(), 100);

        // Seed entry plus one per bar.
        let holdings = result.portfolio.all_holdings();
        assert_eq!(holdings.len(), 4);

        // Filled at the first close of 50 with 100 * 0.013 = 1.3 commission.
        let cash = 100_000.0 - 5000.0 - 1.3;
        let last = holdings.last().unwrap();
        assert_relative_eq!(last.cash, cash, epsilon = 1e-9);
        assert_relative_eq!(last.holdings["X"], 6000.0);
        assert_relative_eq!(last.total, cash + 6000.0, epsilon = 1e-9);
        for snap in holdings {
            assert!(snap.is_balanced(1e-6));
        }
    }

    #[test]
    fn fill_lands_in_the_snapshot_after_the_signal_bar() {
        let mut feed = HistoricBarFeed::new(vec![bars("X", &[50.0, 55.0])]);
        let result = run_backtest(&mut feed, &sample_config(&["X"])).unwrap();

        let positions = result.portfolio.all_positions();
        assert_eq!(positions[1].quantity("X"), 0);
        assert_eq!(positions[2].quantity("X"), 100);
    }

    #[test]
    fn every_symbol_is_bought() {
        let mut feed = HistoricBarFeed::new(vec![
            bars("A", &[10.0, 11.0]),
            bars("B", &[20.0, 19.0]),
        ]);
        let result = run_backtest(&mut feed, &sample_config(&["A", "B"])).unwrap();
        assert_eq!(result.stats.fills, 2);
        assert_eq!(result.portfolio.position("A").unwrap(), 100);
        assert_eq!(result.portfolio.position("B").unwrap(), 100);
    }

    #[test]
    fn feed_symbol_outside_portfolio_stops_the_run() {
        let mut feed = HistoricBarFeed::new(vec![bars("A", &[10.0]), bars("B", &[20.0])]);
        let err = run_backtest(&mut feed, &sample_config(&["A"])).unwrap_err();
        assert!(matches!(err, TraderError::UnknownSymbol { ref symbol } if symbol == "B"));
    }

    #[test]
    fn empty_feed_leaves_seed_only() {
        let mut feed = HistoricBarFeed::new(vec![("X".to_string(), vec![])]);
        let result = run_backtest(&mut feed, &sample_config(&["X"])).unwrap();
        assert_eq!(result.stats, LoopStats::default());
        assert_eq!(result.portfolio.all_holdings().len(), 1);
    }

    struct Recorder {
        seen: Vec<&'static str>,
    }

    impl Strategy for Recorder {
        fn calculate_signals(
            &mut self,
            _event: &MarketEvent,
            _bars: &dyn DataPort,
        ) -> Result<(), TraderError> {
            self.seen.push("strategy");
            Ok(())
        }
    }

    impl ExecutionHandler for Recorder {
        fn execute_order(&mut self, _order: &OrderEvent) -> Result<(), TraderError> {
            self.seen.push("execution");
            Ok(())
        }
    }

    struct RecordingPortfolio {
        seen: Vec<&'static str>,
    }

    impl Portfolio for RecordingPortfolio {
        fn update_timeindex(
            &mut self,
            _event: &MarketEvent,
            _bars: &dyn DataPort,
        ) -> Result<(), TraderError> {
            self.seen.push("timeindex");
            Ok(())
        }

        fn update_signal(
            &mut self,
            _signal: &SignalEvent,
        ) -> Result<Option<OrderEvent>, TraderError> {
            self.seen.push("signal");
            Ok(None)
        }

        fn update_fill(
            &mut self,
            _fill: &FillEvent,
            _bars: &dyn DataPort,
        ) -> Result<(), TraderError> {
            self.seen.push("fill");
            Ok(())
        }
    }

    #[test]
    fn dispatch_routes_each_kind_once() {
        let feed = HistoricBarFeed::new(vec![]);
        let mut strategy = Recorder { seen: vec![] };
        let mut execution = Recorder { seen: vec![] };
        let mut portfolio = RecordingPortfolio { seen: vec![] };
        let mut handlers = Handlers {
            strategy: &mut strategy,
            portfolio: &mut portfolio,
            execution: &mut execution,
        };

        handlers
            .dispatch(Event::Market(MarketEvent), &feed)
            .unwrap();
        handlers
            .dispatch(
                Event::Signal(SignalEvent::new("X", ts(1), SignalType::Long, 1.0)),
                &feed,
            )
            .unwrap();
        handlers
            .dispatch(
                Event::Order(OrderEvent::market("X", 1, Direction::Buy)),
                &feed,
            )
            .unwrap();
        handlers
            .dispatch(
                Event::Fill(FillEvent::new(ts(1), "X", "ARCA", 1, Direction::Buy, Some(1.0))),
                &feed,
            )
            .unwrap();

        assert_eq!(strategy.seen, vec!["strategy"]);
        assert_eq!(execution.seen, vec!["execution"]);
        assert_eq!(portfolio.seen, vec!["timeindex", "signal", "fill"]);
    }
}
