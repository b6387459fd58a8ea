#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use eventtrader::domain::error::TraderError;
use eventtrader::domain::event::{Direction, FillEvent, SignalEvent, SignalType};
pub use eventtrader::domain::ohlcv::Bar;
use eventtrader::domain::portfolio::NaivePortfolio;
use eventtrader::domain::queue::{EventReceiver, event_queue};
use eventtrader::ports::data_port::DataPort;
use std::collections::HashMap;

/// In-memory data port whose visible bars are pushed by the test.
pub struct MockDataPort {
    pub symbols: Vec<String>,
    pub bars: HashMap<String, Vec<Bar>>,
}

impl MockDataPort {
    pub fn new(symbols: &[&str]) -> Self {
        Self {
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            bars: HashMap::new(),
        }
    }

    pub fn push(&mut self, bar: Bar) {
        self.bars.entry(bar.symbol.clone()).or_default().push(bar);
    }

    pub fn with_bar(mut self, bar: Bar) -> Self {
        self.push(bar);
        self
    }
}

impl DataPort for MockDataPort {
    fn symbols(&self) -> &[String] {
        &self.symbols
    }

    fn latest_bars(&self, symbol: &str, n: usize) -> Result<Vec<Bar>, TraderError> {
        if !self.symbols.iter().any(|s| s == symbol) {
            return Err(TraderError::NoData {
                symbol: symbol.to_string(),
            });
        }
        let bars = self.bars.get(symbol).map(Vec::as_slice).unwrap_or(&[]);
        let start = bars.len().saturating_sub(n);
        Ok(bars[start..].to_vec())
    }
}

pub fn ts(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn make_bar(symbol: &str, day: u32, close: f64) -> Bar {
    Bar {
        symbol: symbol.to_string(),
        timestamp: ts(day),
        open: close,
        high: close,
        low: close,
        close,
        volume: 10_000,
    }
}

pub fn make_portfolio(symbols: &[&str], capital: f64) -> (NaivePortfolio, EventReceiver) {
    let (tx, rx) = event_queue();
    let symbols = symbols.iter().map(|s| s.to_string()).collect();
    (NaivePortfolio::new(symbols, tx, ts(1), capital), rx)
}

pub fn long(symbol: &str, strength: f64) -> SignalEvent {
    SignalEvent::new(symbol, ts(1), SignalType::Long, strength)
}

pub fn exit(symbol: &str) -> SignalEvent {
    SignalEvent::new(symbol, ts(1), SignalType::Exit, 1.0)
}

pub fn priced_fill(
    symbol: &str,
    quantity: u64,
    direction: Direction,
    price: f64,
    commission: f64,
) -> FillEvent {
    FillEvent::new(ts(1), symbol, "ARCA", quantity, direction, Some(price))
        .with_commission(commission)
}

/// Write `<SYMBOL>.csv` files under `dir`, one row per close starting on
/// 2024-01-01.
pub fn write_csv(dir: &std::path::Path, symbol: &str, closes: &[f64]) {
    let mut content = String::from("timestamp,open,high,low,close,volume\n");
    for (i, close) in closes.iter().enumerate() {
        content.push_str(&format!(
            "2024-01-{:02},{close},{close},{close},{close},1000\n",
            i + 1
        ));
    }
    std::fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}
