//! In-memory historical bar replay.
//!
//! Bars from every symbol are merged into one sorted timeline; each call to
//! [`BarFeed::update_bars`] moves to the next timestamp and exposes every bar
//! at or before it.

use chrono::NaiveDateTime;
use std::collections::{BTreeSet, HashMap};

use crate::domain::error::TraderError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::{BarFeed, DataPort};

#[derive(Debug, Clone)]
pub struct HistoricBarFeed {
    symbols: Vec<String>,
    bars: HashMap<String, Vec<Bar>>,
    visible: HashMap<String, usize>,
    timeline: Vec<NaiveDateTime>,
    cursor: usize,
}

impl HistoricBarFeed {
    /// Build a feed from per-symbol bar series. Each series is sorted by
    /// timestamp; symbol order is kept as given.
    pub fn new(series: Vec<(String, Vec<Bar>)>) -> Self {
        let mut symbols = Vec::with_capacity(series.len());
        let mut bars = HashMap::with_capacity(series.len());
        for (symbol, mut symbol_bars) in series {
            symbol_bars.sort_by_key(|b| b.timestamp);
            symbols.push(symbol.clone());
            bars.insert(symbol, symbol_bars);
        }

        let timeline = build_unified_timeline(bars.values());
        let visible = symbols.iter().map(|s| (s.clone(), 0)).collect();

        HistoricBarFeed {
            symbols,
            bars,
            visible,
            timeline,
            cursor: 0,
        }
    }
}

fn build_unified_timeline<'a>(series: impl Iterator<Item = &'a Vec<Bar>>) -> Vec<NaiveDateTime> {
    let unique: BTreeSet<NaiveDateTime> = series
        .flat_map(|bars| bars.iter().map(|bar| bar.timestamp))
        .collect();
    unique.into_iter().collect()
}

impl DataPort for HistoricBarFeed {
    fn symbols(&self) -> &[String] {
        &self.symbols
    }

    fn latest_bars(&self, symbol: &str, n: usize) -> Result<Vec<Bar>, TraderError> {
        let (Some(bars), Some(&visible)) = (self.bars.get(symbol), self.visible.get(symbol)) else {
            return Err(TraderError::NoData {
                symbol: symbol.to_string(),
            });
        };
        let start = visible.saturating_sub(n);
        Ok(bars[start..visible].to_vec())
    }
}

impl BarFeed for HistoricBarFeed {
    fn update_bars(&mut self) -> bool {
        let Some(&now) = self.timeline.get(self.cursor) else {
            return false;
        };
        self.cursor += 1;

        for (symbol, bars) in &self.bars {
            if let Some(visible) = self.visible.get_mut(symbol) {
                while *visible < bars.len() && bars[*visible].timestamp <= now {
                    *visible += 1;
                }
            }
        }
        true
    }
}
