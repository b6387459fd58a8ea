//! CSV file data adapter.
//!
//! One file per symbol, `<SYMBOL>.csv`, with a header row and columns
//! `timestamp,open,high,low,close,volume`.

use crate::adapters::historic_feed::HistoricBarFeed;
use crate::domain::error::TraderError;
use crate::domain::ohlcv::{Bar, parse_timestamp};
use chrono::NaiveDateTime;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, warn};

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    /// Read every bar for `symbol` at or after `since`, sorted by timestamp.
    pub fn load_bars(&self, symbol: &str, since: NaiveDateTime) -> Result<Vec<Bar>, TraderError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| TraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| TraderError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let ts_str = record.get(0).ok_or_else(|| TraderError::Data {
                reason: format!("{} row {}: missing timestamp column", symbol, line + 1),
            })?;
            let timestamp = parse_timestamp(ts_str).ok_or_else(|| TraderError::Data {
                reason: format!(
                    "{} row {}: invalid timestamp {:?}",
                    symbol,
                    line + 1,
                    ts_str
                ),
            })?;

            if timestamp < since {
                continue;
            }

            bars.push(Bar {
                symbol: symbol.to_string(),
                timestamp,
                open: parse_field(&record, 1, "open", symbol, line)?,
                high: parse_field(&record, 2, "high", symbol, line)?,
                low: parse_field(&record, 3, "low", symbol, line)?,
                close: parse_field(&record, 4, "close", symbol, line)?,
                volume: parse_field(&record, 5, "volume", symbol, line)?,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        debug!(symbol, bars = bars.len(), path = %path.display(), "loaded bars");
        Ok(bars)
    }

    /// Load all `symbols` into a replay feed. Symbols without bars on or
    /// after `since` are kept but logged, since the portfolio still tracks
    /// them.
    pub fn load_feed(
        &self,
        symbols: &[String],
        since: NaiveDateTime,
    ) -> Result<HistoricBarFeed, TraderError> {
        let mut series = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let bars = self.load_bars(symbol, since)?;
            if bars.is_empty() {
                warn!(symbol = %symbol, %since, "no bars on or after start date");
            }
            series.push((symbol.clone(), bars));
        }
        Ok(HistoricBarFeed::new(series))
    }
}

fn parse_field<T>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    symbol: &str,
    line: usize,
) -> Result<T, TraderError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    record
        .get(index)
        .ok_or_else(|| TraderError::Data {
            reason: format!("{} row {}: missing {} column", symbol, line + 1, name),
        })?
        .trim()
        .parse()
        .map_err(|e| TraderError::Data {
            reason: format!("{} row {}: invalid {} value: {}", symbol, line + 1, name, e),
        })
}
