//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{
    parse_initial_capital, parse_periods_per_year, parse_start_date, parse_strength,
    parse_symbol_list, validate_backtest_config, validate_strategy_config,
};
use crate::domain::error::TraderError;
use crate::domain::execution::DEFAULT_EXCHANGE;
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(name = "eventtrader", about = "Event-driven backtester", version)]
pub struct Cli {
    /// Log filter, e.g. `info` or `eventtrader=debug`
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over CSV bars and print summary statistics
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory holding `<SYMBOL>.csv` files, overrides `[backtest] data_dir`
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Validate a configuration file without running it
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest { config, data_dir } => run_backtest(&config, data_dir.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

fn report(err: &TraderError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| report(&e))
}

fn run_backtest(config_path: &Path, data_dir_override: Option<&Path>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_dir = resolve_data_dir(data_dir_override, &adapter);
    match execute_backtest(&adapter, &data_dir) {
        Ok(result) => {
            eprintln!(
                "Processed {} bars, {} events, {} fills",
                result.stats.bars, result.stats.events, result.stats.fills
            );
            print!("{}", format_summary(&result.portfolio.output_summary_stats()));
            ExitCode::SUCCESS
        }
        Err(e) => report(&e),
    }
}

/// Validate `config`, load bars from `data_dir` and run the loop.
pub fn execute_backtest(
    config: &dyn ConfigPort,
    data_dir: &Path,
) -> Result<BacktestResult, TraderError> {
    validate_backtest_config(config)?;
    validate_strategy_config(config)?;
    let bt_config = build_backtest_config(config)?;

    eprintln!(
        "Loading {} symbols from {}...",
        bt_config.symbols.len(),
        data_dir.display()
    );
    let mut feed =
        CsvAdapter::new(data_dir.to_path_buf()).load_feed(&bt_config.symbols, bt_config.start_date)?;

    eprintln!("Running backtest...");
    backtest_engine::run_backtest(&mut feed, &bt_config)
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, TraderError> {
    Ok(BacktestConfig {
        start_date: parse_start_date(adapter)?,
        initial_capital: parse_initial_capital(adapter)?,
        symbols: parse_symbol_list(adapter)?,
        exchange: adapter
            .get_string("backtest", "exchange")
            .map(|e| e.trim().to_string())
            .unwrap_or_else(|| DEFAULT_EXCHANGE.to_string()),
        periods_per_year: parse_periods_per_year(adapter)?,
        signal_strength: parse_strength(adapter)?,
    })
}

/// CLI override first, then `[backtest] data_dir`, then the working directory.
pub fn resolve_data_dir(override_dir: Option<&Path>, adapter: &dyn ConfigPort) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    adapter
        .get_string("backtest", "data_dir")
        .filter(|d| !d.trim().is_empty())
        .map(|d| PathBuf::from(d.trim()))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn format_summary(stats: &[(String, String)]) -> String {
    let width = stats.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    stats
        .iter()
        .map(|(label, value)| format!("{label:<width$}  {value}\n"))
        .collect()
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let checked = validate_backtest_config(&adapter)
        .and_then(|()| validate_strategy_config(&adapter))
        .and_then(|()| build_backtest_config(&adapter));

    match checked {
        Ok(config) => {
            eprintln!("  Start date:      {}", config.start_date);
            eprintln!("  Initial capital: {:.2}", config.initial_capital);
            eprintln!("  Symbols:         {}", config.symbols.join(", "));
            eprintln!("  Exchange:        {}", config.exchange);
            eprintln!("Config is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => report(&e),
    }
}
