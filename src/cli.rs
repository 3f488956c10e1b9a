//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_report::SvgReportAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{
    parse_date, validate_backtest_config, validate_indicator_config,
};
use crate::domain::error::ConfluenceError;
use crate::domain::indicator::IndicatorParams;
use crate::domain::signal::SignalRules;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "confluence",
    about = "Moving-average, RSI and Bollinger Band confluence backtester"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override [backtest] symbol
        #[arg(long)]
        symbol: Option<String>,
        /// Override [data] path
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Override [report] output_dir
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            data_dir,
            output_dir,
            dry_run,
        } => {
            let overrides = Overrides {
                symbol,
                data_dir,
                output_dir,
            };
            if dry_run {
                run_dry_run(&config, &overrides)
            } else {
                run_backtest(&config, &overrides)
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub symbol: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(&self, adapter: &mut FileConfigAdapter) {
        if let Some(symbol) = &self.symbol {
            adapter.set("backtest", "symbol", symbol);
        }
        if let Some(dir) = &self.data_dir {
            adapter.set("data", "path", &dir.display().to_string());
        }
        if let Some(dir) = &self.output_dir {
            adapter.set("report", "output_dir", &dir.display().to_string());
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_validated(path: &Path, overrides: &Overrides) -> Result<FileConfigAdapter, ExitCode> {
    tracing::info!(path = %path.display(), "loading config");
    let mut adapter = load_config(path)?;
    overrides.apply(&mut adapter);

    validate_backtest_config(&adapter)
        .and_then(|()| validate_indicator_config(&adapter))
        .map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        })?;
    Ok(adapter)
}

pub fn data_dir(adapter: &dyn ConfigPort) -> PathBuf {
    PathBuf::from(
        adapter
            .get_string("data", "path")
            .unwrap_or_else(|| "data".to_string()),
    )
}

pub fn output_dir(adapter: &dyn ConfigPort) -> PathBuf {
    PathBuf::from(
        adapter
            .get_string("report", "output_dir")
            .unwrap_or_else(|| ".".to_string()),
    )
}

fn window(adapter: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, ConfluenceError> {
    let value = adapter.get_int("indicators", key, default as i64)?;
    usize::try_from(value).map_err(|_| ConfluenceError::ConfigInvalid {
        section: "indicators".into(),
        key: key.into(),
        reason: format!("{key} must not be negative"),
    })
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, ConfluenceError> {
    let symbol = adapter
        .get_string("backtest", "symbol")
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfluenceError::ConfigMissing {
            section: "backtest".into(),
            key: "symbol".into(),
        })?;

    let start_date = parse_date(
        adapter.get_string("backtest", "start_date").as_deref(),
        "start_date",
    )?;
    let end_date = parse_date(
        adapter.get_string("backtest", "end_date").as_deref(),
        "end_date",
    )?;

    let defaults = IndicatorParams::default();
    let indicators = IndicatorParams {
        fast_window: window(adapter, "fast_ma", defaults.fast_window)?,
        slow_window: window(adapter, "slow_ma", defaults.slow_window)?,
        bollinger_window: window(adapter, "bollinger", defaults.bollinger_window)?,
        bollinger_mult: adapter.get_double(
            "indicators",
            "bollinger_mult",
            defaults.bollinger_mult,
        )?,
        rsi_window: window(adapter, "rsi", defaults.rsi_window)?,
    };

    let default_rules = SignalRules::default();
    let rules = SignalRules {
        rsi_oversold: adapter.get_double("signals", "rsi_oversold", default_rules.rsi_oversold)?,
        rsi_overbought: adapter.get_double(
            "signals",
            "rsi_overbought",
            default_rules.rsi_overbought,
        )?,
    };

    Ok(BacktestConfig {
        symbol,
        start_date,
        end_date,
        initial_capital: adapter.get_double("backtest", "initial_capital", 10_000.0)?,
        indicators,
        rules,
    })
}

fn run_backtest(config_path: &Path, overrides: &Overrides) -> ExitCode {
    let adapter = match load_validated(config_path, overrides) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = CsvAdapter::new(data_dir(&adapter));
    let report_port = SvgReportAdapter::new();

    run_backtest_pipeline(&data_port, &report_port, &bt_config, &output_dir(&adapter))
}

/// Fetch, simulate, print the summary and write the charts.
///
/// Nothing is printed to stdout or written to disk if the data cannot be
/// loaded.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    bt_config: &BacktestConfig,
    output_dir: &Path,
) -> ExitCode {
    tracing::info!(
        symbol = %bt_config.symbol,
        start = %bt_config.start_date,
        end = %bt_config.end_date,
        "running backtest"
    );

    let prices = match backtest_engine::load_prices(data_port, bt_config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let result = backtest_engine::run_backtest(&prices, bt_config);
    print!("{}", format_summary(&result));

    match report_port.write(&result, bt_config, output_dir) {
        Ok(paths) => {
            for path in &paths {
                eprintln!("Chart written to: {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            (&e).into()
        }
    }
}

/// Console summary: the four comparison metrics first, then supporting detail.
pub fn format_summary(result: &BacktestResult) -> String {
    Summary(result).to_string()
}

struct Summary<'a>(&'a BacktestResult);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategy = &self.0.strategy_report;
        let baseline = &self.0.baseline_report;
        let sim = &self.0.simulation;

        writeln!(f, "Strategy Sharpe Ratio: {:.2}", strategy.sharpe_ratio)?;
        writeln!(f, "Buy-and-Hold Sharpe Ratio: {:.2}", baseline.sharpe_ratio)?;
        writeln!(f, "Strategy Max Drawdown: {:.2}%", strategy.max_drawdown * 100.0)?;
        writeln!(f, "Buy-and-Hold Max Drawdown: {:.2}%", baseline.max_drawdown * 100.0)?;

        writeln!(f)?;
        writeln!(f, "Strategy Total Return: {:.2}%", strategy.total_return * 100.0)?;
        writeln!(f, "Buy-and-Hold Total Return: {:.2}%", baseline.total_return * 100.0)?;
        writeln!(f, "Fills: {}", sim.trade_count())?;
        writeln!(f, "Closed trades: {}", sim.closed_trades.len())?;

        if !sim.closed_trades.is_empty() {
            writeln!(f)?;
            writeln!(f, "=== Closed Trades ===")?;
            for trade in &sim.closed_trades {
                let pnl_sign = if trade.pnl >= 0.0 { "+" } else { "-" };
                writeln!(
                    f,
                    "  {} -> {} ({} days): {:.2} -> {:.2}, {}${:.2} ({:.2}%)",
                    trade.entry_date,
                    trade.exit_date,
                    trade.holding_days(),
                    trade.entry_price,
                    trade.exit_price,
                    pnl_sign,
                    trade.pnl.abs(),
                    trade.return_pct(),
                )?;
            }
        }
        if let Some(position) = sim.final_state.position() {
            let last_close = self.0.prices.last().close;
            writeln!(
                f,
                "Open position: {:.4} shares since {} at {:.2}, unrealized {:.2}",
                position.shares,
                position.entry_date,
                position.entry_price,
                position.unrealized_pnl(last_close)
            )?;
        }
        Ok(())
    }
}

pub fn run_dry_run(config_path: &Path, overrides: &Overrides) -> ExitCode {
    let adapter = match load_validated(config_path, overrides) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let params = &bt_config.indicators;
    eprintln!("Config validated successfully");
    eprintln!("\nBacktest:");
    eprintln!("  symbol:  {}", bt_config.symbol);
    eprintln!(
        "  range:   {} to {}",
        bt_config.start_date, bt_config.end_date
    );
    eprintln!("  capital: {:.2}", bt_config.initial_capital);
    eprintln!("\nIndicators:");
    eprintln!("  fast MA:   {}", params.fast_window);
    eprintln!("  slow MA:   {}", params.slow_window);
    eprintln!(
        "  bollinger: {} x {}",
        params.bollinger_window, params.bollinger_mult
    );
    eprintln!("  RSI:       {}", params.rsi_window);
    eprintln!(
        "  thresholds: oversold {} / overbought {}",
        bt_config.rules.rsi_oversold, bt_config.rules.rsi_overbought
    );
    eprintln!("\nData:   {}", data_dir(&adapter).display());
    eprintln!("Output: {}", output_dir(&adapter).display());

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    match load_validated(config_path, &Overrides::default()) {
        Ok(_) => {
            eprintln!("Configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let adapter = CsvAdapter::new(data_dir(&config));
    let symbols = match adapter.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found in {}", data_dir(&config).display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, symbol: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbol = match symbol
        .map(str::to_string)
        .or_else(|| config.get_string("backtest", "symbol"))
    {
        Some(s) => s.trim().to_uppercase(),
        None => {
            eprintln!("error: symbol is required (use --symbol or set in config)");
            return ExitCode::from(2);
        }
    };

    let adapter = CsvAdapter::new(data_dir(&config));
    match adapter.get_data_range(&symbol) {
        Ok(Some((min_date, max_date, count))) => {
            println!("{}: {} bars, {} to {}", symbol, count, min_date, max_date);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", symbol);
            ExitCode::from(5)
        }
        Err(e) => {
            eprintln!("error querying {}: {}", symbol, e);
            (&e).into()
        }
    }
}
