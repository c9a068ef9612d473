mod format;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use swingsig_core::{DataProvider, Interval, Series};
use swingsig_data::CsvDataProvider;
use swingsig_engine::{Analysis, AugmentedPoint, Engine, EngineConfig};
use swingsig_risk::PositionSize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::format::{fixed, format_compact, optional, signal_message, signed};

#[derive(Parser)]
#[command(name = "swingsig")]
#[command(about = "Swing-trading signal engine: indicators, signals, trend and risk levels from OHLCV data")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis on the latest bar
    Analyze {
        #[command(flatten)]
        source: SourceArgs,

        /// Account equity; prints a position size for the latest close
        #[arg(long)]
        equity: Option<Decimal>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the most recent rows of the indicator set
    Indicators {
        #[command(flatten)]
        source: SourceArgs,

        /// Number of rows to print
        #[arg(short, long, default_value = "10")]
        tail: usize,

        /// Allow series shorter than the warm-up, leaving undefined values blank
        #[arg(long)]
        partial: bool,

        /// Print the rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default configuration as TOML
    Config,

    /// List instruments available in the data directory
    Instruments {
        /// Directory holding `{SYMBOL}.csv` / `{SYMBOL}_{interval}.csv` files
        #[arg(short, long, env = "SWINGSIG_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Instrument symbol (e.g. "AAPL")
    #[arg(short, long)]
    symbol: String,

    /// Directory holding `{SYMBOL}.csv` / `{SYMBOL}_{interval}.csv` files
    #[arg(short, long, env = "SWINGSIG_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Bar interval (1min, 5min, 15min, 30min, 60min, daily)
    #[arg(short, long, default_value = "daily")]
    interval: Interval,

    /// TOML config file; defaults apply when omitted
    #[arg(short, long, env = "SWINGSIG_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze {
            source,
            equity,
            json,
        } => run_analyze(source, equity, json).await?,
        Commands::Indicators {
            source,
            tail,
            partial,
            json,
        } => run_indicators(source, tail, partial, json).await?,
        Commands::Config => {
            print!("{}", EngineConfig::default().to_toml_string()?);
        }
        Commands::Instruments { data_dir } => {
            let instruments = CsvDataProvider::new(&data_dir)
                .available_instruments()
                .await
                .with_context(|| format!("Failed to list {}", data_dir.display()))?;
            if instruments.is_empty() {
                println!("No instruments found in {}", data_dir.display());
            }
            for symbol in instruments {
                println!("{symbol}");
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let config = EngineConfig::load(path)
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            tracing::info!(path = %path.display(), "Loaded configuration");
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

async fn load_series(source: &SourceArgs) -> Result<Series> {
    let provider = CsvDataProvider::new(&source.data_dir);
    let series = provider
        .load_series(&source.symbol, source.interval)
        .await
        .with_context(|| format!("Failed to load {} ({})", source.symbol, source.interval))?;
    tracing::info!(
        instrument = %series.instrument(),
        interval = %source.interval,
        bars = series.len(),
        "Loaded historical data"
    );
    Ok(series)
}

async fn run_analyze(source: SourceArgs, equity: Option<Decimal>, json: bool) -> Result<()> {
    let engine = Engine::new(load_config(source.config.as_deref())?)?;
    let series = load_series(&source).await?;

    let analysis = match engine.analyze(&series) {
        Ok(analysis) => analysis,
        Err(e) if e.is_insufficient_data() => {
            tracing::warn!(
                bars = series.len(),
                required = engine.min_bars(),
                "Not enough history for analysis"
            );
            return Err(e).context(format!(
                "{} has {} bars; analysis needs at least {}",
                series.instrument(),
                series.len(),
                engine.min_bars()
            ));
        }
        Err(e) => return Err(e).context("Analysis failed"),
    };

    let sizing = match (equity, analysis.latest_close()) {
        (Some(equity), Some(close)) => Some(engine.position_size(equity, close)?),
        _ => None,
    };

    if json {
        let out = serde_json::json!({
            "analysis": analysis,
            "position_size": sizing,
            "messages": analysis.signals.iter().map(signal_message).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_report(&engine, &analysis, source.interval, equity.zip(sizing));
    }
    Ok(())
}

fn print_report(
    engine: &Engine,
    analysis: &Analysis,
    interval: Interval,
    sizing: Option<(Decimal, PositionSize)>,
) {
    let Some(latest) = analysis.augmented.latest() else {
        return;
    };
    let ind = &latest.indicators;
    let p = engine.builder().params();
    let risk = &analysis.risk;
    let summary = &analysis.summary;
    let label = |state: Option<String>| state.unwrap_or_else(|| "-".to_string());

    let sep = "=".repeat(60);
    println!("\n{sep}");
    println!(
        "  {} ({}, {} bars)  {}",
        analysis.instrument,
        interval,
        analysis.augmented.len(),
        latest.bar.timestamp.format("%Y-%m-%d %H:%M")
    );
    println!("{sep}");
    println!(
        "  Close:           {} ({}%)",
        format_compact(latest.bar.close, 2),
        signed(summary.price_change_pct, 2)
    );
    println!("  Volume:          {}", format_compact(latest.bar.volume, 2));
    println!("  Trend:           {}", analysis.trend);

    println!("\n  Indicators");
    println!("    RSI({}):{:>10}", p.rsi(), optional(ind.rsi, 2));
    println!(
        "    MACD:          {} / signal {} / hist {}",
        optional(ind.macd, 4),
        optional(ind.macd_signal, 4),
        optional(ind.macd_hist, 4)
    );
    println!(
        "    Bollinger:     {} / {} / {}",
        optional(ind.bb_upper, 2),
        optional(ind.bb_middle, 2),
        optional(ind.bb_lower, 2)
    );
    println!("    Volume SMA:    {}", optional(ind.volume_sma, 2));
    println!(
        "    EMA({}) / SMA({}) / SMA({}): {} / {} / {}",
        p.ema_trend(),
        p.sma_short(),
        p.sma_long(),
        optional(ind.ema_trend, 2),
        optional(ind.sma_short, 2),
        optional(ind.sma_long, 2)
    );

    println!("\n  Signals");
    if analysis.signals.is_empty() {
        println!("    (none)");
    }
    for signal in &analysis.signals {
        let msg = signal_message(signal);
        println!(
            "    {} {:<6} {} {} [{}]",
            msg.badge, signal.strength, signal.kind, msg.message, msg.color
        );
    }

    println!("\n  Risk");
    println!("    Stop Loss:     {}", fixed(risk.stop_loss, 2));
    println!("    Take Profit:   {}", fixed(risk.take_profit, 2));
    println!("    ATR({}):       {}", p.atr(), fixed(risk.atr, 4));
    println!("    Risk/Reward:   {}", fixed(risk.risk_reward_ratio, 2));
    if let Some((equity, size)) = sizing {
        println!(
            "    Position:      {} units (notional {}, at risk {}) on equity {}",
            size.quantity,
            format_compact(size.notional, 2),
            format_compact(size.capital_at_risk, 2),
            format_compact(equity, 2)
        );
    }

    println!("\n  Summary");
    println!("    Price vs MA:   {}", label(summary.price_vs_ma.map(|s| s.to_string())));
    println!("    MACD:          {}", label(summary.macd_bias.map(|s| s.to_string())));
    println!("    Momentum:      {}", label(summary.momentum.map(|s| s.to_string())));
    println!("    Volume:        {}", label(summary.volume.map(|s| s.to_string())));
    println!("{sep}\n");
}

async fn run_indicators(source: SourceArgs, tail: usize, partial: bool, json: bool) -> Result<()> {
    let engine = Engine::new(load_config(source.config.as_deref())?)?;
    let series = load_series(&source).await?;

    let builder = engine.builder();
    let augmented = if partial {
        builder.build_partial(&series)?
    } else {
        builder
            .build(&series)
            .context("Series is shorter than the indicator warm-up; use --partial")?
    };
    let rows = augmented.tail(tail);

    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    println!(
        "{:<17} {:>10} {:>9} {:>7} {:>9} {:>9} {:>9} {:>10} {:>10} {:>10} {:>9} {:>8}",
        "timestamp", "close", "volume", "rsi", "macd", "signal", "hist", "bb_upper", "bb_middle",
        "bb_lower", "vol_sma", "atr"
    );
    for row in rows {
        print_row(row);
    }
    Ok(())
}

fn print_row(row: &AugmentedPoint) {
    let ind = &row.indicators;
    println!(
        "{:<17} {:>10} {:>9} {:>7} {:>9} {:>9} {:>9} {:>10} {:>10} {:>10} {:>9} {:>8}",
        row.bar.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        fixed(row.bar.close, 2),
        format_compact(row.bar.volume, 1),
        optional(ind.rsi, 2),
        optional(ind.macd, 4),
        optional(ind.macd_signal, 4),
        optional(ind.macd_hist, 4),
        optional(ind.bb_upper, 2),
        optional(ind.bb_middle, 2),
        optional(ind.bb_lower, 2),
        optional(ind.volume_sma, 1),
        optional(ind.atr, 4),
    );
}
