// Engine CLI entry point
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use engine::analysis::{multi_timeframe_overview, Analysis};
use engine::config::EngineSettings;
use engine::data::{LastKnownRates, OhlcCsvParser, SyntheticSeriesGenerator};
use engine::indicators::build_calculator;
use engine::{PriceSeries, RecommendationEngine};
use shared::models::TimeFrame;
use shared::utils::forex_format;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "engine", version, about = "Forex technical indicator & recommendation engine")]
struct Cli {
    /// JSON settings file (falls back to ENGINE_CONFIG, then defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recommendation, indicator panel, levels and snapshot for one pair
    Analyze {
        /// Currency pair label, e.g. EUR/USD
        pair: String,

        #[arg(short, long, default_value = "1h", value_parser = parse_timeframe)]
        timeframe: TimeFrame,

        /// OHLC CSV file (time,open,high,low,close); synthetic series when absent
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Seed for the synthetic series
        #[arg(long)]
        seed: Option<u64>,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Single-series indicator values (sma, ema, rsi, atr)
    Indicator {
        kind: String,

        /// JSON parameters, e.g. '{"period": 20}'
        #[arg(long, default_value = "{}")]
        params: String,

        #[arg(long)]
        csv: Option<PathBuf>,

        #[arg(long, default_value = "EUR/USD")]
        pair: String,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Direction and RSI of one pair across every timeframe
    Overview {
        pair: String,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Re-analyse pairs on a fixed interval until Ctrl-C
    Watch {
        #[arg(required = true)]
        pairs: Vec<String>,

        #[arg(short, long, default_value = "1h", value_parser = parse_timeframe)]
        timeframe: TimeFrame,

        /// Refresh interval in seconds (overrides the settings file)
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

fn parse_timeframe(s: &str) -> std::result::Result<TimeFrame, String> {
    TimeFrame::from_label(s).ok_or_else(|| {
        let known: Vec<&str> = TimeFrame::ALL.iter().map(|tf| tf.label()).collect();
        format!("unknown timeframe '{}' (expected one of {})", s, known.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = EngineSettings::load(cli.config.as_deref()).context("Failed to load engine settings")?;
    let engine = RecommendationEngine::new(settings.analysis.clone());

    match cli.command {
        Command::Analyze { pair, timeframe, csv, seed, json } => {
            let series = load_series(&pair, timeframe, csv.as_deref(), seed, &settings)?;
            let analysis = engine.analyze(&pair, &series, timeframe.label());
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_report(&pair, &analysis);
            }
        }
        Command::Indicator { kind, params, csv, pair, seed } => {
            let params: serde_json::Value =
                serde_json::from_str(&params).with_context(|| format!("Invalid JSON parameters for indicator '{}'", kind))?;
            let calculator = build_calculator(&kind, &params)?;
            let series = load_series(&pair, TimeFrame::Day1, csv.as_deref(), seed, &settings)?;
            let values = calculator.calculate(series.candles());
            let output = serde_json::json!({
                "indicator": calculator.name(),
                "parameters": calculator.parameters(),
                "values": values,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Overview { pair, seed } => {
            let base_seed = seed.unwrap_or(settings.synthetic.seed);
            let rates = LastKnownRates::sample();
            let mut entries = Vec::with_capacity(TimeFrame::ALL.len());
            for (i, timeframe) in TimeFrame::ALL.into_iter().enumerate() {
                let mut generator = SyntheticSeriesGenerator::new(base_seed.wrapping_add(i as u64));
                let start = chrono::Utc::now().timestamp() - timeframe.seconds() * 50;
                entries.push((timeframe, generator.fallback_series(&pair, Some(&rates), 50, timeframe, start)?));
            }
            for tile in multi_timeframe_overview(&entries, &settings.analysis) {
                println!("{:>4}  {:<5} RSI {:>5.1}  {}", tile.label, format!("{:?}", tile.direction), tile.rsi, tile.trend);
            }
        }
        Command::Watch { pairs, timeframe, interval } => {
            let secs = interval.unwrap_or(settings.refresh_interval_secs).max(1);
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            };
            watch(&engine, &settings, &pairs, timeframe, Duration::from_secs(secs), shutdown).await?;
        }
    }
    Ok(())
}

fn load_series(
    pair: &str,
    timeframe: TimeFrame,
    csv: Option<&Path>,
    seed: Option<u64>,
    settings: &EngineSettings,
) -> Result<PriceSeries> {
    if let Some(path) = csv {
        info!(path = %path.display(), "Loading price series from CSV");
        return OhlcCsvParser::load_series_from_csv(path)
            .with_context(|| format!("Failed to load price series from '{}'", path.display()));
    }
    let mut synthetic = settings.synthetic.clone();
    if let Some(seed) = seed {
        synthetic.seed = seed;
    }
    let count = synthetic.candles;
    let start = chrono::Utc::now().timestamp() - timeframe.seconds() * count as i64;
    let series = SyntheticSeriesGenerator::from_settings(&synthetic).fallback_series(
        pair,
        Some(&LastKnownRates::sample()),
        count,
        timeframe,
        start,
    )?;
    Ok(series)
}

// Each tick is a fresh, independent analysis; stopping just drops the next one.
async fn watch(
    engine: &RecommendationEngine,
    settings: &EngineSettings,
    pairs: &[String],
    timeframe: TimeFrame,
    period: Duration,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    if pairs.is_empty() {
        return Err(anyhow!("No pairs to watch"));
    }
    info!(pairs = ?pairs, timeframe = %timeframe, interval_secs = period.as_secs(), "Starting refresh loop");
    let mut ticker = tokio::time::interval(period);
    let mut tick: u64 = 0;
    // Pinned once for the whole loop so a signal during a tick is not lost.
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for pair in pairs {
                    let seed = settings.synthetic.seed.wrapping_add(tick);
                    let series = load_series(pair, timeframe, None, Some(seed), settings)?;
                    let rec = engine.recommend(pair, series.candles(), timeframe.label());
                    info!(
                        pair = %pair,
                        action = %rec.action,
                        confidence = rec.confidence,
                        entry = %forex_format::format_price(pair, rec.entry_price),
                        "{}",
                        rec.summary
                    );
                }
                tick += 1;
            }
            _ = &mut shutdown => {
                info!("Stopping refresh loop");
                return Ok(());
            }
        }
    }
}

fn print_report(pair: &str, analysis: &Analysis) {
    let rec = &analysis.recommendation;
    let price = |v: f64| forex_format::format_price(pair, v);

    println!("{}", rec.summary);
    println!(
        "  {}  confidence {}%  entry {}  stop {}  target {}  R:R {:.1}",
        rec.action,
        rec.confidence,
        price(rec.entry_price),
        price(rec.stop_loss),
        price(rec.take_profit),
        rec.risk_reward_ratio
    );
    for reason in &rec.reasons {
        println!("  - {}", reason);
    }
    println!("Trend: {}", analysis.trend);
    for reading in &analysis.indicators {
        println!("  {:<18} {:>20}  {:?}  {}", reading.name, reading.value, reading.signal, reading.description);
    }
    let support: Vec<String> = analysis.levels.support.iter().map(|&v| price(v)).collect();
    let resistance: Vec<String> = analysis.levels.resistance.iter().map(|&v| price(v)).collect();
    println!("Support:    {}", support.join("  "));
    println!("Resistance: {}", resistance.join("  "));
    let snapshot = &analysis.snapshot;
    println!(
        "ATR {} ({:.2}%, {:?})  session {} - {}  change {:+.2}%",
        price(snapshot.atr),
        snapshot.volatility_percent,
        snapshot.volatility,
        price(snapshot.session_low),
        price(snapshot.session_high),
        snapshot.change_percent
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_watch_stops_on_shutdown() {
        let engine = RecommendationEngine::default();
        let settings = EngineSettings::default();
        let pairs = vec!["EUR/USD".to_string(), "USD/JPY".to_string()];
        let shutdown = tokio::time::sleep(Duration::from_millis(50));

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            watch(&engine, &settings, &pairs, TimeFrame::Hour1, Duration::from_millis(10), shutdown),
        )
        .await;
        assert!(matches!(result, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn test_watch_shutdown_already_fired() {
        let engine = RecommendationEngine::default();
        let settings = EngineSettings::default();
        let pairs = vec!["GBP/USD".to_string()];
        // Resolved before the first select; a long period means no second tick.
        let result = watch(&engine, &settings, &pairs, TimeFrame::Day1, Duration::from_secs(3600), async {}).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_watch_requires_pairs() {
        let engine = RecommendationEngine::default();
        let settings = EngineSettings::default();
        let result = watch(&engine, &settings, &[], TimeFrame::Hour1, Duration::from_secs(1), async {}).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_timeframe() {
        assert_eq!(parse_timeframe("4h"), Ok(TimeFrame::Hour4));
        assert!(parse_timeframe("2h").unwrap_err().contains("expected one of"));
    }
}
