use anyhow::{bail, Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use signal_gate::config::Config;
use signal_gate::models::{Direction, LevelRequest, Signal};
use signal_gate::pipeline::{SignalPipeline, SignalService};
use signal_gate::providers::ReplayProvider;

const USAGE: &str = "usage: signal-gate <replay.json> <SYMBOL> <BUY|SELL> <confidence> \
                     [<tp_value> <tp_unit> [<sl_value> <sl_unit>]]";

fn parse_signal(args: &[String], cfg: &Config) -> Result<Signal> {
    if args.len() < 4 {
        bail!(USAGE);
    }
    let direction = Direction::from_str_loose(&args[2])
        .with_context(|| format!("unknown direction {:?}", args[2]))?;
    let confidence: f64 = args[3]
        .parse()
        .with_context(|| format!("confidence {:?} is not a number", args[3]))?;

    let mut signal =
        Signal::new(&args[1], direction, confidence).with_lot_size(cfg.default_lot_size);
    if let (Some(value), Some(unit)) = (args.get(4), args.get(5)) {
        signal.take_profit = Some(LevelRequest::new(value.as_str(), unit.as_str()));
    }
    if let (Some(value), Some(unit)) = (args.get(6), args.get(7)) {
        signal.stop_loss = Some(LevelRequest::new(value.as_str(), unit.as_str()));
    }
    Ok(signal)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    cfg.validate().context("invalid configuration")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let path = args.first().context(USAGE)?;
    let signal = parse_signal(&args, &cfg)?;

    let replay = ReplayProvider::from_file(path)?;
    info!("Replay loaded, cursor at {}", replay.current_time());
    let account = replay.clone();
    let specs = replay.clone();

    let timeout = Duration::from_millis(cfg.evaluation_timeout_ms);
    let pipeline = Arc::new(SignalPipeline::new(cfg));
    let mut service = SignalService::new(
        pipeline.clone(),
        Box::new(replay),
        Box::new(account),
        Box::new(specs),
    );

    let decision = service.evaluate_with_timeout(&signal, timeout).await?;
    println!("{}", serde_json::to_string_pretty(&decision)?);
    info!("{}", decision.summary());
    Ok(())
}
