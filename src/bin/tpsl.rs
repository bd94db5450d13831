use anyhow::{bail, Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use signal_gate::core::tp_sl::{min_stop_distance, pip_size};
use signal_gate::models::{Direction, SymbolSpec};
use signal_gate::convert_tp_sl;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    // tpsl <value> <unit> <symbol> <BUY|SELL> <price> [lot]
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 6 {
        bail!("usage: tpsl <value> <unit> <symbol> <BUY|SELL> <price> [lot]");
    }

    let value = &args[1];
    let unit = &args[2];
    let symbol = &args[3];
    let direction = Direction::from_str_loose(&args[4])
        .with_context(|| format!("unknown direction {:?}", args[4]))?;
    let price: f64 = args[5]
        .parse()
        .with_context(|| format!("price {:?} is not a number", args[5]))?;
    let lot_size: f64 = args
        .get(6)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.01);

    let level = convert_tp_sl(value, unit, symbol, direction, price, lot_size);
    let spec = SymbolSpec::for_symbol(symbol);

    println!("Symbol:        {} {}", symbol.to_uppercase(), direction);
    println!("Reference:     {:.*}", spec.digits as usize, price);
    println!("Request:       {} {}", value, unit);
    println!("Pip size:      {}", pip_size(symbol));
    println!("Min distance:  {}", min_stop_distance(symbol, &spec));
    if level > 0.0 {
        println!("Level:         {:.*}", spec.digits as usize, level);
    } else {
        println!("Level:         none (conversion failed, see log)");
    }
    Ok(())
}
