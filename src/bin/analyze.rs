use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use mining_analytics::{AnalysisConfig, AnalysisReport, CoinGeckoParser, PriceParser};

/// Computes indicators, risk metrics and mining profitability from a
/// CoinGecko market_chart payload.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the price payload (JSON)
    prices: PathBuf,

    /// Path to an analysis config (JSON); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Spot price for the mining model; defaults to the last price
    #[arg(short, long)]
    price: Option<f64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            AnalysisConfig::from_json_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => AnalysisConfig::default(),
    };

    let parser = CoinGeckoParser::new();
    let payload = fs::read_to_string(&args.prices)
        .with_context(|| format!("reading prices {}", args.prices.display()))?;
    let series = parser
        .parse_series(&payload)
        .with_context(|| format!("decoding {} payload", parser.name()))?;
    info!("loaded {} samples from {}", series.len(), args.prices.display());

    let report = AnalysisReport::build(&series, &config, args.price)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}
