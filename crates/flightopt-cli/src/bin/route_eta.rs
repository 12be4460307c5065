//! CLI tool to estimate flight time along the great circle.
//!
//! Prints the no-wind ETA and, with `--use-wind`, a wind-adjusted ETA sampled
//! every few segments.

use anyhow::Context;
use clap::Parser;
use flightopt_cli::{eta_report, init_tracing, parse_point};
use flightopt_core::{
    estimate_great_circle_eta, CalmWind, EtaConfig, Point, WindModel, WindProvider,
};
use flightopt_openmeteo::{OpenMeteoClient, OpenMeteoConfig};

/// Great-circle ETA with optional wind adjustment
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Origin as LAT,LON
    #[arg(long = "from", value_parser = parse_point, allow_hyphen_values = true)]
    origin: Point,

    /// Destination as LAT,LON
    #[arg(long = "to", value_parser = parse_point, allow_hyphen_values = true)]
    destination: Point,

    /// Number of great-circle segments
    #[arg(long, default_value_t = 200)]
    points: usize,

    /// Cruise speed in km/h
    #[arg(long, default_value_t = 900.0)]
    cruise: f64,

    /// Fetch wind data and compute a wind-adjusted ETA
    #[arg(long)]
    use_wind: bool,

    /// Sample wind every N segments
    #[arg(long, default_value_t = 8)]
    sample_rate: usize,

    /// Disable TLS certificate verification for the wind provider
    #[arg(long)]
    no_ssl_verify: bool,

    /// Print the estimate as JSON
    #[arg(long)]
    json: bool,
}

async fn run<P: WindProvider>(
    args: &Args,
    config: &EtaConfig,
    wind: WindModel<P>,
) -> anyhow::Result<()> {
    let estimate = estimate_great_circle_eta(args.origin, args.destination, config, &wind)
        .await
        .context("ETA estimate failed")?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&estimate).context("Failed to serialize estimate")?
        );
    } else {
        println!("{}", eta_report(&estimate, config.cruise_speed_kmh, args.use_wind));
        println!("Done.");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("flightopt_core=info")?;
    let args = Args::parse();

    let config = EtaConfig {
        segments: args.points,
        sample_every: args.sample_rate,
        cruise_speed_kmh: args.cruise,
        ..EtaConfig::default()
    };
    config.validate().context("Invalid ETA settings")?;

    if args.use_wind {
        let mut provider_config = OpenMeteoConfig::from_env();
        if args.no_ssl_verify {
            provider_config.accept_invalid_certs = true;
        }
        let client = OpenMeteoClient::new(&provider_config)?;
        eprintln!("Fetching wind data (may take a moment depending on sample rate)...");
        let wind = WindModel::new(client)
            .with_concurrency(provider_config.concurrency)
            .with_timeout(provider_config.timeout);
        run(&args, &config, wind).await
    } else {
        run(&args, &config, WindModel::new(CalmWind)).await
    }
}
