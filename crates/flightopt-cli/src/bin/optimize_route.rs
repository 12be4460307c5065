//! CLI tool to find the fastest route through a wind corridor.
//!
//! Builds a lattice of candidate waypoints around the great circle and runs A*
//! over wind-adjusted travel times.

use anyhow::Context;
use clap::Parser;
use flightopt_cli::{init_tracing, parse_point, route_report, HeuristicArg};
use flightopt_core::{optimize_route, CalmWind, OptimizerConfig, Point, WindModel, WindProvider};
use flightopt_openmeteo::{OpenMeteoClient, OpenMeteoConfig};

/// Optimize a route through a lateral corridor using wind-adjusted time
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Origin as LAT,LON
    #[arg(long = "from", value_parser = parse_point, allow_hyphen_values = true)]
    origin: Point,

    /// Destination as LAT,LON
    #[arg(long = "to", value_parser = parse_point, allow_hyphen_values = true)]
    destination: Point,

    /// Number of corridor slices
    #[arg(long, default_value_t = 40)]
    slices: usize,

    /// Lateral offsets in km (e.g. -100 0 100)
    #[arg(
        long,
        num_args = 1..,
        allow_negative_numbers = true,
        default_values_t = [-100.0, 0.0, 100.0]
    )]
    offsets: Vec<f64>,

    /// Cruise speed in km/h
    #[arg(long, default_value_t = 900.0)]
    cruise: f64,

    /// Minimum ground speed in km/h
    #[arg(long, default_value_t = 40.0)]
    floor: f64,

    /// Fetch live wind from Open-Meteo (otherwise calm air)
    #[arg(long)]
    use_wind: bool,

    /// Disable TLS certificate verification for the wind provider
    #[arg(long)]
    no_ssl_verify: bool,

    /// Maximum concurrent wind lookups
    #[arg(long)]
    concurrency: Option<usize>,

    /// A* heuristic
    #[arg(long, value_enum, default_value_t = HeuristicArg::WindBounded)]
    heuristic: HeuristicArg,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

async fn run<P: WindProvider>(
    args: &Args,
    config: OptimizerConfig,
    provider: P,
) -> anyhow::Result<()> {
    let wind = WindModel::from_config(provider, &config);
    let result = optimize_route(args.origin, args.destination, &config, &wind)
        .await
        .context("Route optimization failed")?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?
        );
    } else {
        println!("Done. Results:");
        println!("{}", route_report(&result));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("flightopt_core=info")?;
    let args = Args::parse();

    let mut provider_config = OpenMeteoConfig::from_env();
    if args.no_ssl_verify {
        provider_config.accept_invalid_certs = true;
    }

    let config = OptimizerConfig {
        cruise_speed_kmh: args.cruise,
        slice_count: args.slices,
        lateral_offsets_km: args.offsets.clone(),
        ground_speed_floor_kmh: args.floor,
        wind_concurrency: args.concurrency.unwrap_or(provider_config.concurrency),
        wind_timeout_s: Some(provider_config.timeout.as_secs_f64()),
        heuristic: args.heuristic.into(),
        ..OptimizerConfig::default()
    };
    config.validate().context("Invalid optimizer settings")?;

    if args.use_wind {
        let client = OpenMeteoClient::new(&provider_config)?;
        tracing::info!(base_url = client.base_url(), "fetching live wind");
        run(&args, config, client).await
    } else {
        run(&args, config, CalmWind).await
    }
}
