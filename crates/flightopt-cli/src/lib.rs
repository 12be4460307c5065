//! Flight optimizer CLI - command line tools for wind-optimized routing.
//!
//! This crate provides the CLI binaries:
//! - optimize_route: corridor A* search with optional live wind
//! - route_eta: great-circle ETA with optional wind adjustment

pub mod args;
pub mod report;

pub use args::{parse_point, HeuristicArg};
pub use report::{eta_report, route_report};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the fmt subscriber, honouring `RUST_LOG` on top of `default_directive`.
///
/// Logs go to stderr so that `--json` output on stdout stays machine-readable.
pub fn init_tracing(default_directive: &str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(default_directive.parse()?))
        .try_init()?;
    Ok(())
}
