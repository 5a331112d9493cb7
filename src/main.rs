//! navsync - scroll-synced sidebar navigation, simulated and linted from the command line

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use navsync::cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(&cli);
    if cli.no_color {
        colored::control::set_override(false);
    }
    cli::run(cli)
}

/// Logs go to stderr so stdout stays a clean ResultSet.
/// `--verbose`/`--quiet` win over `RUST_LOG`, which wins over the `warn` default.
fn init_tracing(cli: &cli::Cli) {
    let filter = if cli.verbose {
        EnvFilter::new("navsync=debug")
    } else if cli.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .with_target(false)
        .init();
}
