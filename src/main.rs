//! Soundline binary entry point.

use anyhow::Context;
use clap::Parser;
use soundline::cli::{Cli, Commands};
use soundline::config::AppSettings;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("soundline={default_level}"))),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = match cli.config {
        Some(ref path) => {
            AppSettings::load_from(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => AppSettings::load().context("loading settings")?,
    };

    match cli.command {
        Commands::Scan(ref cmd) => cmd.execute(&settings, cli.quiet).await?,
        Commands::Ports(ref cmd) => cmd.execute(&settings, cli.quiet).await?,
        Commands::Interfaces(ref cmd) => cmd.execute(cli.quiet)?,
        Commands::Gateway(ref cmd) => cmd.execute().await?,
    }

    Ok(())
}
