#![warn(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use smartblog::Config;
use smartblog::cli::Cli;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = Config::load_or_init()?;
    config.apply_env_overrides();
    config.validate()?;
    smartblog::app::dispatch::dispatch(cli, config).await
}
