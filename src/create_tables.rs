//! Create Tables
//!
//! Drops the warehouse database if it exists, recreates it empty and creates
//! the star schema. All existing data is lost.

use anyhow::Result;
use clap::Parser;
use sparkify_etl::config::{AppConfig, CliConfig, FileConfig, DEFAULT_CONFIG_PATH};
use sparkify_etl::reset_schema;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "create-tables")]
#[command(about = "Reset the Sparkify warehouse database and create its tables")]
struct CliArgs {
    /// Path to the TOML config file.
    #[clap(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = FileConfig::load(&cli_args.config)?;
    let config = AppConfig::resolve(&CliConfig::default(), file_config)?;

    info!("Resetting warehouse database {:?}...", config.db.database_path());
    let store = reset_schema(&config.db)?;

    let counts = store.get_counts()?;
    info!(
        "Warehouse ready: {} songs, {} artists, {} users, {} time rows, {} songplays",
        counts.songs, counts.artists, counts.users, counts.time, counts.songplays
    );

    Ok(())
}
