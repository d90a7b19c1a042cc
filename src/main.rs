//! Sparkify ETL
//!
//! Loads every song metadata file and then every activity log file into an
//! existing warehouse database. Run `create-tables` first.

use anyhow::Result;
use clap::Parser;
use sparkify_etl::config::{AppConfig, CliConfig, FileConfig, DEFAULT_CONFIG_PATH};
use sparkify_etl::{run_load, SqliteWarehouseStore};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "etl")]
#[command(about = "Load song and log data into the Sparkify warehouse")]
struct CliArgs {
    /// Path to the TOML config file.
    #[clap(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Root of the song metadata tree. Overrides `data.song_data`.
    #[clap(long)]
    pub song_data: Option<PathBuf>,

    /// Root of the activity log tree. Overrides `data.log_data`.
    #[clap(long)]
    pub log_data: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            song_data: self.song_data.clone(),
            log_data: self.log_data.clone(),
        }
    }
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
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let db_path = config.db.database_path();
    info!("Opening warehouse database at {:?}...", db_path);
    let store = SqliteWarehouseStore::open(&db_path)?;

    info!("Song data: {}", config.data.song_data.display());
    info!("Log data: {}", config.data.log_data.display());
    let summary = run_load(&store, &config.data)?;

    let counts = store.get_counts()?;
    info!("");
    info!("Load Summary");
    info!("============");
    info!(
        "Song files processed: {}/{}",
        summary.song_files.files_processed, summary.song_files.files_found
    );
    info!(
        "Log files processed: {}/{}",
        summary.log_files.files_processed, summary.log_files.files_found
    );
    info!("Warehouse contains:");
    info!("  {} songs", counts.songs);
    info!("  {} artists", counts.artists);
    info!("  {} users", counts.users);
    info!("  {} time rows", counts.time);
    info!("  {} songplays", counts.songplays);

    Ok(())
}
