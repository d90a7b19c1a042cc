use super::discovery::discover;
use super::log_loader::process_log_file;
use super::song_loader::process_song_file;
use crate::config::DataSettings;
use crate::warehouse::WarehouseStore;
use anyhow::{Context, Result};
use std::ops::AddAssign;
use std::path::Path;
use tracing::{info, warn};

/// Loads a single input file through the store.
pub type FileHandler = fn(&dyn WarehouseStore, &Path) -> Result<LoadStats>;

/// What a handler did with one or more files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Records read from the files.
    pub records: usize,
    /// Log events that are not song plays.
    pub ignored: usize,
    pub songs: usize,
    pub artists: usize,
    pub songplays: usize,
    /// Songplays that resolved to a known song and artist.
    pub matched: usize,
}

impl AddAssign for LoadStats {
    fn add_assign(&mut self, other: Self) {
        self.records += other.records;
        self.ignored += other.ignored;
        self.songs += other.songs;
        self.artists += other.artists;
        self.songplays += other.songplays;
        self.matched += other.matched;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub files_found: usize,
    pub files_processed: usize,
    pub stats: LoadStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub song_files: ProcessSummary,
    pub log_files: ProcessSummary,
}

/// Run `handler` on every JSON file below `root`, one commit per file.
///
/// The first failing file aborts the run. Its writes are rolled back; files
/// processed before it stay committed.
pub fn process_data(
    store: &dyn WarehouseStore,
    root: &Path,
    handler: FileHandler,
) -> Result<ProcessSummary> {
    let files = discover(root)?;
    let total = files.len();
    info!("{} files found in {}", total, root.display());

    let mut summary = ProcessSummary {
        files_found: total,
        ..Default::default()
    };

    for (index, path) in files.iter().enumerate() {
        store.begin()?;
        let stats = match handler(store, path) {
            Ok(stats) => stats,
            Err(e) => {
                if let Err(rollback_err) = store.rollback() {
                    warn!("Failed to roll back {}: {:#}", path.display(), rollback_err);
                }
                return Err(e.context(format!("Failed to process {}", path.display())));
            }
        };
        store
            .commit()
            .with_context(|| format!("Failed to commit {}", path.display()))?;

        summary.files_processed += 1;
        summary.stats += stats;
        info!("{}/{} files processed.", index + 1, total);
    }

    Ok(summary)
}

/// Load every song file, then every log file.
///
/// Songs go first because songplays look up songs and artists already loaded.
pub fn run_load(store: &dyn WarehouseStore, data: &DataSettings) -> Result<LoadSummary> {
    let song_files = process_data(store, &data.song_data, process_song_file)?;
    let log_files = process_data(store, &data.log_data, process_log_file)?;

    info!(
        "Loaded {} songs and {} artists from {} files",
        song_files.stats.songs, song_files.stats.artists, song_files.files_processed
    );
    info!(
        "Loaded {} songplays ({} matched, {} other events skipped) from {} files",
        log_files.stats.songplays,
        log_files.stats.matched,
        log_files.stats.ignored,
        log_files.files_processed
    );

    Ok(LoadSummary {
        song_files,
        log_files,
    })
}
