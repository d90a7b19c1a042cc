use super::pipeline::LoadStats;
use super::records::{read_json_values, SongRecord};
use crate::warehouse::WarehouseStore;
use anyhow::Result;
use std::path::Path;

/// Load one song metadata file: a song row then an artist row per record.
///
/// A file normally holds one object, possibly pretty-printed.
pub fn process_song_file(store: &dyn WarehouseStore, path: &Path) -> Result<LoadStats> {
    let records: Vec<SongRecord> = read_json_values(path)?;

    let mut stats = LoadStats::default();
    for record in records {
        store.upsert_song(&record.song())?;
        store.upsert_artist(&record.artist())?;
        stats.records += 1;
        stats.songs += 1;
        stats.artists += 1;
    }
    Ok(stats)
}
