use super::pipeline::LoadStats;
use super::records::{is_song_play, read_json_lines, LogEvent, RecordError, SongPlayEvent};
use crate::warehouse::{Songplay, TimeDimension, User, WarehouseStore};
use anyhow::Result;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Load one activity log file.
///
/// Every `NextSong` event yields a time row, a user upsert and a songplay.
/// All other events are skipped before any of their fields are read.
pub fn process_log_file(store: &dyn WarehouseStore, path: &Path) -> Result<LoadStats> {
    let events: Vec<(usize, Value)> = read_json_lines(path)?;

    let mut stats = LoadStats::default();
    for (line, raw) in events {
        stats.records += 1;
        if !is_song_play(&raw) {
            stats.ignored += 1;
            continue;
        }

        let event = LogEvent::from_raw(raw, path, line)?;
        let play = SongPlayEvent::from_log_event(event, path, line)?;
        let time = TimeDimension::from_epoch_millis(play.ts).ok_or_else(|| {
            RecordError::InvalidTimestamp {
                path: path.to_path_buf(),
                line,
                ts: play.ts,
            }
        })?;

        if load_song_play(store, &play, &time)? {
            stats.matched += 1;
        }
        stats.songplays += 1;
    }
    Ok(stats)
}

/// Returns whether the play was matched to a known song and artist.
fn load_song_play(
    store: &dyn WarehouseStore,
    play: &SongPlayEvent,
    time: &TimeDimension,
) -> Result<bool> {
    store.upsert_time(time)?;

    store.upsert_user(&User {
        user_id: play.user_id.clone(),
        first_name: play.first_name.clone(),
        last_name: play.last_name.clone(),
        gender: play.gender.clone(),
        level: play.level,
    })?;

    let found = store.lookup_song_artist(&play.song, &play.artist, play.length)?;
    if found.is_none() {
        debug!(
            "No song match for '{}' by '{}' ({}s)",
            play.song, play.artist, play.length
        );
    }
    let matched = found.is_some();
    let (song_id, artist_id) = match found {
        Some(m) => (Some(m.song_id), Some(m.artist_id)),
        None => (None, None),
    };

    store.insert_songplay(&Songplay {
        start_time: play.ts,
        user_id: play.user_id.clone(),
        level: play.level,
        song_id,
        artist_id,
        session_id: play.session_id,
        location: play.location.clone(),
        user_agent: play.user_agent.clone(),
    })?;
    Ok(matched)
}
