//! On-disk fixtures for song and log data trees.

use super::constants::*;
use sparkify_etl::config::{DataSettings, DbSettings};
use sparkify_etl::{reset_schema, SqliteWarehouseStore};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One song metadata record, formatted like the published song dataset.
pub fn song_json(
    song_id: &str,
    title: &str,
    duration: f64,
    artist_id: &str,
    artist_name: &str,
) -> String {
    format!(
        r#"{{"num_songs": 1, "artist_id": "{artist_id}", "artist_latitude": null, "artist_longitude": null, "artist_location": "", "artist_name": "{artist_name}", "song_id": "{song_id}", "title": "{title}", "duration": {duration}, "year": 0}}"#
    )
}

/// One activity log line.
pub fn log_line(
    page: &str,
    ts: i64,
    user_id: &str,
    level: &str,
    song: &str,
    artist: &str,
    length: f64,
) -> String {
    format!(
        r#"{{"artist":"{artist}","auth":"Logged In","firstName":"Lily","gender":"F","itemInSession":0,"lastName":"Koch","length":{length},"level":"{level}","location":"Chicago-Naperville-Elgin, IL-IN-WI","method":"PUT","page":"{page}","registration":1541048010796.0,"sessionId":818,"song":"{song}","status":200,"ts":{ts},"userAgent":"Mozilla/5.0","userId":"{user_id}"}}"#
    )
}

pub struct TestWorkspace {
    pub temp_dir: TempDir,
}

impl TestWorkspace {
    /// Empty song and log trees and an empty database directory.
    pub fn new() -> Self {
        let workspace = Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        };
        fs::create_dir_all(workspace.song_root()).unwrap();
        fs::create_dir_all(workspace.log_root()).unwrap();
        fs::create_dir_all(workspace.db_dir()).unwrap();
        workspace
    }

    /// Two songs in a nested song tree and one day of logs.
    ///
    /// The log holds three `NextSong` events (two matching a song, one not)
    /// and one `Home` event.
    pub fn with_default_data() -> Self {
        let workspace = Self::new();
        workspace.write_song_file(
            "A/A/A/TRAAAAW128F429D538.json",
            &song_json(SONG_1_ID, SONG_1_TITLE, SONG_1_DURATION, ARTIST_1_ID, ARTIST_1_NAME),
        );
        workspace.write_song_file(
            "A/B/C/TRABCEI128F424C983.json",
            &song_json(SONG_2_ID, SONG_2_TITLE, SONG_2_DURATION, ARTIST_2_ID, ARTIST_2_NAME),
        );
        workspace.write_log_file(
            "2018/11/2018-11-05-events.json",
            &[
                log_line("Home", TS_MONDAY - 1000, USER_1_ID, "free", "", "", 0.0),
                log_line(
                    "NextSong",
                    TS_MONDAY,
                    USER_1_ID,
                    "free",
                    SONG_1_TITLE,
                    ARTIST_1_NAME,
                    SONG_1_DURATION,
                ),
                log_line(
                    "NextSong",
                    TS_MONDAY_LATER,
                    USER_2_ID,
                    "paid",
                    SONG_2_TITLE,
                    ARTIST_2_NAME,
                    SONG_2_DURATION,
                ),
                log_line(
                    "NextSong",
                    TS_TUESDAY,
                    USER_1_ID,
                    "paid",
                    "Unknown Song",
                    "Unknown Artist",
                    100.0,
                ),
            ],
        );
        workspace
    }

    pub fn song_root(&self) -> PathBuf {
        self.temp_dir.path().join("song_data")
    }

    pub fn log_root(&self) -> PathBuf {
        self.temp_dir.path().join("log_data")
    }

    pub fn db_dir(&self) -> PathBuf {
        self.temp_dir.path().join("db")
    }

    pub fn db_settings(&self) -> DbSettings {
        DbSettings {
            dir: self.db_dir(),
            name: DB_NAME.to_string(),
        }
    }

    pub fn data_settings(&self) -> DataSettings {
        DataSettings {
            song_data: self.song_root(),
            log_data: self.log_root(),
        }
    }

    pub fn write_song_file(&self, relative: &str, content: &str) -> PathBuf {
        write_file(&self.song_root(), relative, content)
    }

    pub fn write_log_file(&self, relative: &str, lines: &[String]) -> PathBuf {
        write_file(&self.log_root(), relative, &lines.join("\n"))
    }

    /// Drop and recreate the warehouse, returning a store on it.
    pub fn reset(&self) -> SqliteWarehouseStore {
        reset_schema(&self.db_settings()).expect("Failed to reset warehouse")
    }
}

fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}
