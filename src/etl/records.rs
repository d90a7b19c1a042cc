//! Input record parsing for song metadata and activity log files.

use crate::warehouse::{Artist, Song, SubscriptionLevel};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Page value marking a song playback event.
pub const NEXT_SONG_PAGE: &str = "NextSong";

/// Errors raised while reading input records.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record at {path:?} line {line}: {source}")]
    Malformed {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing field '{field}' at {path:?} line {line}")]
    MissingField {
        path: PathBuf,
        line: usize,
        field: &'static str,
    },

    #[error("Timestamp {ts} out of range at {path:?} line {line}")]
    InvalidTimestamp { path: PathBuf, line: usize, ts: i64 },
}

/// A song metadata record. One of these describes one song and its artist.
#[derive(Debug, Clone, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
    pub artist_name: String,
    #[serde(default)]
    pub artist_latitude: Option<f64>,
    #[serde(default)]
    pub artist_longitude: Option<f64>,
}

impl SongRecord {
    pub fn song(&self) -> Song {
        Song {
            song_id: self.song_id.clone(),
            title: self.title.clone(),
            artist_id: self.artist_id.clone(),
            year: self.year,
            duration: self.duration,
        }
    }

    pub fn artist(&self) -> Artist {
        Artist {
            artist_id: self.artist_id.clone(),
            name: self.artist_name.clone(),
            latitude: self.artist_latitude,
            longitude: self.artist_longitude,
        }
    }
}

/// A raw activity log event. Only `page` is always present; which other
/// fields are set depends on the event type.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub page: String,
    #[serde(default)]
    pub ts: Option<i64>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub level: Option<SubscriptionLevel>,
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub session_id: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl LogEvent {
    /// Type a raw event. Only kept events go through this, so field values
    /// of skipped events are never checked.
    pub fn from_raw(raw: Value, path: &Path, line: usize) -> Result<Self, RecordError> {
        serde_json::from_value(raw).map_err(|source| RecordError::Malformed {
            path: path.to_path_buf(),
            line,
            source,
        })
    }
}

/// Whether a raw log event is a song playback.
pub fn is_song_play(raw: &Value) -> bool {
    raw.get("page").and_then(Value::as_str) == Some(NEXT_SONG_PAGE)
}

/// A `NextSong` event with every field needed to build its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SongPlayEvent {
    pub ts: i64,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub level: SubscriptionLevel,
    pub song: String,
    pub artist: String,
    pub length: f64,
    pub session_id: i64,
    pub location: String,
    pub user_agent: String,
}

impl SongPlayEvent {
    pub fn from_log_event(event: LogEvent, path: &Path, line: usize) -> Result<Self, RecordError> {
        let missing = |field: &'static str| RecordError::MissingField {
            path: path.to_path_buf(),
            line,
            field,
        };
        Ok(Self {
            ts: event.ts.ok_or_else(|| missing("ts"))?,
            user_id: event.user_id.ok_or_else(|| missing("userId"))?,
            first_name: event.first_name.ok_or_else(|| missing("firstName"))?,
            last_name: event.last_name.ok_or_else(|| missing("lastName"))?,
            gender: event.gender.ok_or_else(|| missing("gender"))?,
            level: event.level.ok_or_else(|| missing("level"))?,
            song: event.song.ok_or_else(|| missing("song"))?,
            artist: event.artist.ok_or_else(|| missing("artist"))?,
            length: event.length.ok_or_else(|| missing("length"))?,
            session_id: event.session_id.ok_or_else(|| missing("sessionId"))?,
            location: event.location.ok_or_else(|| missing("location"))?,
            user_agent: event.user_agent.ok_or_else(|| missing("userAgent"))?,
        })
    }
}

/// Parse every non-empty line of `path` as a JSON record of type `T`.
///
/// Returned line numbers are 1-based.
pub fn read_json_lines<T>(path: &Path) -> Result<Vec<(usize, T)>, RecordError>
where
    T: for<'de> Deserialize<'de>,
{
    let content = std::fs::read_to_string(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .map(|record| (index + 1, record))
                .map_err(|source| RecordError::Malformed {
                    path: path.to_path_buf(),
                    line: index + 1,
                    source,
                })
        })
        .collect()
}

/// Parse every JSON value in `path`, whatever the layout: one object spread
/// over many lines, or several objects back to back.
pub fn read_json_values<T>(path: &Path) -> Result<Vec<T>, RecordError>
where
    T: for<'de> Deserialize<'de>,
{
    let content = std::fs::read_to_string(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::Deserializer::from_str(&content)
        .into_iter::<T>()
        .map(|record| {
            record.map_err(|source| RecordError::Malformed {
                path: path.to_path_buf(),
                line: source.line(),
                source,
            })
        })
        .collect()
}

/// Log files carry `userId` either as a string or as a number, and use an
/// empty string for logged-out events.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}
