//! Row types for the songplay star schema.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Subscription level of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionLevel {
    Free,
    Paid,
}

impl SubscriptionLevel {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            SubscriptionLevel::Free => "free",
            SubscriptionLevel::Paid => "paid",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "free" => Some(SubscriptionLevel::Free),
            "paid" => Some(SubscriptionLevel::Paid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    /// Duration in seconds.
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    pub artist_id: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub level: SubscriptionLevel,
}

/// Calendar breakdown of a play timestamp, keyed by the timestamp itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeDimension {
    /// Epoch milliseconds, UTC.
    pub start_time: i64,
    pub hour: u32,
    pub day: u32,
    /// ISO 8601 week number.
    pub week: u32,
    pub month: u32,
    pub year: i32,
    /// Monday = 0 .. Sunday = 6.
    pub weekday: u32,
}

impl TimeDimension {
    /// `None` when the timestamp is outside chrono's representable range.
    pub fn from_epoch_millis(start_time: i64) -> Option<Self> {
        let dt = DateTime::<Utc>::from_timestamp_millis(start_time)?;
        Some(Self {
            start_time,
            hour: dt.hour(),
            day: dt.day(),
            week: dt.iso_week().week(),
            month: dt.month(),
            year: dt.year(),
            weekday: dt.weekday().num_days_from_monday(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Songplay {
    pub start_time: i64,
    pub user_id: String,
    pub level: SubscriptionLevel,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: i64,
    pub location: String,
    pub user_agent: String,
}

/// Identifiers resolved by the song/artist lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongArtistMatch {
    pub song_id: String,
    pub artist_id: String,
}
