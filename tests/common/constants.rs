//! Shared constants for end-to-end tests

// ============================================================================
// Songs and artists
// ============================================================================

pub const SONG_1_ID: &str = "SOZCTXZ12AB0182364";
pub const SONG_1_TITLE: &str = "Setanta matins";
pub const SONG_1_DURATION: f64 = 269.58;

pub const SONG_2_ID: &str = "SOMZWCG12A8C13C480";
pub const SONG_2_TITLE: &str = "I Didn't Mean To";
pub const SONG_2_DURATION: f64 = 218.93179;

pub const ARTIST_1_ID: &str = "AR5KOSW1187FB35FF4";
pub const ARTIST_1_NAME: &str = "Elena";

pub const ARTIST_2_ID: &str = "ARD7TVE1187B99BFB1";
pub const ARTIST_2_NAME: &str = "Casual";

// ============================================================================
// Users and events
// ============================================================================

pub const USER_1_ID: &str = "15";
pub const USER_2_ID: &str = "26";

/// 2018-11-05 17:46:40 UTC, a Monday in ISO week 45.
pub const TS_MONDAY: i64 = 1_541_440_000_000;
pub const TS_MONDAY_LATER: i64 = 1_541_440_300_000;
pub const TS_TUESDAY: i64 = 1_541_526_400_000;

pub const DB_NAME: &str = "sparkifydb";
