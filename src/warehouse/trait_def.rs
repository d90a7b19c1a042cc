//! WarehouseStore trait definition.
//!
//! The loaders only talk to this trait, so the ETL logic does not depend on
//! the storage engine behind it.

use super::models::{Artist, Song, SongArtistMatch, Songplay, TimeDimension, User};
use anyhow::Result;

/// Storage port for the songplay star schema.
pub trait WarehouseStore {
    // =========================================================================
    // Commit Boundaries
    // =========================================================================

    /// Open a unit of work. Writes issued until `commit` or `rollback` belong to it.
    fn begin(&self) -> Result<()>;

    fn commit(&self) -> Result<()>;

    fn rollback(&self) -> Result<()>;

    // =========================================================================
    // Dimension Writes
    // =========================================================================

    /// Insert a song, overwriting every attribute if the id already exists.
    fn upsert_song(&self, song: &Song) -> Result<()>;

    /// Insert an artist, overwriting every attribute if the id already exists.
    fn upsert_artist(&self, artist: &Artist) -> Result<()>;

    /// Insert a time row. Existing timestamps are left untouched.
    fn upsert_time(&self, time: &TimeDimension) -> Result<()>;

    /// Insert a user. On conflict only the subscription level is overwritten.
    fn upsert_user(&self, user: &User) -> Result<()>;

    // =========================================================================
    // Fact Writes and Lookups
    // =========================================================================

    /// Insert a songplay and return its generated id.
    fn insert_songplay(&self, songplay: &Songplay) -> Result<i64>;

    /// Find the song and artist matching title, artist name and duration exactly.
    fn lookup_song_artist(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<SongArtistMatch>>;
}
