//! SQLite-backed warehouse store.

use super::models::*;
use super::schema::WAREHOUSE_SCHEMA;
use super::trait_def::WarehouseStore;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;
use tracing::info;

/// Row counts of every warehouse table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarehouseCounts {
    pub songs: usize,
    pub artists: usize,
    pub users: usize,
    pub time: usize,
    pub songplays: usize,
}

#[derive(Debug)]
pub struct SqliteWarehouseStore {
    conn: Connection,
}

impl SqliteWarehouseStore {
    /// Open an existing warehouse database and check its schema.
    ///
    /// The database is never created here; `reset_schema` owns that.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| {
            format!(
                "Failed to open warehouse database {:?}, run create-tables first",
                db_path
            )
        })?;

        let store = Self::from_connection(conn)?;
        WAREHOUSE_SCHEMA
            .validate(&store.conn)
            .with_context(|| format!("Warehouse schema check failed for {:?}", db_path))?;

        let counts = store.get_counts()?;
        info!(
            "Opened warehouse {:?}: {} songs, {} artists, {} users, {} time rows, {} songplays",
            db_path, counts.songs, counts.artists, counts.users, counts.time, counts.songplays
        );
        Ok(store)
    }

    /// In-memory warehouse with a freshly created schema.
    pub fn open_in_memory() -> Result<Self> {
        let store = Self::from_connection(Connection::open_in_memory()?)?;
        WAREHOUSE_SCHEMA.create(&store.conn)?;
        Ok(store)
    }

    pub(super) fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    pub fn get_counts(&self) -> Result<WarehouseCounts> {
        let count = |table: &str| -> Result<usize> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
            Ok(n as usize)
        };
        Ok(WarehouseCounts {
            songs: count("songs")?,
            artists: count("artists")?,
            users: count("users")?,
            time: count("time")?,
            songplays: count("songplays")?,
        })
    }

    pub fn get_song(&self, song_id: &str) -> Result<Option<Song>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT song_id, title, artist_id, year, duration FROM songs WHERE song_id = ?1",
        )?;
        let song = stmt
            .query_row(params![song_id], |row| {
                Ok(Song {
                    song_id: row.get(0)?,
                    title: row.get(1)?,
                    artist_id: row.get(2)?,
                    year: row.get(3)?,
                    duration: row.get(4)?,
                })
            })
            .optional()?;
        Ok(song)
    }

    pub fn get_artist(&self, artist_id: &str) -> Result<Option<Artist>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT artist_id, name, latitude, longitude FROM artists WHERE artist_id = ?1",
        )?;
        let artist = stmt
            .query_row(params![artist_id], |row| {
                Ok(Artist {
                    artist_id: row.get(0)?,
                    name: row.get(1)?,
                    latitude: row.get(2)?,
                    longitude: row.get(3)?,
                })
            })
            .optional()?;
        Ok(artist)
    }

    pub fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT user_id, first_name, last_name, gender, level FROM users WHERE user_id = ?1",
        )?;
        let row = stmt
            .query_row(params![user_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .optional()?;

        match row {
            None => Ok(None),
            Some((user_id, first_name, last_name, gender, level)) => {
                let level = SubscriptionLevel::from_db_str(&level)
                    .with_context(|| format!("Unknown level '{}' for user {}", level, user_id))?;
                Ok(Some(User {
                    user_id,
                    first_name,
                    last_name,
                    gender,
                    level,
                }))
            }
        }
    }

    pub fn get_time(&self, start_time: i64) -> Result<Option<TimeDimension>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT start_time, hour, day, week, month, year, weekday FROM time WHERE start_time = ?1",
        )?;
        let time = stmt
            .query_row(params![start_time], |row| {
                Ok(TimeDimension {
                    start_time: row.get(0)?,
                    hour: row.get(1)?,
                    day: row.get(2)?,
                    week: row.get(3)?,
                    month: row.get(4)?,
                    year: row.get(5)?,
                    weekday: row.get(6)?,
                })
            })
            .optional()?;
        Ok(time)
    }

    /// All songplays ordered by insertion.
    pub fn get_songplays(&self) -> Result<Vec<Songplay>> {
        let mut stmt = self.conn.prepare(
            "SELECT start_time, user_id, level, song_id, artist_id, session_id, location, user_agent
             FROM songplays ORDER BY songplay_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(
                |(start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)| {
                    let level = SubscriptionLevel::from_db_str(&level)
                        .with_context(|| format!("Unknown level '{}' in songplays", level))?;
                    Ok(Songplay {
                        start_time,
                        user_id,
                        level,
                        song_id,
                        artist_id,
                        session_id,
                        location,
                        user_agent,
                    })
                },
            )
            .collect()
    }
}

impl WarehouseStore for SqliteWarehouseStore {
    fn begin(&self) -> Result<()> {
        self.conn.execute("BEGIN IMMEDIATE", [])?;
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        self.conn.execute("ROLLBACK", [])?;
        Ok(())
    }

    fn upsert_song(&self, song: &Song) -> Result<()> {
        self.conn
            .prepare_cached(
                "INSERT INTO songs (song_id, title, artist_id, year, duration)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(song_id) DO UPDATE SET
                    title = excluded.title,
                    artist_id = excluded.artist_id,
                    year = excluded.year,
                    duration = excluded.duration",
            )?
            .execute(params![
                &song.song_id,
                &song.title,
                &song.artist_id,
                song.year,
                song.duration
            ])?;
        Ok(())
    }

    fn upsert_artist(&self, artist: &Artist) -> Result<()> {
        self.conn
            .prepare_cached(
                "INSERT INTO artists (artist_id, name, latitude, longitude)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(artist_id) DO UPDATE SET
                    name = excluded.name,
                    latitude = excluded.latitude,
                    longitude = excluded.longitude",
            )?
            .execute(params![
                &artist.artist_id,
                &artist.name,
                artist.latitude,
                artist.longitude
            ])?;
        Ok(())
    }

    fn upsert_time(&self, time: &TimeDimension) -> Result<()> {
        self.conn
            .prepare_cached(
                "INSERT INTO time (start_time, hour, day, week, month, year, weekday)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(start_time) DO NOTHING",
            )?
            .execute(params![
                time.start_time,
                time.hour,
                time.day,
                time.week,
                time.month,
                time.year,
                time.weekday
            ])?;
        Ok(())
    }

    fn upsert_user(&self, user: &User) -> Result<()> {
        self.conn
            .prepare_cached(
                "INSERT INTO users (user_id, first_name, last_name, gender, level)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(user_id) DO UPDATE SET level = excluded.level",
            )?
            .execute(params![
                &user.user_id,
                &user.first_name,
                &user.last_name,
                &user.gender,
                user.level.as_db_str()
            ])?;
        Ok(())
    }

    fn insert_songplay(&self, songplay: &Songplay) -> Result<i64> {
        self.conn
            .prepare_cached(
                "INSERT INTO songplays
                    (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?
            .execute(params![
                songplay.start_time,
                &songplay.user_id,
                songplay.level.as_db_str(),
                &songplay.song_id,
                &songplay.artist_id,
                songplay.session_id,
                &songplay.location,
                &songplay.user_agent
            ])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn lookup_song_artist(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<SongArtistMatch>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT s.song_id, a.artist_id
             FROM songs s
             JOIN artists a ON s.artist_id = a.artist_id
             WHERE s.title = ?1 AND a.name = ?2 AND s.duration = ?3
             ORDER BY s.song_id
             LIMIT 1",
        )?;
        let found = stmt
            .query_row(params![title, artist_name, duration], |row| {
                Ok(SongArtistMatch {
                    song_id: row.get(0)?,
                    artist_id: row.get(1)?,
                })
            })
            .optional()?;
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setanta() -> (Song, Artist) {
        (
            Song {
                song_id: "SOZCTXZ12AB0182364".to_string(),
                title: "Setanta matins".to_string(),
                artist_id: "AR5KOSW1187FB35FF4".to_string(),
                year: 0,
                duration: 269.58322,
            },
            Artist {
                artist_id: "AR5KOSW1187FB35FF4".to_string(),
                name: "Elena".to_string(),
                latitude: Some(49.80388),
                longitude: Some(15.47491),
            },
        )
    }

    fn user(level: SubscriptionLevel) -> User {
        User {
            user_id: "26".to_string(),
            first_name: "Ryan".to_string(),
            last_name: "Smith".to_string(),
            gender: "M".to_string(),
            level,
        }
    }

    #[test]
    fn upserts_song_and_artist_last_write_wins() {
        let store = SqliteWarehouseStore::open_in_memory().unwrap();
        let (mut song, mut artist) = setanta();
        store.upsert_song(&song).unwrap();
        store.upsert_artist(&artist).unwrap();

        song.year = 2004;
        artist.latitude = None;
        store.upsert_song(&song).unwrap();
        store.upsert_artist(&artist).unwrap();

        assert_eq!(store.get_song(&song.song_id).unwrap(), Some(song));
        assert_eq!(store.get_artist(&artist.artist_id).unwrap(), Some(artist));
        let counts = store.get_counts().unwrap();
        assert_eq!(counts.songs, 1);
        assert_eq!(counts.artists, 1);
    }

    #[test]
    fn user_upsert_overwrites_level_only() {
        let store = SqliteWarehouseStore::open_in_memory().unwrap();
        store.upsert_user(&user(SubscriptionLevel::Free)).unwrap();

        let mut renamed = user(SubscriptionLevel::Paid);
        renamed.first_name = "Other".to_string();
        store.upsert_user(&renamed).unwrap();

        let stored = store.get_user("26").unwrap().unwrap();
        assert_eq!(stored.level, SubscriptionLevel::Paid);
        assert_eq!(stored.first_name, "Ryan");
        assert_eq!(store.get_counts().unwrap().users, 1);
    }

    #[test]
    fn time_upsert_keeps_single_row() {
        let store = SqliteWarehouseStore::open_in_memory().unwrap();
        let time = TimeDimension::from_epoch_millis(1_541_440_000_000).unwrap();
        store.upsert_time(&time).unwrap();
        store.upsert_time(&time).unwrap();

        assert_eq!(store.get_counts().unwrap().time, 1);
        assert_eq!(store.get_time(time.start_time).unwrap(), Some(time));
    }

    #[test]
    fn lookup_requires_exact_title_artist_and_duration() {
        let store = SqliteWarehouseStore::open_in_memory().unwrap();
        let (song, artist) = setanta();
        store.upsert_song(&song).unwrap();
        store.upsert_artist(&artist).unwrap();

        let found = store
            .lookup_song_artist("Setanta matins", "Elena", 269.58322)
            .unwrap();
        assert_eq!(
            found,
            Some(SongArtistMatch {
                song_id: song.song_id.clone(),
                artist_id: artist.artist_id.clone(),
            })
        );

        assert!(store
            .lookup_song_artist("Setanta matins", "Elena", 269.6)
            .unwrap()
            .is_none());
        assert!(store
            .lookup_song_artist("Setanta matins", "elena", 269.58322)
            .unwrap()
            .is_none());
        assert!(store
            .lookup_song_artist("Setanta Matins", "Elena", 269.58322)
            .unwrap()
            .is_none());
    }

    #[test]
    fn songplay_with_and_without_match() {
        let store = SqliteWarehouseStore::open_in_memory().unwrap();
        let (song, artist) = setanta();
        store.upsert_song(&song).unwrap();
        store.upsert_artist(&artist).unwrap();
        store.upsert_user(&user(SubscriptionLevel::Free)).unwrap();
        store
            .upsert_time(&TimeDimension::from_epoch_millis(1_541_440_000_000).unwrap())
            .unwrap();

        let mut songplay = Songplay {
            start_time: 1_541_440_000_000,
            user_id: "26".to_string(),
            level: SubscriptionLevel::Free,
            song_id: Some(song.song_id.clone()),
            artist_id: Some(artist.artist_id.clone()),
            session_id: 583,
            location: "San Jose-Sunnyvale-Santa Clara, CA".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
        };
        let first_id = store.insert_songplay(&songplay).unwrap();

        songplay.song_id = None;
        songplay.artist_id = None;
        let second_id = store.insert_songplay(&songplay).unwrap();
        assert!(second_id > first_id);

        let stored = store.get_songplays().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].song_id.as_deref(), Some("SOZCTXZ12AB0182364"));
        assert_eq!(stored[1], songplay);
    }

    #[test]
    fn rollback_discards_uncommitted_writes() {
        let store = SqliteWarehouseStore::open_in_memory().unwrap();
        let (song, artist) = setanta();

        store.begin().unwrap();
        store.upsert_song(&song).unwrap();
        store.commit().unwrap();

        store.begin().unwrap();
        store.upsert_artist(&artist).unwrap();
        store.rollback().unwrap();

        let counts = store.get_counts().unwrap();
        assert_eq!(counts.songs, 1);
        assert_eq!(counts.artists, 0);
    }
}
