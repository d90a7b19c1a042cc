use super::schema::WAREHOUSE_SCHEMA;
use super::store::SqliteWarehouseStore;
use crate::config::DbSettings;
use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::info;

const COMPANION_SUFFIXES: &[&str] = &["-wal", "-shm", "-journal"];

/// Drop the target database, recreate it empty and create every table.
///
/// Destroys all existing data in the target database.
pub fn reset_schema(db: &DbSettings) -> Result<SqliteWarehouseStore> {
    if !db.dir.is_dir() {
        bail!("Database directory is not reachable: {:?}", db.dir);
    }

    let db_path = db.database_path();
    drop_database(&db_path)?;

    let conn = Connection::open(&db_path)
        .with_context(|| format!("Failed to create database {:?}", db_path))?;
    conn.pragma_update(None, "encoding", "UTF-8")?;
    info!("Created database {:?} with UTF-8 encoding", db_path);

    WAREHOUSE_SCHEMA
        .drop_all(&conn)
        .context("Failed to drop warehouse tables")?;
    WAREHOUSE_SCHEMA
        .create(&conn)
        .context("Failed to create warehouse tables")?;
    for table in WAREHOUSE_SCHEMA.tables {
        info!("Created table {}", table.name);
    }

    SqliteWarehouseStore::from_connection(conn)
}

fn drop_database(db_path: &Path) -> Result<()> {
    let mut files = vec![db_path.to_path_buf()];
    files.extend(COMPANION_SUFFIXES.iter().map(|suffix| {
        let mut name = db_path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }));

    for file in files {
        if file.exists() {
            std::fs::remove_file(&file)
                .with_context(|| format!("Failed to drop database file {:?}", file))?;
            info!("Dropped {:?}", file);
        }
    }
    Ok(())
}
