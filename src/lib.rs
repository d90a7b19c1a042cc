//! Sparkify ETL Library
//!
//! Loads song metadata and user activity logs into a SQLite star schema.
//! The two binaries (`create-tables` and `etl`) are thin wrappers around
//! the modules exposed here.

pub mod config;
pub mod etl;
pub mod sqlite_persistence;
pub mod warehouse;

// Re-export commonly used types for convenience
pub use config::{AppConfig, CliConfig, FileConfig};
pub use etl::{process_data, process_log_file, process_song_file, run_load};
pub use warehouse::{reset_schema, SqliteWarehouseStore, WarehouseStore};
