//! Common test infrastructure
//!
//! Builds song and log data trees on disk plus a warehouse database
//! directory, all under one `TempDir`.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestWorkspace, SONG_1_ID};
//!
//! #[test]
//! fn test_load() {
//!     let workspace = TestWorkspace::with_default_data();
//!     let store = workspace.reset();
//!     sparkify_etl::run_load(&store, &workspace.data_settings()).unwrap();
//!     assert!(store.get_song(SONG_1_ID).unwrap().is_some());
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::{log_line, song_json, TestWorkspace};
