mod discovery;
mod log_loader;
mod pipeline;
pub mod records;
mod song_loader;

pub use discovery::discover;
pub use log_loader::process_log_file;
pub use pipeline::{
    process_data, run_load, FileHandler, LoadStats, LoadSummary, ProcessSummary,
};
pub use song_loader::process_song_file;
