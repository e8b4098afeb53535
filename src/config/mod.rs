pub mod types;

pub use types::{CleanupConfig, DEFAULT_QUARANTINE_FOLDER, HandlingMode};
