pub mod config; // Configuration formats and the events configuration
pub mod error;

/// Re-export key types
pub use config::{ConfigFormat, EventsConfig, load_events_config};
pub use error::StorageSystemError;

// Test module declaration
#[cfg(test)]
mod tests;
