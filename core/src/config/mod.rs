//! Node configuration, persisted as JSON in the data directory.

mod app_config;
mod migration;

pub use app_config::{AppConfig, RedactionConfig, CONFIG_FILE_NAME};
pub use migration::Migrate;
