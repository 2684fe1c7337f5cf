//! The logger is process global, so it gets a test binary of its own.

use ph_core::{config::AppConfig, logging::init_logger, Error};

use std::fs;

use tempfile::TempDir;
use tracing::info;

#[test]
fn logs_to_a_daily_file_once() {
	let dir = TempDir::new().unwrap();
	let mut config = AppConfig::default_with_dir(dir.path());
	config.log_level = "debug".to_string();

	let guard = init_logger(&config).unwrap();
	assert!(guard.is_some());

	info!("parking spot logged");
	drop(guard);

	let files = fs::read_dir(config.logs_dir())
		.unwrap()
		.map(|entry| entry.unwrap().path())
		.collect::<Vec<_>>();
	assert_eq!(files.len(), 1);

	let file_name = files[0].file_name().unwrap().to_string_lossy().into_owned();
	assert!(file_name.starts_with("parkhere."), "{file_name}");
	assert!(file_name.ends_with(".log"), "{file_name}");

	// Installing a second global subscriber is refused
	assert!(matches!(init_logger(&config), Err(Error::Logger(_))));
}
