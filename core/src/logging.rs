use crate::{config::AppConfig, error::Error, error::Result};

use ph_utils::FileIOError;

use std::fs;

use tracing::info;
use tracing_appender::{
	non_blocking::WorkerGuard,
	rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
	filter::{Directive, LevelFilter},
	fmt::{self, Layer},
	prelude::*,
	EnvFilter,
};

#[cfg(debug_assertions)]
const CONSOLE_LOG_FILTER: LevelFilter = LevelFilter::DEBUG;

#[cfg(not(debug_assertions))]
const CONSOLE_LOG_FILTER: LevelFilter = LevelFilter::INFO;

const CRATE_DIRECTIVES: [&str; 4] = [
	"ph_core=debug",
	"ph_sync=debug",
	"ph_images=debug",
	"ph_utils=debug",
];

fn directive(raw: &str) -> Result<Directive> {
	raw.parse()
		.map_err(|e| Error::Logger(format!("invalid tracing directive '{raw}': {e}")))
}

/// Installs the global subscriber: console output, plus a daily rolling file under
/// `<data_dir>/logs` when file logging is on.
///
/// Keep the returned guard alive for as long as logs should be flushed to the file. Fails if a
/// global subscriber is already installed.
pub fn init_logger(config: &AppConfig) -> Result<Option<WorkerGuard>> {
	let mut filter = EnvFilter::from_default_env().add_directive(directive(&config.log_level)?);
	for raw in CRATE_DIRECTIVES {
		filter = filter.add_directive(directive(raw)?);
	}

	let (file_layer, guard) = if config.file_logging {
		let logs_dir = config.logs_dir();
		fs::create_dir_all(&logs_dir)
			.map_err(|e| FileIOError::from((&logs_dir, e, "Failed to create logs directory")))?;

		let appender = RollingFileAppender::builder()
			.rotation(Rotation::DAILY)
			.filename_prefix("parkhere")
			.filename_suffix("log")
			.build(&logs_dir)
			.map_err(|e| Error::Logger(e.to_string()))?;

		let (non_blocking, guard) = tracing_appender::non_blocking(appender);

		(
			Some(
				Layer::default()
					.with_writer(non_blocking)
					.with_ansi(false)
					.with_filter(LevelFilter::DEBUG),
			),
			Some(guard),
		)
	} else {
		(None, None)
	};

	tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer().with_filter(CONSOLE_LOG_FILTER))
		.with(file_layer)
		.try_init()
		.map_err(|e| Error::Logger(e.to_string()))?;

	info!(
		log_level = %config.log_level,
		file_logging = config.file_logging,
		"Logger initialized"
	);

	Ok(guard)
}
