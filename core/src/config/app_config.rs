use super::Migrate;

use crate::error::{Error, Result};

use ph_images::DEFAULT_DETECTOR_TIMEOUT;
use ph_utils::FileIOError;

use std::{
	fs,
	path::{Path, PathBuf},
	time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "parkhere.json";

/// Node configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
	/// Config schema version
	pub version: u32,

	/// Where config, device identity and logs live
	pub data_dir: PathBuf,

	/// Base log level directive, like "info" or "debug"
	pub log_level: String,

	/// Whether logs also go to a daily rolling file under `logs/`
	#[serde(default = "default_true")]
	pub file_logging: bool,

	#[serde(default)]
	pub redaction: RedactionConfig,

	/// Whether the node sweeps expired spots once on start
	#[serde(default = "default_true")]
	pub sweep_on_start: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionConfig {
	/// Run text detection on attached photos
	pub enabled: bool,

	pub detector_timeout_secs: u64,
}

impl Default for RedactionConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			detector_timeout_secs: DEFAULT_DETECTOR_TIMEOUT.as_secs(),
		}
	}
}

impl RedactionConfig {
	#[must_use]
	pub const fn detector_timeout(&self) -> Duration {
		Duration::from_secs(self.detector_timeout_secs)
	}
}

const fn default_true() -> bool {
	true
}

impl AppConfig {
	/// Loads `parkhere.json` from `data_dir`, migrating it if it's old, or writes the defaults
	/// there when there's no config yet.
	pub fn load_from(data_dir: impl AsRef<Path>) -> Result<Self> {
		let data_dir = data_dir.as_ref();
		let config_path = data_dir.join(CONFIG_FILE_NAME);

		if !config_path.exists() {
			warn!(?config_path, "No config found, creating default");
			let config = Self::default_with_dir(data_dir);
			config.save()?;
			return Ok(config);
		}

		info!(?config_path, "Loading config");
		let json = fs::read_to_string(&config_path)
			.map_err(|e| FileIOError::from((&config_path, e, "Failed to read config")))?;
		let mut config = serde_json::from_str::<Self>(&json)?;

		// The file may have been moved along with its directory
		config.data_dir = data_dir.to_path_buf();

		if config.version > Self::target_version() {
			return Err(Error::ConfigVersion(config.version));
		}

		if config.needs_migration() {
			info!(
				from = config.version,
				to = Self::target_version(),
				"Migrating config"
			);
			config.migrate()?;
			config.save()?;
		}

		Ok(config)
	}

	#[must_use]
	pub fn default_with_dir(data_dir: impl Into<PathBuf>) -> Self {
		Self {
			version: Self::target_version(),
			data_dir: data_dir.into(),
			log_level: "info".to_string(),
			file_logging: true,
			redaction: RedactionConfig::default(),
			sweep_on_start: true,
		}
	}

	pub fn save(&self) -> Result<()> {
		fs::create_dir_all(&self.data_dir).map_err(|e| {
			FileIOError::from((&self.data_dir, e, "Failed to create data directory"))
		})?;

		let config_path = self.data_dir.join(CONFIG_FILE_NAME);
		fs::write(&config_path, serde_json::to_vec_pretty(self)?)
			.map_err(|e| FileIOError::from((&config_path, e, "Failed to write config")))?;

		info!(?config_path, "Saved config");

		Ok(())
	}

	#[must_use]
	pub fn logs_dir(&self) -> PathBuf {
		self.data_dir.join("logs")
	}
}

impl Migrate for AppConfig {
	fn current_version(&self) -> u32 {
		self.version
	}

	fn target_version() -> u32 {
		2
	}

	fn migrate(&mut self) -> Result<()> {
		loop {
			match self.version {
				0 => {
					// v1 added file logging, its serde default already filled it in
					self.version = 1;
				}
				1 => {
					// v2 added photo redaction settings and the startup sweep toggle
					self.redaction = RedactionConfig::default();
					self.sweep_on_start = true;
					self.version = 2;
				}
				2 => return Ok(()),
				v => return Err(Error::ConfigVersion(v)),
			}
		}
	}
}
