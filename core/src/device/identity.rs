use crate::error::Result;

use ph_utils::FileIOError;

use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

pub const DEVICE_FILE_NAME: &str = "device.json";

/// Device identity stored on disk
///
/// Not a secret and not authenticated, anybody can claim any id. It only has to stay the same
/// across restarts so the quota follows the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
	pub id: Uuid,

	/// When this device was first initialized
	pub created_at: DateTime<Utc>,

	/// Crate version that created this identity
	pub version: String,
}

impl DeviceIdentity {
	#[must_use]
	pub fn new() -> Self {
		Self {
			id: Uuid::new_v4(),
			created_at: Utc::now(),
			version: env!("CARGO_PKG_VERSION").to_string(),
		}
	}

	/// Reads the identity from `data_dir`, creating a fresh one if there is none or the stored one
	/// can't be read.
	pub fn load_or_create(data_dir: impl AsRef<Path>) -> Result<Self> {
		let data_dir = data_dir.as_ref();
		let path = data_dir.join(DEVICE_FILE_NAME);

		match fs::read(&path) {
			Ok(bytes) => match serde_json::from_slice::<Self>(&bytes) {
				Ok(identity) => return Ok(identity),
				Err(e) => warn!(?path, %e, "Device identity is corrupt, generating a new one"),
			},
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				info!(?path, "No device identity yet, generating one");
			}
			Err(e) => warn!(?path, %e, "Failed to read device identity, generating a new one"),
		}

		let identity = Self::new();
		identity.save_to(data_dir)?;

		Ok(identity)
	}

	pub fn save_to(&self, data_dir: impl AsRef<Path>) -> Result<()> {
		let data_dir = data_dir.as_ref();
		fs::create_dir_all(data_dir)
			.map_err(|e| FileIOError::from((data_dir, e, "Failed to create data directory")))?;

		let path = data_dir.join(DEVICE_FILE_NAME);
		fs::write(&path, serde_json::to_vec_pretty(self)?)
			.map_err(|e| FileIOError::from((&path, e, "Failed to write device identity")))?;

		Ok(())
	}

	/// The id as it is written into every spot this device proposes.
	#[must_use]
	pub fn owner_id(&self) -> String {
		self.id.to_string()
	}
}

impl Default for DeviceIdentity {
	fn default() -> Self {
		Self::new()
	}
}
