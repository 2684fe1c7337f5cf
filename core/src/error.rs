use crate::spots::{MAX_DISTANCE_METERS, MAX_SPOTS_PER_WINDOW, MIN_SPACING_METERS};

use ph_utils::FileIOError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Validation(#[from] ValidationError),
	#[error("you can only mark {} spots per hour, please wait", MAX_SPOTS_PER_WINDOW)]
	QuotaExceeded,
	#[error("current location is unknown")]
	NoCurrentLocation,
	#[error("remote store error: {0}")]
	Remote(#[from] ph_sync::Error),

	#[error(transparent)]
	FileIO(#[from] FileIOError),
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
	#[error("unknown config version: {0}")]
	ConfigVersion(u32),
	#[error("failed to set up logging: {0}")]
	Logger(String),
}

/// Placement rejections, raised locally before anything reaches the remote store.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ValidationError {
	#[error(transparent)]
	InvalidCoordinate(#[from] ph_geo::Error),
	#[error(
		"spot is {distance:.0}m away, it must be within {}m of your location",
		MAX_DISTANCE_METERS
	)]
	OutOfRange { distance: f64 },
	#[error(
		"spot is already marked, it must be at least {}m away from existing spots (nearest is {distance:.1}m)",
		MIN_SPACING_METERS
	)]
	TooClose { distance: f64 },
}
