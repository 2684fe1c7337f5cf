use ph_geo::Coordinate;

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

/// Source of the device's current position. Best effort, `None` when no fix is available.
#[async_trait]
pub trait LocationProvider: Send + Sync {
	async fn current_location(&self) -> Option<Coordinate>;
}

/// A location that only changes when set, for hosts that push fixes in and for tests.
#[derive(Debug, Default)]
pub struct ManualLocation(RwLock<Option<Coordinate>>);

impl ManualLocation {
	#[must_use]
	pub const fn new(location: Option<Coordinate>) -> Self {
		Self(RwLock::new(location))
	}

	pub fn set(&self, location: Option<Coordinate>) {
		*self.0.write().unwrap_or_else(PoisonError::into_inner) = location;
	}
}

#[async_trait]
impl LocationProvider for ManualLocation {
	async fn current_location(&self) -> Option<Coordinate> {
		*self.0.read().unwrap_or_else(PoisonError::into_inner)
	}
}
