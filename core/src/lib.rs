#![warn(
	clippy::all,
	clippy::pedantic,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::nursery,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	clippy::expect_used,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	clippy::dbg_macro
)]
#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

use crate::{
	clock::{Clock, SystemClock},
	config::AppConfig,
	device::DeviceIdentity,
	location::LocationProvider,
	spots::{
		admission, quota, Candidate, LiveSpots, NewSpot, QuotaDecision, SpotId, SpotStore,
		Subscription, MAX_DISTANCE_METERS,
	},
};

use ph_geo::{clamp_to_radius, Coordinate};
use ph_images::{RedactionPipeline, TextDetector};
use ph_sync::SharedStore;
use ph_utils::report_error;

use std::{fmt, path::Path, sync::Arc};

use tracing::{info, instrument, warn};

pub mod clock;
pub mod config;
pub mod device;
pub mod error;
pub mod location;
pub mod logging;
pub mod spots;

pub use error::{Error, Result, ValidationError};

/// One device taking part in spot sharing.
///
/// Wires the device identity, the shared store and the photo pipeline together and runs the
/// admission checks before anything is written.
pub struct Node {
	config: AppConfig,
	identity: DeviceIdentity,
	owner_id: String,
	spots: SpotStore,
	location: Arc<dyn LocationProvider>,
	redaction: RedactionPipeline,
}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Node")
			.field("config", &self.config)
			.field("identity", &self.identity)
			.field("spots", &self.spots)
			.finish_non_exhaustive()
	}
}

impl Node {
	pub async fn new(
		data_dir: impl AsRef<Path> + Send,
		remote: Arc<dyn SharedStore>,
		location: Arc<dyn LocationProvider>,
		detector: Arc<dyn TextDetector>,
	) -> Result<Self> {
		Self::new_with_clock(data_dir, remote, location, detector, Arc::new(SystemClock)).await
	}

	/// Loads config and device identity from `data_dir` and, unless disabled, sweeps expired
	/// spots once. A failed sweep is logged, it doesn't stop the node.
	pub async fn new_with_clock(
		data_dir: impl AsRef<Path> + Send,
		remote: Arc<dyn SharedStore>,
		location: Arc<dyn LocationProvider>,
		detector: Arc<dyn TextDetector>,
		clock: Arc<dyn Clock>,
	) -> Result<Self> {
		let data_dir = data_dir.as_ref();

		let config = AppConfig::load_from(data_dir)?;
		let identity = DeviceIdentity::load_or_create(data_dir)?;
		let owner_id = identity.owner_id();

		let redaction = RedactionPipeline::new(detector)
			.with_timeout(config.redaction.detector_timeout())
			.enabled(config.redaction.enabled);

		let spots = SpotStore::new(remote, clock);

		if config.sweep_on_start {
			report_error(
				"Failed to sweep expired spots on start",
				&spots.cleanup_expired().await,
			);
		}

		info!(%owner_id, "Node started");

		Ok(Self {
			config,
			identity,
			owner_id,
			spots,
			location,
			redaction,
		})
	}

	#[must_use]
	pub const fn config(&self) -> &AppConfig {
		&self.config
	}

	#[must_use]
	pub const fn identity(&self) -> &DeviceIdentity {
		&self.identity
	}

	/// The id written into every spot this node proposes.
	#[must_use]
	pub fn owner_id(&self) -> &str {
		&self.owner_id
	}

	#[must_use]
	pub const fn spots(&self) -> &SpotStore {
		&self.spots
	}

	pub async fn subscribe(&self) -> Result<Subscription> {
		self.spots.subscribe().await
	}

	/// Validates `candidate` against this device's position and `live`, sanitizes its photo and
	/// stores it.
	///
	/// A photo that can't be sanitized is dropped, the spot is still created.
	#[instrument(skip_all, fields(owner_id = %self.owner_id), err)]
	pub async fn propose_spot(&self, candidate: Candidate, live: &LiveSpots) -> Result<SpotId> {
		let current = self
			.location
			.current_location()
			.await
			.ok_or(Error::NoCurrentLocation)?;

		let coordinate =
			admission::validate(current, &candidate, &self.owner_id, live, self.spots.now())?;

		let Candidate {
			description, photo, ..
		} = candidate;

		let mut new_spot =
			NewSpot::new(coordinate, self.owner_id.clone()).with_description(description);

		if let Some(bytes) = photo {
			match self.redaction.sanitize(bytes).await {
				Ok(photo) => {
					if !photo.applied {
						warn!("Attaching photo without redaction");
					}
					new_spot = new_spot.with_photo(photo);
				}
				Err(e) => warn!(?e, "Failed to sanitize photo, creating spot without it"),
			}
		}

		self.spots.propose(new_spot).await
	}

	/// Where a marker dragged to `target` ends up: `target` itself, or the closest point to it on
	/// the circle a spot can be placed in.
	pub async fn place_marker(&self, target: Coordinate) -> Result<Coordinate> {
		let current = self
			.location
			.current_location()
			.await
			.ok_or(Error::NoCurrentLocation)?;

		Ok(clamp_to_radius(current, target, MAX_DISTANCE_METERS))
	}

	/// Quota of this device according to the remote store. Lets the device through when the
	/// store can't be read.
	pub async fn quota_status(&self) -> QuotaDecision {
		let snapshot = self.spots.snapshot().await;
		quota::may_admit_or_allow(&self.owner_id, snapshot.as_ref(), self.spots.now())
	}

	/// Quota of this device according to the local view.
	#[must_use]
	pub fn local_quota(&self, live: &LiveSpots) -> QuotaDecision {
		quota::may_admit(&self.owner_id, live, self.spots.now())
	}

	/// Anybody can mark any spot as taken.
	pub async fn mark_taken(&self, id: &SpotId) -> Result<()> {
		self.spots.remove(id).await
	}

	/// Deletes the spots in `live` that expired while they were being shown. Their removal
	/// comes back through every subscription that had them.
	pub async fn evict_expired(&self, live: &LiveSpots) -> usize {
		let expired = live.expired_ids(self.spots.now());

		for id in &expired {
			report_error("Failed to evict expired spot", &self.spots.remove(id).await);
		}

		expired.len()
	}
}
