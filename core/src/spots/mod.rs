//! Spot admission and lifecycle.
//!
//! A spot is proposed by one device, validated locally against that device's position and its
//! cached view of live spots, persisted in the shared store, and then lives for [`WINDOW_MS`]
//! until it expires or somebody marks it taken.

pub mod admission;
pub mod cache;
pub mod expiry;
pub mod model;
pub mod quota;
pub mod store;
pub mod subscription;

pub use admission::Candidate;
pub use cache::LiveSpots;
pub use expiry::is_expired;
pub use model::{NewSpot, Spot, SpotId};
pub use quota::{may_admit, may_admit_or_allow, QuotaDecision};
pub use store::SpotStore;
pub use subscription::{SpotEvent, Subscription};

/// A spot must be placed within this distance of the proposer's current location.
pub const MAX_DISTANCE_METERS: f64 = 100.0;

/// Spots from different owners can't be placed closer than this to each other.
pub const MIN_SPACING_METERS: f64 = 5.0;

/// How many spots one device may have live at once.
pub const MAX_SPOTS_PER_WINDOW: u32 = 3;

/// Time to live of a spot, which is also the quota window. One hour.
pub const WINDOW_MS: i64 = 60 * 60 * 1000;
