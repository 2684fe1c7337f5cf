//! Local checks a proposal has to pass before it is sent to the store.
//!
//! They run against the proposer's own view of the world, so two devices proposing at the same
//! moment can both pass spacing and quota.

use super::{expiry, quota, Spot, MAX_DISTANCE_METERS, MIN_SPACING_METERS};

use crate::error::{Error, Result, ValidationError};

use ph_geo::{distance, Coordinate};

/// A spot as the user asked for it, before any validation.
#[derive(Debug, Clone, Default)]
pub struct Candidate {
	pub latitude: f64,
	pub longitude: f64,
	pub description: String,
	/// Raw photo bytes in any format the image decoder understands.
	pub photo: Option<Vec<u8>>,
}

impl Candidate {
	#[must_use]
	pub fn new(latitude: f64, longitude: f64) -> Self {
		Self {
			latitude,
			longitude,
			..Default::default()
		}
	}

	#[must_use]
	pub fn at(coordinate: Coordinate) -> Self {
		Self::new(coordinate.latitude, coordinate.longitude)
	}

	#[must_use]
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	#[must_use]
	pub fn with_photo(mut self, photo: Vec<u8>) -> Self {
		self.photo = Some(photo);
		self
	}
}

/// The candidate has to be a valid coordinate within [`MAX_DISTANCE_METERS`] of `current`.
pub fn check_placement(
	current: Coordinate,
	candidate: &Candidate,
) -> std::result::Result<Coordinate, ValidationError> {
	let coordinate = Coordinate::new(candidate.latitude, candidate.longitude)?;

	let distance = distance(current, coordinate);
	if distance > MAX_DISTANCE_METERS {
		return Err(ValidationError::OutOfRange { distance });
	}

	Ok(coordinate)
}

/// No live spot of another owner may sit closer than [`MIN_SPACING_METERS`]. An owner's own
/// spots don't count.
pub fn check_spacing<'a>(
	coordinate: Coordinate,
	owner_id: &str,
	live: impl IntoIterator<Item = &'a Spot>,
	now: i64,
) -> std::result::Result<(), ValidationError> {
	let nearest = live
		.into_iter()
		.filter(|spot| spot.owner_id != owner_id && !expiry::is_expired(spot, now))
		.filter_map(|spot| spot.coordinate().ok())
		.map(|other| distance(coordinate, other))
		.min_by(f64::total_cmp);

	match nearest {
		Some(distance) if distance < MIN_SPACING_METERS => {
			Err(ValidationError::TooClose { distance })
		}
		_ => Ok(()),
	}
}

/// Placement, spacing and quota, in that order. Returns the validated coordinate.
pub fn validate<'a, I>(
	current: Coordinate,
	candidate: &Candidate,
	owner_id: &str,
	live: I,
	now: i64,
) -> Result<Coordinate>
where
	I: IntoIterator<Item = &'a Spot> + Copy,
{
	let coordinate = check_placement(current, candidate)?;
	check_spacing(coordinate, owner_id, live, now)?;

	if !quota::may_admit(owner_id, live, now).allowed {
		return Err(Error::QuotaExceeded);
	}

	Ok(coordinate)
}
