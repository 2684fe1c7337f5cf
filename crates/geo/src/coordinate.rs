use crate::error::{Error, Result};

use std::fmt;

/// A point on the WGS-84 ellipsoid, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
	pub latitude: f64,
	pub longitude: f64,
}

impl Coordinate {
	/// Builds a coordinate, rejecting non-finite values and anything outside
	/// `[-90, 90]` latitude or `[-180, 180]` longitude.
	pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
		if latitude.is_finite()
			&& longitude.is_finite()
			&& (-90.0..=90.0).contains(&latitude)
			&& (-180.0..=180.0).contains(&longitude)
		{
			Ok(Self {
				latitude,
				longitude,
			})
		} else {
			Err(Error::InvalidCoordinate {
				latitude,
				longitude,
			})
		}
	}
}

impl fmt::Display for Coordinate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
	}
}
