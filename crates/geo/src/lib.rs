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

//! Placement geometry for parking spots.
//!
//! Everything in here is pure: geodesic distance between two [`Coordinate`]s, clamping a point
//! onto a circle around a center, and radius checks. Invalid input never reaches these
//! functions, [`Coordinate::new`] is the only way to build one from untrusted values.

mod coordinate;
mod distance;
mod error;
mod radius;

pub use coordinate::Coordinate;
pub use distance::{distance, haversine_distance};
pub use error::{Error, Result};
pub use radius::{clamp_to_radius, is_within_radius};
