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
	clippy::as_conversions,
	clippy::dbg_macro
)]
#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

//! Photo sanitization for spots: text regions (license plates, mostly) are blacked out before a
//! photo ever leaves the device.

mod consts;
mod detector;
mod error;
mod redact;
mod scale;

pub use consts::{DEFAULT_DETECTOR_TIMEOUT, JPEG_QUALITY, MAXIMUM_PHOTO_SIZE, MAX_PHOTO_DIMENSION};
pub use detector::{TextDetector, TextRegion, UnavailableDetector};
pub use error::{Error, Result};
pub use image::DynamicImage;
pub use redact::{Redacted, RedactionPipeline, SanitizedPhoto};
pub use scale::scale_dimensions;
