use crate::error::{Error, Result};

use async_trait::async_trait;
use image::DynamicImage;

/// Axis-aligned bounding box of detected text, in pixel coordinates of the image handed to the
/// detector. Edges may fall outside the image, they are clipped before filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRegion {
	pub left: i32,
	pub top: i32,
	pub right: i32,
	pub bottom: i32,
}

impl TextRegion {
	#[must_use]
	pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
		Self {
			left,
			top,
			right,
			bottom,
		}
	}
}

/// Something that can find text (license plates, street signs, ...) in a photo.
#[async_trait]
pub trait TextDetector: Send + Sync {
	async fn detect(&self, image: &DynamicImage) -> Result<Vec<TextRegion>>;
}

/// Detector for platforms without a text recognition capability, every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableDetector;

#[async_trait]
impl TextDetector for UnavailableDetector {
	async fn detect(&self, _image: &DynamicImage) -> Result<Vec<TextRegion>> {
		Err(Error::Detector(
			"no text detector available on this platform".to_string(),
		))
	}
}
