use crate::{
	consts::{DEFAULT_DETECTOR_TIMEOUT, JPEG_QUALITY, MAXIMUM_PHOTO_SIZE, MAX_PHOTO_DIMENSION},
	detector::{TextDetector, TextRegion},
	error::{Error, Result},
	scale::downscale,
};

use std::{sync::Arc, time::Duration};

use image::{codecs::jpeg::JpegEncoder, DynamicImage, GenericImage, GenericImageView, Rgba};
use tokio::{task::spawn_blocking, time::timeout};
use tracing::{debug, instrument, warn};

const FILL: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Outcome of a redaction pass over a decoded image.
#[derive(Debug, Clone)]
pub struct Redacted {
	pub image: DynamicImage,
	/// `true` only when the detector ran to completion, even if it found no text.
	pub applied: bool,
}

/// Bytes ready to be attached to a spot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedPhoto {
	pub bytes: Vec<u8>,
	pub applied: bool,
}

pub struct RedactionPipeline {
	detector: Arc<dyn TextDetector>,
	detector_timeout: Duration,
	enabled: bool,
}

impl RedactionPipeline {
	pub fn new(detector: Arc<dyn TextDetector>) -> Self {
		Self {
			detector,
			detector_timeout: DEFAULT_DETECTOR_TIMEOUT,
			enabled: true,
		}
	}

	#[must_use]
	pub const fn with_timeout(mut self, detector_timeout: Duration) -> Self {
		self.detector_timeout = detector_timeout;
		self
	}

	/// A disabled pipeline still downscales and re-encodes, it just never calls the detector.
	#[must_use]
	pub const fn enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	/// Blacks out every text region the detector finds.
	///
	/// A failing or slow detector never fails the call: the image comes back untouched with
	/// `applied = false`.
	#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
	pub async fn redact(&self, image: DynamicImage) -> Redacted {
		if !self.enabled {
			return Redacted {
				image,
				applied: false,
			};
		}

		let detection = timeout(self.detector_timeout, self.detector.detect(&image))
			.await
			.unwrap_or(Err(Error::Timeout));

		match detection {
			Ok(regions) => {
				let mut image = image;
				fill_regions(&mut image, &regions);
				debug!(regions = regions.len(), "Redacted photo");

				Redacted {
					image,
					applied: true,
				}
			}
			Err(e) => {
				warn!(?e, "Text detection failed, keeping photo unredacted");

				Redacted {
					image,
					applied: false,
				}
			}
		}
	}

	/// Full photo pipeline: decode, downscale, redact, re-encode as JPEG.
	///
	/// Bytes that can't be decoded are rejected with [`Error::Undecodable`], they never leave
	/// the device unredacted.
	#[instrument(skip_all, fields(size = bytes.len()))]
	pub async fn sanitize(&self, bytes: Vec<u8>) -> Result<SanitizedPhoto> {
		if u64::try_from(bytes.len())? > MAXIMUM_PHOTO_SIZE {
			return Err(Error::TooLarge);
		}

		let image = spawn_blocking(move || {
			image::load_from_memory(&bytes).map(|image| downscale(image, MAX_PHOTO_DIMENSION))
		})
		.await
		.map_err(|_| Error::ProcessingTask)?
		.map_err(Error::Undecodable)?;

		let Redacted { image, applied } = self.redact(image).await;

		let bytes = spawn_blocking(move || encode_jpeg(&image))
			.await
			.map_err(|_| Error::ProcessingTask)??;

		Ok(SanitizedPhoto { bytes, applied })
	}
}

fn fill_regions(image: &mut DynamicImage, regions: &[TextRegion]) {
	let (width, height) = image.dimensions();

	for region in regions {
		let (x0, x1) = clip(region.left, region.right, width);
		let (y0, y1) = clip(region.top, region.bottom, height);

		for y in y0..y1 {
			for x in x0..x1 {
				image.put_pixel(x, y, FILL);
			}
		}
	}
}

fn clip(start: i32, end: i32, limit: u32) -> (u32, u32) {
	let clamp = |v: i32| u32::try_from(v.max(0)).unwrap_or(0).min(limit);
	let (start, end) = (clamp(start), clamp(end));
	(start, end.max(start))
}

fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>> {
	let mut bytes = Vec::new();
	JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY).encode_image(&image.to_rgb8())?;
	Ok(bytes)
}
