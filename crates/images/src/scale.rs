use image::{imageops::FilterType, DynamicImage, GenericImageView};

/// Dimensions that fit within `max_dimension` on both sides while keeping the aspect ratio.
/// Images that already fit are left alone, we never upscale.
#[must_use]
#[allow(
	clippy::as_conversions,
	clippy::cast_possible_truncation,
	clippy::cast_sign_loss,
	clippy::cast_precision_loss
)]
pub fn scale_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
	if width == 0 || height == 0 {
		return (width, height);
	}

	let scale = f64::min(
		f64::from(max_dimension) / f64::from(width),
		f64::from(max_dimension) / f64::from(height),
	);

	if scale >= 1.0 {
		(width, height)
	} else {
		(
			((f64::from(width) * scale) as u32).max(1),
			((f64::from(height) * scale) as u32).max(1),
		)
	}
}

pub(crate) fn downscale(image: DynamicImage, max_dimension: u32) -> DynamicImage {
	let (w, h) = image.dimensions();
	let (w_scaled, h_scaled) = scale_dimensions(w, h, max_dimension);

	if (w, h) == (w_scaled, h_scaled) {
		image
	} else {
		image.resize_exact(w_scaled, h_scaled, FilterType::Triangle)
	}
}
