use std::num::TryFromIntError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("error while processing the image (via the `image` crate): {0}")]
	Image(#[from] image::ImageError),
	#[error("the photo could not be decoded: {0}")]
	Undecodable(image::ImageError),
	#[error("the photo provided is too large (over 24MiB)")]
	TooLarge,
	#[error("text detector failed: {0}")]
	Detector(String),
	#[error("text detector timed out")]
	Timeout,
	#[error("image processing task failed to complete")]
	ProcessingTask,
	#[error("error while parsing integers")]
	TryFromInt(#[from] TryFromIntError),
}
