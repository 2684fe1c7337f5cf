pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
	#[error("invalid coordinate <lat='{latitude}', lon='{longitude}'>")]
	InvalidCoordinate { latitude: f64, longitude: f64 },
}
