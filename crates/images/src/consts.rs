use std::time::Duration;

/// Photos are downscaled so that neither side exceeds this many pixels.
pub const MAX_PHOTO_DIMENSION: u32 = 800;

/// JPEG quality used for every photo attached to a spot, between 1 and 100.
pub const JPEG_QUALITY: u8 = 50;

/// The largest raw photo we are willing to decode.
///
/// This value is in MiB.
pub const MAXIMUM_PHOTO_SIZE: u64 = MIB * 24;

/// How long we wait on the text detector before giving up and keeping the photo unredacted.
pub const DEFAULT_DETECTOR_TIMEOUT: Duration = Duration::from_secs(10);

/// The size of 1MiB in bytes
const MIB: u64 = 1_048_576;
