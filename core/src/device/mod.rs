//! Persistent identity of this installation, used as the owner of every spot it proposes.

mod identity;

pub use identity::{DeviceIdentity, DEVICE_FILE_NAME};
