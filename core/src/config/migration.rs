use crate::error::Result;

/// A persisted structure with a schema version that can be upgraded in place.
pub trait Migrate {
	fn current_version(&self) -> u32;

	fn target_version() -> u32;

	/// Moves the structure up one version at a time until it reaches [`Self::target_version`].
	fn migrate(&mut self) -> Result<()>;

	fn needs_migration(&self) -> bool {
		self.current_version() < Self::target_version()
	}
}
