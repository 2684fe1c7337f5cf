use super::{expiry, subscription, NewSpot, Spot, SpotId, Subscription};

use crate::{clock::Clock, error::Result};

use ph_sync::SharedStore;

use std::{fmt, sync::Arc};

use tracing::{debug, info, instrument};

/// Owner of spot identity and lifecycle, on top of a [`SharedStore`].
///
/// Validation happens before anything reaches this type, it persists whatever it's given.
#[derive(Clone)]
pub struct SpotStore {
	remote: Arc<dyn SharedStore>,
	clock: Arc<dyn Clock>,
}

impl fmt::Debug for SpotStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SpotStore").finish_non_exhaustive()
	}
}

impl SpotStore {
	pub fn new(remote: Arc<dyn SharedStore>, clock: Arc<dyn Clock>) -> Self {
		Self { remote, clock }
	}

	#[must_use]
	pub fn now(&self) -> i64 {
		self.clock.now_millis()
	}

	/// Assigns an id and a creation time, then writes the whole record at once.
	#[instrument(skip_all, fields(owner_id = %new_spot.owner_id), err)]
	pub async fn propose(&self, new_spot: NewSpot) -> Result<SpotId> {
		let id = SpotId::from(self.remote.generate_key());
		let spot = new_spot.into_spot(id.clone(), self.clock.now_millis());

		self.remote
			.write(id.as_str(), serde_json::to_value(&spot)?)
			.await?;

		info!(%id, "Spot created");

		Ok(id)
	}

	/// Removing a spot that's already gone succeeds.
	#[instrument(skip(self), err)]
	pub async fn remove(&self, id: &SpotId) -> Result<()> {
		self.remote.delete(id.as_str()).await?;
		debug!("Spot removed");

		Ok(())
	}

	/// Every live spot right now, followed by every later creation and removal.
	#[instrument(skip(self), err)]
	pub async fn subscribe(&self) -> Result<Subscription> {
		let listener = self.remote.listen().await?;

		Ok(Subscription::spawn(
			listener,
			Arc::clone(&self.remote),
			Arc::clone(&self.clock),
		))
	}

	/// Deletes every expired record, returning how many it went after.
	#[instrument(skip(self), err)]
	pub async fn cleanup_expired(&self) -> Result<usize> {
		let (_, evicted) = expiry::evict_expired(
			&*self.remote,
			self.snapshot().await?,
			self.clock.now_millis(),
		)
		.await;

		info!(evicted, "Expired spot sweep finished");

		Ok(evicted)
	}

	/// One-shot read of the live spots, evicting expired ones instead of returning them.
	#[instrument(skip(self), err)]
	pub async fn list_live(&self) -> Result<Vec<Spot>> {
		let (live, _) = expiry::evict_expired(
			&*self.remote,
			self.snapshot().await?,
			self.clock.now_millis(),
		)
		.await;

		Ok(live)
	}

	/// Every decodable record, expired or not.
	pub async fn snapshot(&self) -> Result<Vec<Spot>> {
		Ok(self
			.remote
			.read_all()
			.await?
			.into_iter()
			.filter_map(|(key, value)| subscription::decode(key, value))
			.collect())
	}
}
