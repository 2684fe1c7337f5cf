use super::{expiry, Spot, SpotId};

use crate::clock::Clock;

use ph_sync::{ChildEvent, ChildListener, SharedStore, Value};

use std::{collections::HashSet, sync::Arc};

use async_channel as chan;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace, warn};

/// What a [`Subscription`] yields.
#[derive(Debug, Clone, PartialEq)]
pub enum SpotEvent {
	/// A live spot, either part of the backlog or newly admitted.
	Created(Spot),
	/// A spot this subscription surfaced earlier was removed or expired.
	Removed(SpotId),
	/// The remote feed failed. Always the last event.
	Error(ph_sync::Error),
}

/// A continuous feed of spot creations and removals.
///
/// Events arrive in order from a single background task. Dropping the subscription stops it.
#[derive(Debug)]
pub struct Subscription {
	rx: chan::Receiver<SpotEvent>,
	stop: CancellationToken,
}

impl Subscription {
	pub(crate) fn spawn(
		listener: ChildListener,
		remote: Arc<dyn SharedStore>,
		clock: Arc<dyn Clock>,
	) -> Self {
		let (tx, rx) = chan::unbounded();
		let stop = CancellationToken::new();

		tokio::spawn(
			Feed {
				listener,
				remote,
				clock,
				tx,
				surfaced: HashSet::new(),
			}
			.run(stop.clone()),
		);

		Self { rx, stop }
	}

	/// Next event, or `None` once the feed ended or [`Self::unsubscribe`] was called.
	pub async fn recv(&self) -> Option<SpotEvent> {
		if self.stop.is_cancelled() {
			return None;
		}

		tokio::select! {
			biased;
			() = self.stop.cancelled() => None,
			event = self.rx.recv() => event.ok(),
		}
	}

	/// An event that is already waiting, without blocking.
	#[must_use]
	pub fn try_recv(&self) -> Option<SpotEvent> {
		if self.stop.is_cancelled() {
			return None;
		}

		self.rx.try_recv().ok()
	}

	/// Stops the feed. Nothing is yielded afterwards, even events already queued. Calling it more
	/// than once is fine.
	pub fn unsubscribe(&self) {
		if !self.stop.is_cancelled() {
			debug!("Unsubscribing from spot feed");
			self.stop.cancel();
			self.rx.close();
		}
	}

	#[must_use]
	pub fn is_active(&self) -> bool {
		!self.stop.is_cancelled() && !(self.rx.is_closed() && self.rx.is_empty())
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.stop.cancel();
	}
}

struct Feed {
	listener: ChildListener,
	remote: Arc<dyn SharedStore>,
	clock: Arc<dyn Clock>,
	tx: chan::Sender<SpotEvent>,
	surfaced: HashSet<SpotId>,
}

impl Feed {
	#[instrument(name = "spot_feed", skip_all)]
	async fn run(mut self, stop: CancellationToken) {
		loop {
			let event = tokio::select! {
				biased;
				() = stop.cancelled() => break,
				event = self.listener.recv() => event,
			};

			let Some(event) = event else {
				debug!("Remote listener closed, ending spot feed");
				break;
			};

			let keep_going = match event {
				ChildEvent::Added { key, value } => self.on_added(key, value).await,
				ChildEvent::Removed { key, .. } => self.on_removed(key),
				ChildEvent::Cancelled(e) => {
					warn!(%e, "Remote listener cancelled");
					let _ = self.tx.try_send(SpotEvent::Error(e));
					false
				}
			};

			if !keep_going {
				break;
			}
		}

		self.listener.close();
		self.tx.close();
	}

	async fn on_added(&mut self, key: String, value: Value) -> bool {
		let Some(spot) = decode(key, value) else {
			return true;
		};

		if expiry::is_expired(&spot, self.clock.now_millis()) {
			// Its removal is delivered later only if some other subscription surfaced it
			expiry::evict(&*self.remote, spot.id.as_str()).await;
			return true;
		}

		trace!(id = %spot.id, "Spot created");
		self.surfaced.insert(spot.id.clone());
		self.send(SpotEvent::Created(spot))
	}

	fn on_removed(&mut self, key: String) -> bool {
		let id = SpotId::from(key);

		if self.surfaced.remove(&id) {
			trace!(%id, "Spot removed");
			self.send(SpotEvent::Removed(id))
		} else {
			true
		}
	}

	/// False once nobody is listening anymore.
	fn send(&self, event: SpotEvent) -> bool {
		self.tx.try_send(event).is_ok()
	}
}

/// Decodes a remote child. The key is the spot's identity, whatever the value carries.
pub(crate) fn decode(key: String, value: Value) -> Option<Spot> {
	match serde_json::from_value::<Spot>(value) {
		Ok(mut spot) => {
			spot.id = SpotId::from(key);
			Some(spot)
		}
		Err(e) => {
			warn!(%key, %e, "Skipping undecodable spot");
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use crate::clock::ManualClock;

	use ph_sync::MemoryStore;
	use serde_json::json;
	use tracing_test::traced_test;

	const NOW: i64 = 1_700_000_000_000;

	fn record(created_at: i64) -> Value {
		json!({
			"latitude": 40.0,
			"longitude": -74.0,
			"addedBy": "d1",
			"addedAt": created_at,
		})
	}

	async fn subscribe(remote: &MemoryStore, clock: &ManualClock) -> Subscription {
		Subscription::spawn(
			remote.listen().await.unwrap(),
			Arc::new(remote.clone()),
			Arc::new(clock.clone()),
		)
	}

	#[test]
	fn key_wins_over_the_stored_id() {
		let mut value = record(NOW);
		value["id"] = json!("stale");

		let spot = decode("fresh".to_string(), value).unwrap();
		assert_eq!(spot.id.as_str(), "fresh");
	}

	#[test]
	#[traced_test]
	fn undecodable_values_are_skipped() {
		assert!(decode("k".to_string(), json!({ "latitude": "north" })).is_none());
		assert!(logs_contain("Skipping undecodable spot"));
	}

	#[tokio::test]
	#[traced_test]
	async fn removal_of_an_unseen_spot_is_not_forwarded() {
		let remote = MemoryStore::new();
		let clock = ManualClock::new(NOW);
		remote.write("junk", json!("not a spot")).await.unwrap();

		let subscription = subscribe(&remote, &clock).await;

		remote.delete("junk").await.unwrap();
		remote.write("k", record(NOW)).await.unwrap();

		assert!(matches!(
			subscription.recv().await,
			Some(SpotEvent::Created(spot)) if spot.id.as_str() == "k"
		));
		assert_eq!(subscription.try_recv(), None);
	}

	#[tokio::test]
	#[traced_test]
	async fn expired_backlog_is_evicted_instead_of_surfaced() {
		let remote = MemoryStore::new();
		let clock = ManualClock::new(NOW);
		remote
			.write("expired", record(NOW - 61 * 60 * 1000))
			.await
			.unwrap();
		remote.write("live", record(NOW)).await.unwrap();

		let subscription = subscribe(&remote, &clock).await;

		assert!(matches!(
			subscription.recv().await,
			Some(SpotEvent::Created(spot)) if spot.id.as_str() == "live"
		));

		// The backlog replays in key order, so the eviction already happened
		assert!(!remote.contains("expired").await);
	}

	#[tokio::test]
	#[traced_test]
	async fn unsubscribe_is_idempotent_and_final() {
		let remote = MemoryStore::new();
		let clock = ManualClock::new(NOW);
		remote.write("a", record(NOW)).await.unwrap();

		let subscription = subscribe(&remote, &clock).await;
		assert!(subscription.is_active());

		subscription.unsubscribe();
		subscription.unsubscribe();

		remote.write("b", record(NOW)).await.unwrap();

		assert!(!subscription.is_active());
		assert_eq!(subscription.recv().await, None);
		assert_eq!(subscription.try_recv(), None);
	}

	#[tokio::test]
	#[traced_test]
	async fn remote_failure_ends_the_feed() {
		let remote = MemoryStore::new();
		let clock = ManualClock::new(NOW);

		let subscription = subscribe(&remote, &clock).await;
		remote.set_online(false).await;

		assert!(matches!(
			subscription.recv().await,
			Some(SpotEvent::Error(ph_sync::Error::Unavailable(_)))
		));
		assert_eq!(subscription.recv().await, None);
		assert!(!subscription.is_active());
	}
}
