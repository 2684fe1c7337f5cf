//! Devices sharing one in-memory store, each with its own data directory, location and view.

#![allow(dead_code)]

use ph_core::{
	clock::ManualClock,
	location::{LocationProvider, ManualLocation},
	spots::{LiveSpots, SpotEvent, Subscription},
	Node,
};
use ph_geo::Coordinate;
use ph_images::{DynamicImage, TextDetector, TextRegion, UnavailableDetector};
use ph_sync::MemoryStore;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::time::timeout;

pub const NOW: i64 = 1_700_000_000_000;

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

pub fn center() -> Coordinate {
	Coordinate::new(40.0, -74.0).unwrap()
}

/// Always finds the same regions.
pub struct FixedDetector(pub Vec<TextRegion>);

#[async_trait]
impl TextDetector for FixedDetector {
	async fn detect(&self, _image: &DynamicImage) -> ph_images::Result<Vec<TextRegion>> {
		Ok(self.0.clone())
	}
}

pub struct TestDevice {
	pub node: Node,
	pub location: Arc<ManualLocation>,
	pub live: LiveSpots,
	pub subscription: Subscription,
	pub data_dir: TempDir,
}

impl TestDevice {
	pub async fn new(remote: &MemoryStore, clock: &ManualClock) -> Self {
		Self::with_detector(remote, clock, Arc::new(UnavailableDetector)).await
	}

	pub async fn with_detector(
		remote: &MemoryStore,
		clock: &ManualClock,
		detector: Arc<dyn TextDetector>,
	) -> Self {
		let data_dir = TempDir::new().unwrap();
		let location = Arc::new(ManualLocation::new(Some(center())));
		let provider: Arc<dyn LocationProvider> = location.clone();

		let node = Node::new_with_clock(
			data_dir.path(),
			Arc::new(remote.clone()),
			provider,
			detector,
			Arc::new(clock.clone()),
		)
		.await
		.unwrap();

		let subscription = node.subscribe().await.unwrap();

		Self {
			node,
			location,
			live: LiveSpots::new(),
			subscription,
			data_dir,
		}
	}

	/// Next event on this device's feed, already applied to its view.
	pub async fn next_event(&mut self) -> SpotEvent {
		let event = timeout(EVENT_TIMEOUT, self.subscription.recv())
			.await
			.expect("timed out waiting for a spot event")
			.expect("spot feed ended");

		self.live.apply(&event);
		event
	}

	/// Applies the next `count` events.
	pub async fn sync(&mut self, count: usize) {
		for _ in 0..count {
			self.next_event().await;
		}
	}

	/// Waits a bit and asserts nothing else arrived.
	pub async fn assert_quiet(&self) {
		tokio::time::sleep(Duration::from_millis(50)).await;
		assert_eq!(self.subscription.try_recv(), None);
	}
}
