use crate::error::{Error, Result};

use async_channel as chan;
use async_trait::async_trait;
use serde_json::Value;

/// A single notification from the remote collection.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildEvent {
	/// A child exists at `key`. Sent once per child already present when the listener is
	/// registered, then once for every new child.
	Added { key: String, value: Value },
	/// The child at `key` was deleted, `value` is its last known content.
	Removed { key: String, value: Value },
	/// The remote side dropped this listener, no further events follow.
	Cancelled(Error),
}

#[async_trait]
pub trait SharedStore: Send + Sync + 'static {
	/// A fresh key that no other writer will produce.
	fn generate_key(&self) -> String;

	/// Stores `value` at `key` in a single write.
	async fn write(&self, key: &str, value: Value) -> Result<()>;

	/// Deletes the child at `key`. Deleting a missing key succeeds.
	async fn delete(&self, key: &str) -> Result<()>;

	/// Every child currently in the collection.
	async fn read_all(&self) -> Result<Vec<(String, Value)>>;

	/// Registers a listener that first replays every existing child as [`ChildEvent::Added`]
	/// and then follows live changes.
	async fn listen(&self) -> Result<ChildListener>;
}

/// Receiving side of a [`SharedStore::listen`] registration.
///
/// Dropping or closing it unregisters the listener the next time the store has something to
/// deliver.
#[derive(Debug)]
pub struct ChildListener {
	rx: chan::Receiver<ChildEvent>,
}

/// Creates the sender/listener pair a [`SharedStore`] implementation hands out.
#[must_use]
pub fn listener_channel() -> (chan::Sender<ChildEvent>, ChildListener) {
	let (tx, rx) = chan::unbounded();
	(tx, ChildListener { rx })
}

impl ChildListener {
	/// Next event, or `None` once the store dropped us or we were closed.
	pub async fn recv(&self) -> Option<ChildEvent> {
		self.rx.recv().await.ok()
	}

	pub fn close(&self) {
		self.rx.close();
	}

	#[must_use]
	pub fn is_closed(&self) -> bool {
		self.rx.is_closed()
	}
}

impl Drop for ChildListener {
	fn drop(&mut self) {
		self.rx.close();
	}
}

