use crate::{
	error::{Error, Result},
	store::{listener_channel, ChildEvent, ChildListener, SharedStore},
};

use std::{collections::BTreeMap, sync::Arc};

use async_channel as chan;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// In-process [`SharedStore`]. Clones share the same collection, so each clone can play the
/// part of a different device talking to one backend.
///
/// Mutations and listener registration happen under one lock, so every listener sees the
/// same order of events and a new listener's replay never misses or duplicates a child.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
	inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
	children: BTreeMap<String, Value>,
	listeners: Vec<chan::Sender<ChildEvent>>,
	offline: bool,
}

impl Inner {
	fn ensure_online(&self) -> Result<()> {
		if self.offline {
			Err(Error::Unavailable("memory store is offline".to_string()))
		} else {
			Ok(())
		}
	}

	fn broadcast(&mut self, event: &ChildEvent) {
		// Unbounded channels only refuse when the listener side is gone
		self.listeners
			.retain(|tx| tx.try_send(event.clone()).is_ok());
	}
}

impl MemoryStore {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Takes the store offline or back online. Going offline cancels every active listener and
	/// makes all further calls fail until the store is back.
	pub async fn set_online(&self, online: bool) {
		let mut inner = self.inner.lock().await;
		inner.offline = !online;

		if !online {
			let listeners = std::mem::take(&mut inner.listeners);
			warn!(
				listeners = listeners.len(),
				"Memory store going offline, cancelling listeners"
			);

			for tx in listeners {
				let _ = tx.try_send(ChildEvent::Cancelled(Error::Unavailable(
					"connection lost".to_string(),
				)));
			}
		}
	}

	pub async fn len(&self) -> usize {
		self.inner.lock().await.children.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.inner.lock().await.children.is_empty()
	}

	pub async fn contains(&self, key: &str) -> bool {
		self.inner.lock().await.children.contains_key(key)
	}

	/// Number of listeners that will receive the next event.
	pub async fn listener_count(&self) -> usize {
		let mut inner = self.inner.lock().await;
		inner.listeners.retain(|tx| !tx.is_closed());
		inner.listeners.len()
	}
}

#[async_trait]
impl SharedStore for MemoryStore {
	fn generate_key(&self) -> String {
		Uuid::new_v4().simple().to_string()
	}

	#[instrument(skip(self, value))]
	async fn write(&self, key: &str, value: Value) -> Result<()> {
		let mut inner = self.inner.lock().await;
		inner.ensure_online()?;

		// Overwrites reach listeners as a removal of the old value followed by an addition
		if let Some(previous) = inner.children.insert(key.to_string(), value.clone()) {
			inner.broadcast(&ChildEvent::Removed {
				key: key.to_string(),
				value: previous,
			});
		}

		inner.broadcast(&ChildEvent::Added {
			key: key.to_string(),
			value,
		});

		Ok(())
	}

	#[instrument(skip(self))]
	async fn delete(&self, key: &str) -> Result<()> {
		let mut inner = self.inner.lock().await;
		inner.ensure_online()?;

		match inner.children.remove(key) {
			Some(value) => inner.broadcast(&ChildEvent::Removed {
				key: key.to_string(),
				value,
			}),
			None => debug!("Deleting a missing child, nothing to do"),
		}

		Ok(())
	}

	async fn read_all(&self) -> Result<Vec<(String, Value)>> {
		let inner = self.inner.lock().await;
		inner.ensure_online()?;

		Ok(inner
			.children
			.iter()
			.map(|(key, value)| (key.clone(), value.clone()))
			.collect())
	}

	async fn listen(&self) -> Result<ChildListener> {
		let mut inner = self.inner.lock().await;
		inner.ensure_online()?;

		let (tx, listener) = listener_channel();

		for (key, value) in &inner.children {
			let _ = tx.try_send(ChildEvent::Added {
				key: key.clone(),
				value: value.clone(),
			});
		}

		inner.listeners.push(tx);

		Ok(listener)
	}
}
