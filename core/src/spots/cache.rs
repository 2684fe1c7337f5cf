use super::{expiry, Spot, SpotEvent, SpotId};

use std::collections::{hash_map, HashMap};

/// The local view of every live spot, kept up to date only by applying [`SpotEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct LiveSpots {
	spots: HashMap<SpotId, Spot>,
}

impl LiveSpots {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Folds one feed event into the view. Errors leave it untouched.
	pub fn apply(&mut self, event: &SpotEvent) {
		match event {
			SpotEvent::Created(spot) => {
				self.spots.insert(spot.id.clone(), spot.clone());
			}
			SpotEvent::Removed(id) => {
				self.spots.remove(id);
			}
			SpotEvent::Error(_) => {}
		}
	}

	#[must_use]
	pub fn get(&self, id: &SpotId) -> Option<&Spot> {
		self.spots.get(id)
	}

	#[must_use]
	pub fn contains(&self, id: &SpotId) -> bool {
		self.spots.contains_key(id)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.spots.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.spots.is_empty()
	}

	pub fn iter(&self) -> hash_map::Values<'_, SpotId, Spot> {
		self.spots.values()
	}

	/// Spots the view still holds that have expired since they were surfaced.
	#[must_use]
	pub fn expired_ids(&self, now: i64) -> Vec<SpotId> {
		self.spots
			.values()
			.filter(|spot| expiry::is_expired(spot, now))
			.map(|spot| spot.id.clone())
			.collect()
	}

	#[must_use]
	pub fn summary(&self) -> String {
		match self.len() {
			0 => "No spots available nearby".to_string(),
			1 => "1 spot available".to_string(),
			count => format!("{count} spots available"),
		}
	}
}

impl<'a> IntoIterator for &'a LiveSpots {
	type Item = &'a Spot;
	type IntoIter = hash_map::Values<'a, SpotId, Spot>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const NOW: i64 = 1_700_000_000_000;

	fn spot(id: &str, created_at: i64) -> Spot {
		Spot {
			id: SpotId::from(id),
			latitude: 40.0,
			longitude: -74.0,
			owner_id: "d1".to_string(),
			created_at,
			description: String::new(),
			image_data: None,
			image_redacted: false,
		}
	}

	#[test]
	fn follows_created_and_removed_events() {
		let mut live = LiveSpots::new();
		assert_eq!(live.summary(), "No spots available nearby");

		live.apply(&SpotEvent::Created(spot("a", NOW)));
		assert_eq!(live.summary(), "1 spot available");

		live.apply(&SpotEvent::Created(spot("b", NOW)));
		live.apply(&SpotEvent::Error(ph_sync::Error::Unavailable(
			"gone".to_string(),
		)));
		assert_eq!(live.summary(), "2 spots available");
		assert!(live.contains(&SpotId::from("a")));

		live.apply(&SpotEvent::Removed(SpotId::from("a")));
		live.apply(&SpotEvent::Removed(SpotId::from("a")));
		assert_eq!(live.len(), 1);
		assert!(live.get(&SpotId::from("a")).is_none());
		assert_eq!(live.iter().count(), 1);
	}

	#[test]
	fn finds_spots_that_expired_while_cached() {
		let mut live = LiveSpots::new();
		live.apply(&SpotEvent::Created(spot("old", NOW - 61 * 60 * 1000)));
		live.apply(&SpotEvent::Created(spot("new", NOW)));

		assert_eq!(live.expired_ids(NOW), vec![SpotId::from("old")]);
	}
}
