use super::{Spot, WINDOW_MS};

use ph_sync::SharedStore;
use ph_utils::report_error;

use tracing::{debug, instrument};

/// A spot stops being live [`WINDOW_MS`] after it was created. Once true for some `now` it stays
/// true for every later `now`.
#[must_use]
pub const fn is_expired(spot: &Spot, now: i64) -> bool {
	now.saturating_sub(spot.created_at) >= WINDOW_MS
}

/// Deletes an expired record found while reading. Failures are logged and otherwise ignored,
/// the next reader or sweep will try again.
#[instrument(skip(remote))]
pub(crate) async fn evict(remote: &dyn SharedStore, key: &str) {
	debug!("Evicting expired spot");
	report_error("Failed to evict expired spot", &remote.delete(key).await);
}

/// Splits `spots` into the live ones, evicting every expired one along the way. Returns the live
/// spots and how many were evicted.
pub(crate) async fn evict_expired(
	remote: &dyn SharedStore,
	spots: Vec<Spot>,
	now: i64,
) -> (Vec<Spot>, usize) {
	let mut live = Vec::with_capacity(spots.len());
	let mut evicted = 0;

	for spot in spots {
		if is_expired(&spot, now) {
			evict(remote, spot.id.as_str()).await;
			evicted += 1;
		} else {
			live.push(spot);
		}
	}

	(live, evicted)
}
