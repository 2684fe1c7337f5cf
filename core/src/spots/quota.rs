use super::{Spot, MAX_SPOTS_PER_WINDOW, WINDOW_MS};

use std::fmt::Display;

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaDecision {
	pub allowed: bool,
	pub remaining: u32,
}

impl QuotaDecision {
	const UNRESTRICTED: Self = Self {
		allowed: true,
		remaining: MAX_SPOTS_PER_WINDOW,
	};
}

/// Sliding window quota over a snapshot of spots.
///
/// Counted from scratch on every call: an owner's spot counts while `now - created_at` is
/// under [`WINDOW_MS`].
pub fn may_admit<'a>(
	owner_id: &str,
	snapshot: impl IntoIterator<Item = &'a Spot>,
	now: i64,
) -> QuotaDecision {
	let count = snapshot
		.into_iter()
		.filter(|spot| spot.owner_id == owner_id && now.saturating_sub(spot.created_at) < WINDOW_MS)
		.count();

	let count = u32::try_from(count).unwrap_or(u32::MAX);

	QuotaDecision {
		allowed: count < MAX_SPOTS_PER_WINDOW,
		remaining: MAX_SPOTS_PER_WINDOW.saturating_sub(count),
	}
}

/// Same as [`may_admit`], but a snapshot that couldn't be fetched lets the owner through.
/// Users on a flaky connection are never blocked by the quota.
pub fn may_admit_or_allow<'a, S, E>(owner_id: &str, snapshot: Result<S, E>, now: i64) -> QuotaDecision
where
	S: IntoIterator<Item = &'a Spot>,
	E: Display,
{
	match snapshot {
		Ok(snapshot) => may_admit(owner_id, snapshot, now),
		Err(e) => {
			warn!(%e, "Failed to fetch spots for the quota check, allowing");
			QuotaDecision::UNRESTRICTED
		}
	}
}
