use std::{
	sync::{
		atomic::{AtomicI64, Ordering},
		Arc,
	},
	time::Duration,
};

use chrono::Utc;

/// Wall clock in epoch milliseconds, the unit every spot timestamp uses.
pub trait Clock: Send + Sync + 'static {
	fn now_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now_millis(&self) -> i64 {
		Utc::now().timestamp_millis()
	}
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Default, Clone)]
pub struct ManualClock(Arc<AtomicI64>);

impl ManualClock {
	#[must_use]
	pub fn new(now_millis: i64) -> Self {
		Self(Arc::new(AtomicI64::new(now_millis)))
	}

	pub fn set(&self, now_millis: i64) {
		self.0.store(now_millis, Ordering::Release);
	}

	pub fn advance(&self, by: Duration) {
		self.0.fetch_add(
			i64::try_from(by.as_millis()).unwrap_or(i64::MAX),
			Ordering::AcqRel,
		);
	}

	pub fn rewind(&self, by: Duration) {
		self.0.fetch_sub(
			i64::try_from(by.as_millis()).unwrap_or(i64::MAX),
			Ordering::AcqRel,
		);
	}
}

impl Clock for ManualClock {
	fn now_millis(&self) -> i64 {
		self.0.load(Ordering::Acquire)
	}
}
