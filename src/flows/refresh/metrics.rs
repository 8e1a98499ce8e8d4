// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::_prelude::*;

/// Per-client refresh counters, always on regardless of the `metrics` feature.
///
/// `attempts` counts refresh network calls. `joins` counts callers that awaited a refresh already
/// in flight, so `attempts + joins` is the number of recoveries that needed a new token.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	attempts: AtomicU64,
	successes: AtomicU64,
	failures: AtomicU64,
	joins: AtomicU64,
}
impl RefreshMetrics {
	/// Refresh network calls started.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Refresh calls that produced a token.
	pub fn successes(&self) -> u64 {
		self.successes.load(Ordering::Relaxed)
	}

	/// Refresh calls that failed, including malformed responses and timeouts.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	/// Callers that joined a refresh started by another caller.
	pub fn joins(&self) -> u64 {
		self.joins.load(Ordering::Relaxed)
	}

	/// Point-in-time copy of every counter.
	pub fn snapshot(&self) -> RefreshCounts {
		RefreshCounts {
			attempts: self.attempts(),
			successes: self.successes(),
			failures: self.failures(),
			joins: self.joins(),
		}
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.successes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_join(&self) {
		self.joins.fetch_add(1, Ordering::Relaxed);
	}
}

/// Copy of [`RefreshMetrics`] taken by [`RefreshMetrics::snapshot`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshCounts {
	/// Refresh network calls started.
	pub attempts: u64,
	/// Refresh calls that produced a token.
	pub successes: u64,
	/// Refresh calls that failed.
	pub failures: u64,
	/// Callers that joined an in-flight refresh.
	pub joins: u64,
}
impl RefreshCounts {
	/// Refresh calls started but not yet settled.
	pub fn pending(&self) -> u64 {
		self.attempts.saturating_sub(self.successes + self.failures)
	}
}
impl Display for RefreshCounts {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(
			f,
			"{} refresh call(s): {} ok, {} failed, {} joined",
			self.attempts, self.successes, self.failures, self.joins
		)
	}
}
