// self
use crate::obs::{FlowKind, FlowOutcome};

/// Counts attempts and outcomes per flow in `planora_session_flow_total` (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"planora_session_flow_total",
		"flow" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Counts callers that awaited a refresh started by someone else.
pub fn record_refresh_join() {
	#[cfg(feature = "metrics")]
	metrics::counter!("planora_session_refresh_joins_total").increment(1);
}

/// Counts sessions ended by a failed refresh or a rejected retry.
pub fn record_session_expired() {
	#[cfg(feature = "metrics")]
	metrics::counter!("planora_session_expired_total").increment(1);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_a_global_recorder() {
		record_flow_outcome(FlowKind::Fetch, FlowOutcome::Attempt);
		record_refresh_join();
		record_session_expired();
	}
}
