//! Best-effort server-side logout.

// self
use crate::{
	_prelude::*,
	flows::{AuthClient, common::ensure_success},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	transport::{ApiRequest, HttpTransport},
};

impl<C> AuthClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Asks the server to revoke the refresh cookie.
	///
	/// Network and server failures are logged and swallowed: client-side teardown must never
	/// depend on this call.
	pub async fn logout(&self) {
		const KIND: FlowKind = FlowKind::Logout;

		let span = FlowSpan::new(KIND, "logout");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = ApiRequest::post(self.config.endpoints.logout.as_str());
				let response = self.send(&request, None).await?;

				ensure_success(&response, "Logout failed")
			})
			.await;

		if let Err(e) = &result {
			obs::log_swallowed(KIND, "logout", e);
		}

		obs::record_result(KIND, &result);
	}
}
