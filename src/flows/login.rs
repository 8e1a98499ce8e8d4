//! Credential login.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	error::AuthenticationError,
	flows::{AuthClient, common},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	transport::{ApiRequest, HttpTransport},
};

/// Successful login body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
	/// Freshly minted access token.
	pub token: AccessToken,
	/// Email of the authenticated account.
	pub email: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
	email: &'a str,
	password: &'a str,
}

impl<C> AuthClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Exchanges credentials for an access token.
	///
	/// The response also sets the refresh cookie in the transport's jar. The token is returned,
	/// not stored; callers decide whether to put it into a session.
	pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
		const KIND: FlowKind = FlowKind::Login;

		let span = FlowSpan::new(KIND, "login");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = ApiRequest::post(self.config.endpoints.login.as_str())
					.json(&Credentials { email, password })?;
				let response = self.send(&request, None).await?;

				if !response.is_success() {
					return Err(AuthenticationError::from_server(
						Some(response.status().as_u16()),
						common::server_message(&response),
					)
					.into());
				}

				Ok(response.json::<LoginResponse>()?)
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}
}
