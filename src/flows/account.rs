//! Account creation and restore calls.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	flows::{AuthClient, common::ensure_success},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	transport::{ApiRequest, HttpTransport},
};

/// Body returned by the restore endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreResponse {
	/// Email of the restored account.
	pub email: String,
	/// Confirmation message.
	#[serde(default)]
	pub message: Option<String>,
	/// Access token, for server versions that sign the user in on restore.
	#[serde(default)]
	pub token: Option<AccessToken>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignupForm<'a> {
	email: &'a str,
	password: &'a str,
	confirm_password: &'a str,
}

impl<C> AuthClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates an account. Server-side validation failures come back as [`Error::Rejected`].
	pub async fn signup(&self, email: &str, password: &str, confirm_password: &str) -> Result<()> {
		const KIND: FlowKind = FlowKind::Signup;

		let span = FlowSpan::new(KIND, "signup");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = ApiRequest::post(self.config.endpoints.signup.as_str())
					.json(&SignupForm { email, password, confirm_password })?;
				let response = self.send(&request, None).await?;

				ensure_success(&response, "Something went wrong")
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	/// Restores an account that is scheduled for deletion.
	pub async fn restore(&self, email: &str, password: &str) -> Result<RestoreResponse> {
		const KIND: FlowKind = FlowKind::Restore;

		let span = FlowSpan::new(KIND, "restore");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = ApiRequest::post(self.config.endpoints.restore.as_str())
					.form([("email", email), ("password", password)]);
				let response = self.send(&request, None).await?;

				ensure_success(&response, "Account restore failed")?;

				Ok(response.json::<RestoreResponse>()?)
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}
}
