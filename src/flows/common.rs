//! Shared helpers for flow implementations (dispatch, status checks, server message extraction).

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	flows::AuthClient,
	transport::{ApiRequest, ApiResponse, HttpTransport},
};

impl<C> AuthClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Resolves `request`, attaches `token` when provided, and sends it.
	pub(crate) async fn send(
		&self,
		request: &ApiRequest,
		token: Option<&AccessToken>,
	) -> Result<ApiResponse> {
		let prepared = request.prepare(&self.config, token)?;

		Ok(self.transport.execute(prepared).await?)
	}
}

/// Turns a non-2xx response into [`Error::Rejected`], preferring the server's own message.
pub(crate) fn ensure_success(response: &ApiResponse, default_message: &str) -> Result<()> {
	if response.is_success() {
		Ok(())
	} else {
		Err(Error::Rejected {
			status: response.status().as_u16(),
			message: server_message(response).unwrap_or_else(|| default_message.into()),
		})
	}
}

/// Extracts a human-readable message from an error response.
///
/// JSON bodies contribute their `message` (or `error`) field; other non-empty bodies are used
/// verbatim, since several endpoints answer with plain text.
pub fn server_message(response: &ApiResponse) -> Option<String> {
	match serde_json::from_slice::<Value>(response.body()) {
		Ok(value) => json_field_message(&value),
		Err(_) => non_empty(response.text()),
	}
}

/// Extracts the `message` field of a JSON body, ignoring anything that is not JSON.
pub fn json_message(response: &ApiResponse) -> Option<String> {
	serde_json::from_slice::<Value>(response.body()).ok().as_ref().and_then(json_field_message)
}

fn json_field_message(value: &Value) -> Option<String> {
	match value {
		Value::String(message) => non_empty(message.clone()),
		Value::Object(map) => ["message", "error"]
			.iter()
			.filter_map(|key| map.get(*key).and_then(Value::as_str))
			.find_map(|message| non_empty(message.to_owned())),
		_ => None,
	}
}

fn non_empty(message: String) -> Option<String> {
	let trimmed = message.trim();

	if trimmed.is_empty() { None } else { Some(trimmed.to_owned()) }
}

#[cfg(test)]
mod tests {
	// crates.io
	use http::{HeaderMap, StatusCode};
	// self
	use super::*;

	fn response(body: &str) -> ApiResponse {
		with_status(StatusCode::UNAUTHORIZED, body)
	}

	fn with_status(status: StatusCode, body: &str) -> ApiResponse {
		ApiResponse::new(status, HeaderMap::new(), body.as_bytes().to_vec())
	}

	#[test]
	fn ensure_success_prefers_the_server_message() {
		assert!(ensure_success(&with_status(StatusCode::CREATED, ""), "Something went wrong").is_ok());

		let err = ensure_success(
			&with_status(StatusCode::CONFLICT, r#"{"message":"Email already registered"}"#),
			"Something went wrong",
		)
		.expect_err("A 409 should be rejected.");

		assert!(
			matches!(&err, Error::Rejected { status: 409, message } if message == "Email already registered"),
			"Unexpected error: {err:?}."
		);

		let err = ensure_success(&with_status(StatusCode::BAD_GATEWAY, ""), "Logout failed")
			.expect_err("A 502 should be rejected.");

		assert!(
			matches!(&err, Error::Rejected { status: 502, message } if message == "Logout failed"),
			"Unexpected error: {err:?}."
		);
	}

	#[test]
	fn plain_text_bodies_are_messages() {
		assert_eq!(
			server_message(&response("Invalid email or password")).as_deref(),
			Some("Invalid email or password")
		);
		assert_eq!(server_message(&response("   ")), None);
		assert_eq!(server_message(&response("")), None);
	}

	#[test]
	fn json_bodies_prefer_message_then_error() {
		assert_eq!(
			server_message(&response(r#"{"message":"Refresh token expired","error":"x"}"#))
				.as_deref(),
			Some("Refresh token expired")
		);
		assert_eq!(server_message(&response(r#"{"error":"Unauthorized"}"#)).as_deref(), Some("Unauthorized"));
		assert_eq!(server_message(&response(r#"{"status":401}"#)), None);
	}

	#[test]
	fn json_message_ignores_plain_text() {
		assert_eq!(json_message(&response("<html>bad gateway</html>")), None);
		assert_eq!(json_message(&response(r#"{"message":"Nope"}"#)).as_deref(), Some("Nope"));
	}
}
