//! Cookie-based access-token refresh.
//!
//! [`AuthClient::refresh`] performs exactly one network call. De-duplication across concurrent
//! callers happens one layer up, in [`api::singleflight`](crate::api::singleflight), which
//! shares a single invocation of this method among every waiter.

mod metrics;

pub use metrics::{RefreshCounts, RefreshMetrics};

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	error::RefreshError,
	flows::{AuthClient, common},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	transport::{ApiRequest, ApiResponse, HttpTransport},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshBody {
	#[serde(default)]
	token: Option<String>,
	#[serde(default)]
	access_token: Option<String>,
}
impl RefreshBody {
	fn into_token(self) -> Option<AccessToken> {
		self.token
			.filter(|token| !token.is_empty())
			.or(self.access_token.filter(|token| !token.is_empty()))
			.map(AccessToken::new)
	}
}

impl<C> AuthClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Exchanges the refresh cookie for a new access token.
	///
	/// The request carries no body and no bearer header; the transport's cookie jar supplies the
	/// credential. The configured refresh timeout applies, and a timeout surfaces as
	/// [`RefreshError::Transport`]. The new token is returned, not stored.
	pub async fn refresh(&self) -> Result<AccessToken, RefreshError> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let result = span
			.instrument(async move {
				let mut request = ApiRequest::post(self.config.endpoints.refresh.as_str());

				request.timeout = self.config.refresh_timeout;

				let prepared = request
					.prepare(&self.config, None)
					.map_err(|e| RefreshError::Request { message: e.to_string() })?;
				let response = self.transport.execute(prepared).await?;

				parse_refresh_response(&response)
			})
			.await;

		match &result {
			Ok(token) => {
				self.refresh_metrics.record_success();
				obs::log_step(KIND, "refresh", &format!("issued token {}", token.fingerprint()));
			},
			Err(e) => {
				self.refresh_metrics.record_failure();
				obs::log_step(KIND, "refresh", &e.to_string());
			},
		}

		obs::record_result(KIND, &result);

		result
	}
}

/// Interprets a refresh response. Error bodies that are empty or not JSON are tolerated.
fn parse_refresh_response(response: &ApiResponse) -> Result<AccessToken, RefreshError> {
	if !response.is_success() {
		return Err(RefreshError::rejected(
			response.status().as_u16(),
			common::json_message(response),
		));
	}

	serde_json::from_slice::<RefreshBody>(response.body())
		.unwrap_or_default()
		.into_token()
		.ok_or(RefreshError::MissingToken)
}

#[cfg(test)]
mod tests {
	// crates.io
	use http::{HeaderMap, StatusCode};
	// self
	use super::*;

	fn response(status: StatusCode, body: &str) -> ApiResponse {
		ApiResponse::new(status, HeaderMap::new(), body.as_bytes().to_vec())
	}

	#[test]
	fn accepts_either_token_field() {
		let token = parse_refresh_response(&response(StatusCode::OK, r#"{"accessToken":"T2"}"#))
			.expect("accessToken bodies should be accepted.");

		assert_eq!(token.expose(), "T2");

		let token = parse_refresh_response(&response(StatusCode::OK, r#"{"token":"T3"}"#))
			.expect("token bodies should be accepted.");

		assert_eq!(token.expose(), "T3");

		let token = parse_refresh_response(&response(
			StatusCode::OK,
			r#"{"token":"","accessToken":"T4"}"#,
		))
		.expect("Empty token fields should fall through to accessToken.");

		assert_eq!(token.expose(), "T4");
	}

	#[test]
	fn success_without_token_is_malformed() {
		for body in ["", "{}", "not json", r#"{"token":null}"#] {
			assert_eq!(
				parse_refresh_response(&response(StatusCode::OK, body)),
				Err(RefreshError::MissingToken),
				"Body {body:?} should be reported as missing a token."
			);
		}
	}

	#[test]
	fn rejections_tolerate_empty_and_non_json_bodies() {
		assert_eq!(
			parse_refresh_response(&response(StatusCode::UNAUTHORIZED, "")),
			Err(RefreshError::Rejected { status: 401, message: "Refresh failed".into() })
		);
		assert_eq!(
			parse_refresh_response(&response(StatusCode::BAD_GATEWAY, "<html>oops</html>")),
			Err(RefreshError::Rejected { status: 502, message: "Refresh failed".into() })
		);
		assert_eq!(
			parse_refresh_response(&response(
				StatusCode::UNAUTHORIZED,
				r#"{"message":"Refresh token reuse detected"}"#
			)),
			Err(RefreshError::Rejected {
				status: 401,
				message: "Refresh token reuse detected".into()
			})
		);
	}
}
