//! Client-level error types shared across auth flows, the authenticated fetch, and guards.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Login was rejected by the server.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),
	/// Refresh was rejected or returned a malformed response.
	#[error(transparent)]
	Refresh(#[from] RefreshError),
	/// Terminal failure after an unsuccessful refresh-and-retry cycle; the session was cleared
	/// and the caller must re-authenticate.
	#[error("Session expired. Please log in again.")]
	SessionExpired {
		/// Refresh failure that ended the session, if the refresh itself failed.
		#[source]
		cause: Option<RefreshError>,
	},
	/// Server answered an account or profile call with a non-success status.
	#[error("Request was rejected with HTTP {status}: {message}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Server-provided message or a default.
		message: String,
	},
}
impl Error {
	/// Returns `true` for the terminal [`Error::SessionExpired`] signal.
	pub fn is_session_expired(&self) -> bool {
		matches!(self, Self::SessionExpired { .. })
	}

	/// HTTP status associated with the failure, when one was observed.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. } => Some(*status),
			Self::Authentication(e) => e.status,
			Self::Refresh(RefreshError::Rejected { status, .. }) => Some(*status),
			Self::Decode(DecodeError::Json { status, .. }) => Some(*status),
			_ => None,
		}
	}
}

/// Login rejection carrying the server message or the default text.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{message}")]
pub struct AuthenticationError {
	/// Server-provided message, or [`AuthenticationError::DEFAULT_MESSAGE`].
	pub message: String,
	/// HTTP status code, when the server answered.
	pub status: Option<u16>,
}
impl AuthenticationError {
	/// Message used when the server does not provide one.
	pub const DEFAULT_MESSAGE: &'static str = "Login failed";

	/// Builds an error from an optional server message, falling back to the default.
	pub fn from_server(status: Option<u16>, message: Option<String>) -> Self {
		Self { message: message.unwrap_or_else(|| Self::DEFAULT_MESSAGE.into()), status }
	}
}

/// Refresh failure shared by every waiter of a single refresh operation.
///
/// The type is `Clone` because one outcome is fanned out to all concurrent callers.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RefreshError {
	/// Refresh endpoint answered with a non-success status.
	#[error("{message}")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Server-provided message, or [`RefreshError::DEFAULT_MESSAGE`].
		message: String,
	},
	/// Refresh endpoint succeeded but the body carried neither `token` nor `accessToken`.
	#[error("Refresh response missing token")]
	MissingToken,
	/// Refresh request could not be built from the configuration.
	#[error("Refresh request could not be built: {message}")]
	Request {
		/// Rendered configuration failure.
		message: String,
	},
	/// The session was cleared (logout or expiry) while the refresh was in flight, so its
	/// token was discarded.
	#[error("Session ended while the refresh was in flight")]
	SessionEnded,
	/// Network failure or timeout while calling the refresh endpoint.
	#[error("Refresh request failed: {message}")]
	Transport {
		/// Rendered transport failure.
		message: String,
	},
}
impl RefreshError {
	/// Message used when the server does not provide one.
	pub const DEFAULT_MESSAGE: &'static str = "Refresh failed";

	/// Builds a rejection from an optional server message, falling back to the default.
	pub fn rejected(status: u16, message: Option<String>) -> Self {
		Self::Rejected { status, message: message.unwrap_or_else(|| Self::DEFAULT_MESSAGE.into()) }
	}
}
impl From<TransportError> for RefreshError {
	fn from(e: TransportError) -> Self {
		Self::Transport { message: e.to_string() }
	}
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// Caller supplied a header name that is not valid HTTP.
	#[error(transparent)]
	InvalidHeaderName(#[from] http::header::InvalidHeaderName),
	/// Caller supplied a header value that is not valid HTTP.
	#[error(transparent)]
	InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
	/// Base URL uses a scheme other than HTTPS for a non-loopback host.
	#[error("The base URL must use HTTPS: {url}.")]
	InsecureBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// Base URL cannot carry paths (e.g. `mailto:`).
	#[error("The base URL cannot be used as a base: {url}.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// Request path could not be joined onto the base URL.
	#[error("Request path `{path}` is invalid.")]
	InvalidPath {
		/// Path supplied by the caller.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Joined request URL escapes the configured origin.
	#[error("Request URL `{url}` leaves the configured API origin.")]
	ForeignOrigin {
		/// Resolved URL.
		url: String,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Encode(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, timeout).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request did not complete within its timeout.
	#[error("The API call timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

/// Response decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body was not the expected JSON document.
	#[error("Response body (HTTP {status}) is not the expected JSON: {source}.")]
	Json {
		/// HTTP status of the decoded response.
		status: u16,
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_apply_when_server_is_silent() {
		let auth = AuthenticationError::from_server(Some(401), None);

		assert_eq!(auth.to_string(), "Login failed");

		let refresh = RefreshError::rejected(403, None);

		assert_eq!(refresh.to_string(), "Refresh failed");

		let refresh = RefreshError::rejected(403, Some("Refresh token revoked".into()));

		assert_eq!(refresh.to_string(), "Refresh token revoked");
	}

	#[test]
	fn session_expired_exposes_refresh_cause() {
		let err = Error::SessionExpired { cause: Some(RefreshError::MissingToken) };

		assert!(err.is_session_expired());

		let source = StdError::source(&err)
			.expect("Session expiry should expose the refresh failure as its source.");

		assert_eq!(source.to_string(), "Refresh response missing token");
		assert!(
			StdError::source(&Error::SessionExpired { cause: None }).is_none(),
			"A retry rejection carries no refresh cause."
		);
	}

	#[test]
	fn status_is_reported_for_server_failures() {
		assert_eq!(Error::Rejected { status: 404, message: "Not found".into() }.status(), Some(404));
		assert_eq!(Error::from(AuthenticationError::from_server(Some(401), None)).status(), Some(401));
		assert_eq!(Error::SessionExpired { cause: None }.status(), None);
	}

	#[test]
	fn transport_errors_render_into_refresh_errors() {
		let io = TransportError::Io(std::io::Error::other("connection reset"));
		let refresh = RefreshError::from(io);

		assert!(matches!(refresh, RefreshError::Transport { .. }));
		assert!(refresh.to_string().starts_with("Refresh request failed"));
	}
}
