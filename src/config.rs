//! Validated client configuration: API origin, auth endpoint paths, and timeouts.

// std
use std::net::IpAddr;
// self
use crate::{_prelude::*, error::ConfigError};

/// Paths of the authentication-related endpoints, relative to the base URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEndpoints {
	/// Credential login (`POST`, JSON body).
	pub login: String,
	/// Cookie-based token refresh (`POST`, no body).
	pub refresh: String,
	/// Server-side logout (`POST`, no body).
	pub logout: String,
	/// Account creation (`POST`, JSON body).
	pub signup: String,
	/// Account restore (`POST`, form body).
	pub restore: String,
	/// Profile of the signed-in account (`GET`).
	pub profile: String,
}
impl Default for AuthEndpoints {
	fn default() -> Self {
		Self {
			login: "/api/auth/login".into(),
			refresh: "/api/auth/refresh".into(),
			logout: "/api/auth/logout".into(),
			signup: "/api/auth/signup".into(),
			restore: "/api/auth/restore".into(),
			profile: "/api/users/profile".into(),
		}
	}
}

/// Immutable configuration consumed by [`AuthClient`](crate::flows::AuthClient) and
/// [`ApiClient`](crate::api::ApiClient).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// API origin (plus optional path prefix). Always ends with `/`.
	pub base_url: Url,
	/// Authentication endpoint paths.
	pub endpoints: AuthEndpoints,
	/// Timeout applied to ordinary API calls.
	pub request_timeout: Option<Duration>,
	/// Timeout applied to the refresh call; an expired timeout fails every waiter.
	pub refresh_timeout: Option<Duration>,
}
impl ClientConfig {
	/// Creates a new builder for the provided base URL.
	pub fn builder(base_url: Url) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url)
	}

	/// Resolves `path` against the base URL, refusing anything that leaves its origin.
	pub fn resolve(&self, path: &str) -> Result<Url, ConfigError> {
		let url = self.base_url.join(path.trim_start_matches('/')).map_err(|source| {
			ConfigError::InvalidPath { path: path.to_owned(), source }
		})?;

		if url.origin() != self.base_url.origin() {
			return Err(ConfigError::ForeignOrigin { url: url.to_string() });
		}

		Ok(url)
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Base URL being validated.
	pub base_url: Url,
	/// Endpoint paths.
	pub endpoints: AuthEndpoints,
	/// Timeout for ordinary API calls.
	pub request_timeout: Option<Duration>,
	/// Timeout for the refresh call.
	pub refresh_timeout: Option<Duration>,
}
impl ClientConfigBuilder {
	const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::seconds(10);
	const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::seconds(30);

	/// Creates a new builder seeded with the base URL and default endpoints/timeouts.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			endpoints: AuthEndpoints::default(),
			request_timeout: Some(Self::DEFAULT_REQUEST_TIMEOUT),
			refresh_timeout: Some(Self::DEFAULT_REFRESH_TIMEOUT),
		}
	}

	/// Overrides the endpoint paths.
	pub fn endpoints(mut self, endpoints: AuthEndpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Overrides the API call timeout. Non-positive values disable it.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout.is_positive().then_some(timeout);

		self
	}

	/// Overrides the refresh timeout. Non-positive values disable it.
	pub fn refresh_timeout(mut self, timeout: Duration) -> Self {
		self.refresh_timeout = timeout.is_positive().then_some(timeout);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let mut base_url = self.base_url;

		validate_base_url(&base_url)?;

		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		base_url.set_query(None);
		base_url.set_fragment(None);

		Ok(ClientConfig {
			base_url,
			endpoints: self.endpoints,
			request_timeout: self.request_timeout,
			refresh_timeout: self.refresh_timeout,
		})
	}
}

fn validate_base_url(url: &Url) -> Result<(), ConfigError> {
	if url.cannot_be_a_base() {
		return Err(ConfigError::CannotBeABase { url: url.to_string() });
	}

	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(ConfigError::InsecureBaseUrl { url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host_str() {
		Some("localhost") => true,
		Some(host) => host
			.trim_start_matches('[')
			.trim_end_matches(']')
			.parse::<IpAddr>()
			.is_ok_and(|ip| ip.is_loopback()),
		None => false,
	}
}
