//! Transport primitives for API calls.
//!
//! The module exposes [`HttpTransport`] alongside the caller-facing [`ApiRequest`] and
//! [`ApiResponse`] so downstream crates can plug in custom HTTP stacks (or scripted fakes in
//! tests) without touching the session logic. Transports receive a fully resolved
//! [`PreparedRequest`]: URL joined onto the configured origin, bearer header already merged,
//! timeout already chosen.
//!
//! Transports own the refresh-cookie contract. The server delivers the refresh credential as an
//! HTTP-only cookie, so a transport must keep a cookie jar and send those cookies back on every
//! call; client code never reads or writes that credential.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
use std::time::Duration as StdDuration;
// crates.io
use http::{
	HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	config::ClientConfig,
	error::{ConfigError, DecodeError, TransportError},
};

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing API calls.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by the auth
/// client, the authenticated fetch, and the detached refresh operation, and the futures they
/// return must be `Send` so callers may spawn API calls onto multi-threaded executors.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and buffers the full response.
	///
	/// Only connectivity failures are errors; every HTTP status, including 4xx/5xx, must come
	/// back as an [`ApiResponse`].
	fn execute(&self, request: PreparedRequest) -> TransportFuture<'_>;
}

/// Fully resolved request handed to an [`HttpTransport`].
#[derive(Clone, Debug)]
pub struct PreparedRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute URL inside the configured origin.
	pub url: Url,
	/// Final header set, including `Authorization` when a token was attached.
	pub headers: HeaderMap,
	/// Optional request body.
	pub body: Option<Vec<u8>>,
	/// Timeout the transport should enforce.
	pub timeout: Option<StdDuration>,
}
impl PreparedRequest {
	/// Returns the bearer token carried by the request, if any.
	pub fn bearer_token(&self) -> Option<&str> {
		self.headers.get(AUTHORIZATION)?.to_str().ok()?.strip_prefix("Bearer ")
	}
}

/// Caller-facing description of one logical API call.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Path (and optional query) relative to the base URL.
	pub path: String,
	/// Caller-supplied headers. A bearer token, when present, replaces any `Authorization`.
	pub headers: HeaderMap,
	/// Optional request body.
	pub body: Option<Vec<u8>>,
	/// Per-request timeout overriding the configured default.
	pub timeout: Option<Duration>,
}
impl ApiRequest {
	/// Creates a request without headers or body.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self { method, path: path.into(), headers: HeaderMap::new(), body: None, timeout: None }
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// Shorthand for a `PUT` request.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::PUT, path)
	}

	/// Shorthand for a `PATCH` request.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::PATCH, path)
	}

	/// Shorthand for a `DELETE` request.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, path)
	}

	/// Adds or replaces a header.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Adds or replaces a header from raw strings.
	pub fn try_header(self, name: &str, value: &str) -> Result<Self, ConfigError> {
		let name = HeaderName::from_bytes(name.as_bytes())?;
		let value = HeaderValue::from_str(value)?;

		Ok(self.header(name, value))
	}

	/// Serializes `payload` as the JSON body.
	pub fn json<T>(mut self, payload: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_vec(payload)?);
		self.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

		Ok(self)
	}

	/// Encodes `pairs` as an `application/x-www-form-urlencoded` body.
	pub fn form<I, K, V>(mut self, pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let encoded = url::form_urlencoded::Serializer::new(String::new())
			.extend_pairs(pairs)
			.finish();

		self.body = Some(encoded.into_bytes());
		self.headers
			.insert(CONTENT_TYPE, HeaderValue::from_static("application/x-www-form-urlencoded"));

		self
	}

	/// Overrides the timeout for this request.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Resolves the request against `config` and attaches `token` as a bearer credential.
	pub fn prepare(
		&self,
		config: &ClientConfig,
		token: Option<&AccessToken>,
	) -> Result<PreparedRequest, ConfigError> {
		let url = config.resolve(&self.path)?;
		let mut headers = self.headers.clone();

		if let Some(token) = token {
			let mut value = HeaderValue::from_str(&token.bearer())?;

			value.set_sensitive(true);
			headers.insert(AUTHORIZATION, value);
		}

		let timeout = self
			.timeout
			.or(config.request_timeout)
			.filter(|timeout| timeout.is_positive())
			.map(|timeout| timeout.unsigned_abs());

		Ok(PreparedRequest {
			method: self.method.clone(),
			url,
			headers,
			body: self.body.clone(),
			timeout,
		})
	}
}

/// Buffered HTTP response returned to callers unchanged (apart from the 401 recovery path).
#[derive(Clone, Debug)]
pub struct ApiResponse {
	status: StatusCode,
	headers: HeaderMap,
	body: Vec<u8>,
}
impl ApiResponse {
	/// Builds a response from its parts; used by transports.
	pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers, body: body.into() }
	}

	/// HTTP status.
	pub fn status(&self) -> StatusCode {
		self.status
	}

	/// Response headers.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Raw body bytes.
	pub fn body(&self) -> &[u8] {
		&self.body
	}

	/// Consumes the response, returning the raw body.
	pub fn into_body(self) -> Vec<u8> {
		self.body
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decodes the body as JSON, reporting the failing path on error.
	pub fn json<T>(&self) -> Result<T, DecodeError>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| DecodeError::Json { status: self.status.as_u16(), source })
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// [`ReqwestTransport::new`] enables reqwest's cookie store, which is how the refresh cookie
/// set by the login endpoint travels back to the refresh and logout endpoints. Clients passed to
/// [`ReqwestTransport::with_client`] must enable it too, or refreshes will always fail.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with a cookie jar and redirect following disabled.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.cookie_store(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute(&self, request: PreparedRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder =
				client.request(request.method, request.url).headers(request.headers);

			if let Some(body) = request.body {
				builder = builder.body(body);
			}
			if let Some(timeout) = request.timeout {
				builder = builder.timeout(timeout);
			}

			let response = builder.send().await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await?;

			Ok(ApiResponse::new(status, headers, body.to_vec()))
		})
	}
}
