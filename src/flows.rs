//! Authentication lifecycle calls (login, refresh, logout, signup, restore).
//!
//! [`AuthClient`] issues the raw calls and never touches a [`Session`](crate::session::Session);
//! callers decide what to do with the returned tokens. The composition that stores tokens and
//! recovers from expiry lives in [`ApiClient`](crate::api::ApiClient).

pub mod common;
pub mod refresh;

mod account;
mod login;
mod logout;

pub use account::*;
pub use login::*;
pub use refresh::*;

// self
use crate::{_prelude::*, config::ClientConfig, transport::HttpTransport};
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, transport::ReqwestTransport};

#[cfg(feature = "reqwest")]
/// Auth client specialized for the crate's default reqwest transport.
pub type ReqwestAuthClient = AuthClient<ReqwestTransport>;

/// Issues the authentication-endpoint calls against one API origin.
///
/// Every call is credentialed: the transport's cookie jar carries the HTTP-only refresh cookie
/// set by login, which is the only way the refresh credential moves.
pub struct AuthClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Transport used for every outbound call.
	pub transport: Arc<C>,
	/// Validated API configuration.
	pub config: Arc<ClientConfig>,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
}
impl<C> AuthClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates an auth client that reuses the caller-provided transport.
	pub fn with_transport(config: impl Into<Arc<ClientConfig>>, transport: impl Into<Arc<C>>) -> Self {
		Self {
			transport: transport.into(),
			config: config.into(),
			refresh_metrics: Default::default(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl AuthClient<ReqwestTransport> {
	/// Creates an auth client backed by a cookie-enabled reqwest transport.
	pub fn new(config: impl Into<Arc<ClientConfig>>) -> Result<Self, ConfigError> {
		Ok(Self::with_transport(config, ReqwestTransport::new()?))
	}
}
impl<C> Clone for AuthClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			config: self.config.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
		}
	}
}
impl<C> Debug for AuthClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("refresh_metrics", &self.refresh_metrics)
			.finish()
	}
}
