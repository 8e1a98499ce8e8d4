//! Route guards deciding whether a view may be shown.
//!
//! Token presence is checked locally. Role checks always ask the server: the role embedded in
//! the token may be stale, so [`Session::role_hint`] never grants access.

// self
use crate::{_prelude::*, api::ApiClient, auth::Role, session::Session, transport::HttpTransport};

/// Outcome of a guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GuardDecision {
	/// Render the protected view.
	Allow,
	/// No usable session; send the user to the login view.
	RedirectToLogin,
	/// Signed in, but the account lacks the required role.
	Forbidden,
}
impl GuardDecision {
	/// Returns `true` for [`GuardDecision::Allow`].
	pub fn is_allowed(self) -> bool {
		matches!(self, Self::Allow)
	}
}

/// Allows the view when the session holds a token.
pub fn require_auth(session: &Session) -> GuardDecision {
	if session.is_authenticated() { GuardDecision::Allow } else { GuardDecision::RedirectToLogin }
}

/// Allows the view when the server-reported role satisfies `required`.
///
/// Without a token no request is made. An expired session redirects to login, a `403` from the
/// profile endpoint is treated as forbidden, and any other failure is returned to the caller.
pub async fn require_role<C>(client: &ApiClient<C>, required: Role) -> Result<GuardDecision>
where
	C: ?Sized + HttpTransport,
{
	if require_auth(client.session()) == GuardDecision::RedirectToLogin {
		return Ok(GuardDecision::RedirectToLogin);
	}

	match client.profile().await {
		Ok(profile) if profile.effective_role().satisfies(required) => Ok(GuardDecision::Allow),
		Ok(_) => Ok(GuardDecision::Forbidden),
		Err(Error::SessionExpired { .. }) => Ok(GuardDecision::RedirectToLogin),
		Err(Error::Rejected { status: 403, .. }) => Ok(GuardDecision::Forbidden),
		Err(e) => Err(e),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::AccessToken;

	#[test]
	fn require_auth_follows_token_presence() {
		let session = Session::new();

		assert_eq!(require_auth(&session), GuardDecision::RedirectToLogin);

		session.set(AccessToken::new("T1"));

		assert!(require_auth(&session).is_allowed());

		session.clear();

		assert_eq!(require_auth(&session), GuardDecision::RedirectToLogin);
	}
}
