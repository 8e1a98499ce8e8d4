//! Redacted access-token wrapper plus a best-effort, non-authoritative claims decoder.

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, auth::Role};

/// Short-lived bearer credential authorizing API calls.
///
/// `Debug` and `Display` redact the value so tokens stay out of logs; use
/// [`AccessToken::fingerprint`] when a correlation handle is needed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken(String);
impl AccessToken {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Renders the `Authorization` header value for this token.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.0)
	}

	/// Returns a short, stable SHA-256 prefix that identifies the token without revealing it.
	pub fn fingerprint(&self) -> String {
		let digest = Sha256::digest(self.0.as_bytes());

		digest.iter().take(6).map(|byte| format!("{byte:02x}")).collect()
	}

	/// Decodes the JWT payload segment, if the token is a JWT.
	///
	/// The result is an unverified hint for UI decisions only. Access control must be decided
	/// by the server, e.g. through the profile endpoint.
	pub fn claims(&self) -> Option<TokenClaims> {
		let payload = self.0.split('.').nth(1)?;
		let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;

		serde_json::from_slice(&bytes).ok()
	}
}
impl AsRef<str> for AccessToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AccessToken").field(&"<redacted>").finish()
	}
}
impl Display for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Unverified JWT payload fields the client understands.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
	/// Subject, typically the account email.
	#[serde(default)]
	pub sub: Option<String>,
	/// Role claim, when the issuer embeds one.
	#[serde(default, deserialize_with = "lenient_role")]
	pub role: Option<Role>,
	/// Expiry instant.
	#[serde(default, with = "time::serde::timestamp::option")]
	pub exp: Option<OffsetDateTime>,
}
impl TokenClaims {
	/// Returns `true` when the embedded expiry lies at or before `now`.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		self.exp.is_some_and(|exp| exp <= now)
	}
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let raw = <Option<String>>::deserialize(deserializer)?;

	Ok(raw.and_then(|value| value.parse().ok()))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn jwt(payload: &str) -> AccessToken {
		let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
		let body = URL_SAFE_NO_PAD.encode(payload);

		AccessToken::new(format!("{header}.{body}.signature"))
	}

	#[test]
	fn token_formatters_redact() {
		let token = AccessToken::new("super-secret");

		assert_eq!(format!("{token:?}"), "AccessToken(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
		assert_eq!(token.bearer(), "Bearer super-secret");
	}

	#[test]
	fn fingerprint_is_stable_and_opaque() {
		let a = AccessToken::new("T1");
		let b = AccessToken::new("T2");

		assert_eq!(a.fingerprint(), AccessToken::new("T1").fingerprint());
		assert_ne!(a.fingerprint(), b.fingerprint());
		assert_eq!(a.fingerprint().len(), 12);
		assert!(!a.fingerprint().contains("T1"));
	}

	#[test]
	fn claims_decode_role_and_expiry() {
		let token = jwt(r#"{"sub":"a@b.com","role":"ROLE_ADMIN","exp":1700000000}"#);
		let claims = token.claims().expect("JWT payload fixture should decode.");

		assert_eq!(claims.sub.as_deref(), Some("a@b.com"));
		assert_eq!(claims.role, Some(Role::Admin));
		assert!(claims.is_expired_at(time::macros::datetime!(2024-01-01 00:00 UTC)));
		assert!(!claims.is_expired_at(time::macros::datetime!(2023-01-01 00:00 UTC)));
	}

	#[test]
	fn opaque_tokens_have_no_claims() {
		assert!(AccessToken::new("T1").claims().is_none());
		assert!(AccessToken::new("a.%%%.c").claims().is_none());

		let unknown_role = jwt(r#"{"sub":"x","role":"PILOT"}"#)
			.claims()
			.expect("Unknown roles should not break claim decoding.");

		assert_eq!(unknown_role.role, None);
	}
}
