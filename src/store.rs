//! Optional durable persistence for the session's access token.
//!
//! Sessions are memory-only unless a [`TokenStore`] is attached through
//! [`Session::with_persistence`](crate::session::Session::with_persistence). Keeping bearer
//! tokens in durable storage exposes them to anything that can read that storage, so the
//! backends here are an explicit opt-in.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::AccessToken};

/// Storage backend contract implemented by token persistence layers.
///
/// Calls are synchronous because the session notifies subscribers synchronously.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Loads the persisted token, if any.
	fn load(&self) -> Result<Option<AccessToken>, StoreError>;

	/// Persists or replaces the token.
	fn save(&self, token: &AccessToken) -> Result<(), StoreError>;

	/// Removes the persisted token. Removing a missing token succeeds.
	fn remove(&self) -> Result<(), StoreError>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn store_error_messages_carry_the_payload() {
		let err = StoreError::Backend { message: "disk full".into() };

		assert_eq!(err.to_string(), "Backend failure: disk full.");

		let payload =
			serde_json::to_string(&err).expect("StoreError should serialize to JSON.");

		assert!(payload.contains("disk full"));
	}
}
