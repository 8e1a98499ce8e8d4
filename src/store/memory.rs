//! Thread-safe in-memory [`TokenStore`] that outlives individual sessions; handy for tests and
//! for simulating a restart without touching the filesystem.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	store::{StoreError, TokenStore},
};

/// Storage backend that keeps the token in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<Option<AccessToken>>>);
impl TokenStore for MemoryStore {
	fn load(&self) -> Result<Option<AccessToken>, StoreError> {
		Ok(self.0.read().clone())
	}

	fn save(&self, token: &AccessToken) -> Result<(), StoreError> {
		*self.0.write() = Some(token.clone());

		Ok(())
	}

	fn remove(&self) -> Result<(), StoreError> {
		self.0.write().take();

		Ok(())
	}
}
