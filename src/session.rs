//! Injectable access-token holder with synchronous change notification.
//!
//! A [`Session`] is owned by the composition root and shared (behind [`Arc`]) with the
//! [`ApiClient`](crate::api::ApiClient) and any view-layer code that needs to react to forced
//! logouts. Several sessions may coexist in one process, which keeps tests isolated.

// std
use std::sync::{
	Weak,
	atomic::{AtomicU64, Ordering},
};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Role},
	obs::{self, FlowKind},
	store::TokenStore,
};

type Listener = Arc<dyn Fn(SessionChange) + Send + Sync>;
type ListenerMap = Mutex<BTreeMap<u64, Listener>>;

/// Kind of mutation delivered to subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionChange {
	/// A token was stored through [`Session::set`].
	TokenSet,
	/// The token was removed through [`Session::clear`].
	Cleared,
}

/// Holder of the current access token.
///
/// Every [`set`](Session::set) and [`clear`](Session::clear) notifies all subscribers exactly
/// once, synchronously, even when the stored value does not change. Listeners run after the
/// internal locks are released, so they may read the session again.
pub struct Session {
	token: RwLock<Option<AccessToken>>,
	// Bumped by every clear while the token write lock is held.
	epoch: AtomicU64,
	listeners: Arc<ListenerMap>,
	next_listener: AtomicU64,
	persistence: Option<Arc<dyn TokenStore>>,
}
impl Session {
	/// Creates an empty, memory-only session.
	pub fn new() -> Self {
		Self {
			token: RwLock::new(None),
			epoch: AtomicU64::new(0),
			listeners: Default::default(),
			next_listener: AtomicU64::new(0),
			persistence: None,
		}
	}

	/// Creates a session that writes through to `store` and starts from its persisted token.
	///
	/// Persisting bearer tokens outside process memory widens their exposure; only opt in when
	/// surviving restarts is worth that trade.
	pub fn with_persistence(store: Arc<dyn TokenStore>) -> Self {
		let initial = match store.load() {
			Ok(token) => token,
			Err(e) => {
				obs::log_swallowed(FlowKind::Session, "load_persisted_token", &e);

				None
			},
		};

		Self {
			token: RwLock::new(initial),
			epoch: AtomicU64::new(0),
			listeners: Default::default(),
			next_listener: AtomicU64::new(0),
			persistence: Some(store),
		}
	}

	/// Returns the current token, if any.
	pub fn get(&self) -> Option<AccessToken> {
		self.token.read().clone()
	}

	/// Returns `true` when a token is present.
	pub fn is_authenticated(&self) -> bool {
		self.token.read().is_some()
	}

	/// Number of [`clear`](Session::clear) calls so far.
	///
	/// Work that may outlive a logout captures the epoch first and hands it to
	/// [`set_unless_cleared`](Session::set_unless_cleared).
	pub fn epoch(&self) -> u64 {
		self.epoch.load(Ordering::SeqCst)
	}

	/// Replaces the current token and notifies subscribers.
	pub fn set(&self, token: AccessToken) {
		self.replace(Some(token), |_, _| true);
	}

	/// Stores `token` only if the session was not cleared since `epoch` was read.
	///
	/// Returns `false`, without notifying anyone, when a clear got in between.
	pub fn set_unless_cleared(&self, token: AccessToken, epoch: u64) -> bool {
		self.replace(Some(token), |_, current_epoch| current_epoch == epoch)
	}

	/// Removes the current token and notifies subscribers.
	pub fn clear(&self) {
		self.replace(None, |_, _| true);
	}

	/// Clears the session only while it still holds `expected`.
	///
	/// A token stored by someone else in the meantime (a new login, say) is left alone, and
	/// `false` is returned without notifying anyone.
	pub fn clear_if_current(&self, expected: Option<&AccessToken>) -> bool {
		self.replace(None, |current, _| current.as_ref() == expected)
	}

	/// Registers `listener` for every subsequent [`set`](Session::set) and
	/// [`clear`](Session::clear).
	pub fn subscribe<F>(&self, listener: F) -> Subscription
	where
		F: 'static + Fn(SessionChange) + Send + Sync,
	{
		let id = self.next_listener.fetch_add(1, Ordering::Relaxed);

		self.listeners.lock().insert(id, Arc::new(listener));

		Subscription { id, listeners: Arc::downgrade(&self.listeners) }
	}

	/// Number of live subscriptions.
	pub fn subscriber_count(&self) -> usize {
		self.listeners.lock().len()
	}

	/// Role decoded from the token payload.
	///
	/// Advisory only: the server may have changed the role since the token was minted. Use
	/// [`guard::require_role`](crate::guard::require_role) for real gating.
	pub fn role_hint(&self) -> Option<Role> {
		self.token.read().as_ref().and_then(AccessToken::claims).and_then(|claims| claims.role)
	}

	fn replace<F>(&self, token: Option<AccessToken>, admit: F) -> bool
	where
		F: FnOnce(&Option<AccessToken>, u64) -> bool,
	{
		let change = {
			let mut current = self.token.write();

			if !admit(&*current, self.epoch.load(Ordering::SeqCst)) {
				return false;
			}
			if let Some(store) = &self.persistence {
				let (persisted, stage) = match &token {
					Some(token) => (store.save(token), "persist_token"),
					None => (store.remove(), "remove_persisted_token"),
				};

				if let Err(e) = persisted {
					obs::log_swallowed(FlowKind::Session, stage, &e);
				}
			}

			let change = match token {
				Some(_) => SessionChange::TokenSet,
				None => {
					self.epoch.fetch_add(1, Ordering::SeqCst);

					SessionChange::Cleared
				},
			};

			*current = token;

			change
		};

		self.emit(change);

		true
	}

	fn emit(&self, change: SessionChange) {
		let listeners = self.listeners.lock().values().cloned().collect::<Vec<_>>();

		for listener in listeners {
			listener(change);
		}
	}
}
impl Default for Session {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("authenticated", &self.is_authenticated())
			.field("subscribers", &self.subscriber_count())
			.field("persistent", &self.persistence.is_some())
			.finish()
	}
}

/// Handle returned by [`Session::subscribe`].
///
/// Dropping the handle keeps the listener registered; call
/// [`unsubscribe`](Subscription::unsubscribe) to remove it.
#[derive(Debug)]
pub struct Subscription {
	id: u64,
	listeners: Weak<ListenerMap>,
}
impl Subscription {
	/// Removes the listener. Returns `false` if it was already gone or the session was dropped.
	pub fn unsubscribe(self) -> bool {
		match self.listeners.upgrade() {
			Some(listeners) => listeners.lock().remove(&self.id).is_some(),
			None => false,
		}
	}
}
