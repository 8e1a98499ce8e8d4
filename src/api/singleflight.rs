//! Single-flight coordination for token refreshes.
//!
//! A [`RefreshSlot`] holds at most one in-flight refresh. The first caller that finds the slot
//! empty starts the operation; every caller arriving before it settles receives a clone of the
//! same [`SharedRefresh`] and therefore the same outcome. The operation clears its own slot entry
//! once it resolves, so the next 401 after completion starts a fresh refresh.
//!
//! The slot keeps only a weak handle. If every waiter is dropped before the refresh resolves,
//! the operation is dropped with them and the slot reads as empty again.

// crates.io
use futures::future::{BoxFuture, FutureExt, Shared, WeakShared};
// self
use crate::{_prelude::*, auth::AccessToken, error::RefreshError};

/// Outcome fanned out to every waiter of one refresh.
pub type RefreshOutcome = std::result::Result<AccessToken, RefreshError>;
/// Cloneable handle to one in-flight refresh.
pub type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Handle returned by [`RefreshSlot::join_or_start`].
pub struct RefreshTicket {
	/// Operation to await.
	pub operation: SharedRefresh,
	/// `true` when this caller started the operation, `false` when it joined one in flight.
	pub started: bool,
}
impl Debug for RefreshTicket {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RefreshTicket").field("started", &self.started).finish()
	}
}

/// Holder for the single in-flight refresh of one client.
#[derive(Debug, Default)]
pub struct RefreshSlot {
	state: Arc<Mutex<SlotState>>,
}
impl RefreshSlot {
	/// Joins the refresh in flight or starts one built by `start`.
	///
	/// The check and the store happen under one lock acquisition, so two callers can never both
	/// observe an empty slot. `start` only builds the future; it runs once the ticket is awaited.
	pub fn join_or_start<F>(&self, start: F) -> RefreshTicket
	where
		F: FnOnce() -> BoxFuture<'static, RefreshOutcome>,
	{
		let mut state = self.state.lock();

		if let Some(operation) = state.live() {
			return RefreshTicket { operation, started: false };
		}

		let generation = state.next_generation;

		state.next_generation = state.next_generation.wrapping_add(1);

		let slot = Arc::downgrade(&self.state);
		let refresh = start();
		let operation = async move {
			let outcome = refresh.await;

			if let Some(state) = slot.upgrade() {
				state.lock().release(generation);
			}

			outcome
		}
		.boxed()
		.shared();

		state.in_flight =
			operation.downgrade().map(|operation| InFlight { generation, operation });

		RefreshTicket { operation, started: true }
	}

	/// Returns `true` while a refresh is running and at least one caller awaits it.
	pub fn is_in_flight(&self) -> bool {
		self.state.lock().live().is_some()
	}
}

#[derive(Default)]
struct SlotState {
	next_generation: u64,
	in_flight: Option<InFlight>,
}
impl SlotState {
	fn live(&self) -> Option<SharedRefresh> {
		self.in_flight.as_ref().and_then(|in_flight| in_flight.operation.upgrade())
	}

	fn release(&mut self, generation: u64) {
		if self.in_flight.as_ref().is_some_and(|in_flight| in_flight.generation == generation) {
			self.in_flight = None;
		}
	}
}
impl Debug for SlotState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SlotState")
			.field("next_generation", &self.next_generation)
			.field("in_flight", &self.in_flight.as_ref().map(|in_flight| in_flight.generation))
			.finish()
	}
}

struct InFlight {
	generation: u64,
	operation: WeakShared<BoxFuture<'static, RefreshOutcome>>,
}
