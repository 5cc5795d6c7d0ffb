//! Per-session state containers.
//!
//! Each container caches the latest server response for one domain and
//! exposes named transitions. A transition makes one API call; on success
//! the server's response replaces the relevant state, on failure the prior
//! state is kept and a human-readable message is stored in `error`.
//!
//! State sits behind a `parking_lot::RwLock` that is never held across an
//! await.

mod auth;
mod cart;
mod catalog;
mod sequence;

use std::future::Future;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::ApiError;

pub use auth::{AuthState, AuthStore};
pub use cart::{CartState, CartStore};
pub use catalog::{CatalogState, CatalogStore};
pub use sequence::{Outcome, RequestSequence, Ticket};

/// Loading and error bookkeeping shared by every container state.
///
/// Single-domain states use the provided methods. A state with independent
/// slices overrides `begin`, `end` and `settle` so one slice's result never
/// overwrites another's.
pub(crate) trait Tracked {
    fn set_loading(&mut self, loading: bool);
    fn set_error(&mut self, error: Option<String>);

    /// A transition on `slice` was issued.
    fn begin(&mut self, _slice: &'static str) {
        self.set_loading(true);
    }

    /// A transition on `slice` finished, whether applied or superseded.
    fn end(&mut self, _slice: &'static str) {}

    /// The accepted result of `slice`: `None` on success, else the message.
    fn settle(&mut self, _slice: &'static str, error: Option<String>) {
        self.set_loading(false);
        self.set_error(error);
    }
}

/// Ends its slice when dropped, so a transition whose future is dropped
/// mid-flight does not stay loading.
struct InFlight<'a, S: Tracked> {
    state: &'a RwLock<S>,
    slice: &'static str,
}

impl<'a, S: Tracked> InFlight<'a, S> {
    fn begin(state: &'a RwLock<S>, slice: &'static str) -> Self {
        state.write().begin(slice);
        Self { state, slice }
    }
}

impl<S: Tracked> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        self.state.write().end(self.slice);
    }
}

/// Run one guarded transition.
///
/// `apply` runs under the state lock only if the ticket is still current.
/// `slice` names the part of the state the call refreshes.
/// A failure records `err.user_message(fallback)` in the state and is
/// returned to the caller.
pub(crate) async fn transition<S, T, F, A>(
    state: &RwLock<S>,
    sequence: &RequestSequence,
    slice: &'static str,
    fallback: &str,
    call: F,
    apply: A,
) -> Result<Outcome, ApiError>
where
    S: Tracked,
    F: Future<Output = Result<T, ApiError>>,
    A: FnOnce(&mut S, T),
{
    let ticket = sequence.begin();
    let _in_flight = InFlight::begin(state, slice);

    let result = tokio::select! {
        biased;
        () = ticket.cancelled() => {
            debug!(seq = ticket.seq(), slice, "Transition superseded in flight");
            return Ok(Outcome::Superseded);
        }
        result = call => result,
    };

    // The write guard must be released before `_in_flight` drops
    let mut guard = state.write();
    if !sequence.accept(&ticket) {
        debug!(seq = ticket.seq(), slice, "Discarding stale response");
        return Ok(Outcome::Superseded);
    }

    let outcome = match result {
        Ok(value) => {
            apply(&mut guard, value);
            guard.settle(slice, None);
            Ok(Outcome::Applied)
        }
        Err(err) => {
            warn!(error = %err, slice, "{fallback}");
            guard.settle(slice, Some(err.user_message(fallback)));
            Err(err)
        }
    };
    drop(guard);
    outcome
}

/// Record a locally rejected input without issuing a request.
pub(crate) fn reject<S: Tracked>(state: &RwLock<S>, message: &str) -> ApiError {
    state.write().set_error(Some(message.to_string()));
    ApiError::invalid(message)
}

/// The cart, catalog and auth containers of one browser session.
#[derive(Debug, Default)]
pub struct SessionStores {
    pub cart: CartStore,
    pub catalog: CatalogStore,
    pub auth: AuthStore,
}

impl SessionStores {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything cached for the session, e.g. on logout.
    pub fn reset(&self) {
        self.cart.reset();
        self.auth.logout();
    }
}
