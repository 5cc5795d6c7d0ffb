//! Request ordering for state containers.
//!
//! Each container owns one [`RequestSequence`]. Starting a transition takes a
//! [`Ticket`] with the next sequence number and cancels the ticket of the
//! transition before it. A result is applied only if its ticket is still live
//! and newer than the last applied one, so a slow response can never
//! overwrite state written by a later call.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// Whether a transition's result reached the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The server response replaced the container's state.
    Applied,
    /// A newer transition started (or the view dropped interest) before this
    /// one finished; its result was discarded.
    Superseded,
}

impl Outcome {
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Handle for one in-flight transition.
#[derive(Debug)]
pub struct Ticket {
    seq: u64,
    token: CancellationToken,
}

impl Ticket {
    /// Sequence number, increasing per container.
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    /// Resolves when a newer transition starts or the pending call is
    /// cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug)]
struct Slots {
    last_applied: u64,
    current: CancellationToken,
}

/// Monotonic sequence guard with per-request cancellation.
#[derive(Debug)]
pub struct RequestSequence {
    next: AtomicU64,
    slots: Mutex<Slots>,
}

impl Default for RequestSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestSequence {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
            slots: Mutex::new(Slots {
                last_applied: 0,
                current: CancellationToken::new(),
            }),
        }
    }

    /// Start a transition, superseding whichever one is in flight.
    pub fn begin(&self) -> Ticket {
        let seq = self.next.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        let previous = {
            let mut slots = self.slots.lock();
            std::mem::replace(&mut slots.current, token.clone())
        };
        previous.cancel();
        Ticket { seq, token }
    }

    /// Claim the right to write the result of `ticket`.
    ///
    /// Returns `false` for cancelled tickets and for tickets older than the
    /// last accepted one. Call while holding the container's state lock.
    pub fn accept(&self, ticket: &Ticket) -> bool {
        if ticket.is_cancelled() {
            return false;
        }
        let mut slots = self.slots.lock();
        if ticket.seq <= slots.last_applied {
            return false;
        }
        slots.last_applied = ticket.seq;
        true
    }

    /// Cancel the in-flight transition, if any.
    pub fn cancel_pending(&self) {
        self.slots.lock().current.cancel();
    }

    /// Sequence number of the last applied result (0 before any).
    #[must_use]
    pub fn last_applied(&self) -> u64 {
        self.slots.lock().last_applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_are_monotonic() {
        let sequence = RequestSequence::new();
        let a = sequence.begin();
        let b = sequence.begin();
        assert!(b.seq() > a.seq());
    }

    #[test]
    fn test_begin_cancels_previous() {
        let sequence = RequestSequence::new();
        let first = sequence.begin();
        assert!(!first.is_cancelled());
        let second = sequence.begin();
        assert!(first.is_cancelled());
        assert!(!sequence.accept(&first));
        assert!(sequence.accept(&second));
        assert_eq!(sequence.last_applied(), second.seq());
    }

    #[test]
    fn test_stale_ticket_rejected_even_if_live() {
        let sequence = RequestSequence::new();
        // Two tickets alive at once only happens if the cancel raced; the
        // sequence number still decides.
        let older = Ticket {
            seq: 1,
            token: CancellationToken::new(),
        };
        let newer = Ticket {
            seq: 2,
            token: CancellationToken::new(),
        };
        assert!(sequence.accept(&newer));
        assert!(!sequence.accept(&older));
    }

    #[test]
    fn test_cancel_pending() {
        let sequence = RequestSequence::new();
        let ticket = sequence.begin();
        sequence.cancel_pending();
        assert!(ticket.is_cancelled());
        assert!(!sequence.accept(&ticket));
        assert_eq!(sequence.last_applied(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_future_resolves_on_supersede() {
        let sequence = RequestSequence::new();
        let first = sequence.begin();
        let _second = sequence.begin();
        tokio::time::timeout(std::time::Duration::from_secs(1), first.cancelled())
            .await
            .expect("superseded ticket should resolve");
    }
}
