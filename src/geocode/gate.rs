//! Latest-query-wins guard for overlapping lookups.

use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket handed out for one lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Issues monotonically increasing tickets; only the newest one is current.
///
/// A lookup that resolves after a newer one was issued is stale and its
/// results must be discarded, whatever order the responses arrive in.
#[derive(Debug, Default)]
pub struct QueryGate {
    latest: AtomicU64,
}

impl QueryGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new lookup, superseding all earlier ones.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the most recently issued one.
    #[must_use]
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
