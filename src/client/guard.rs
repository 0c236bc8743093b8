use std::sync::atomic::{AtomicU64, Ordering};

/// Guard against stale async responses. Each new request for a
/// resource takes a ticket; when the response arrives, the result is
/// applied only if its ticket is still the most recently issued one.
/// Superseded responses are discarded on arrival rather than aborted
/// in flight.
#[derive(Debug, Default)]
pub struct RequestGuard {
    latest: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request, superseding all previous ones.
    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether the given ticket still represents the latest request.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
