//! Per-call cancellation and deadline token.
//!
//! Each operation takes a `Context` by reference and passes it to the
//! executor, which must honor it: once the deadline passes, the call fails
//! with a cancellation transport error instead of hanging. Operations hold no
//! other cross-call state, so a `Context` governs exactly one round trip.

use std::time::{Duration, Instant};

/// Cancellation/deadline token threaded through every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context {
    deadline: Option<Instant>,
}

impl Context {
    /// A context that never expires.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline. `None` when there is no deadline;
    /// `Some(Duration::ZERO)` once expired.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.deadline, Some(d) if d <= Instant::now())
    }
}
