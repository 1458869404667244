//! Resize debouncing with an injected clock.
//!
//! A burst of resize notifications collapses into one recompute once the
//! surface has been quiet for the configured period. Times are milliseconds
//! from any monotonic-enough source (`Date.now()` in the browser).

#[cfg(test)]
#[path = "settle_test.rs"]
mod settle_test;

use crate::consts::RESIZE_SETTLE_MS;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pending {
    width: f64,
    height: f64,
    due_at: f64,
}

/// Result of polling a [`ResizeSettle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Settle {
    /// No resize is pending.
    Idle,
    /// A resize is pending; poll again after this many milliseconds.
    Wait(f64),
    /// The surface settled at this size.
    Ready { width: f64, height: f64 },
}

/// Debounce state for surface resizes.
#[derive(Debug, Clone)]
pub struct ResizeSettle {
    quiet_ms: f64,
    pending: Option<Pending>,
}

impl Default for ResizeSettle {
    fn default() -> Self {
        Self::new(RESIZE_SETTLE_MS)
    }
}

impl ResizeSettle {
    #[must_use]
    pub fn new(quiet_ms: f64) -> Self {
        Self { quiet_ms, pending: None }
    }

    /// Record a resize notification at `now`, pushing the deadline out.
    pub fn note(&mut self, width: f64, height: f64, now: f64) {
        self.pending = Some(Pending { width, height, due_at: now + self.quiet_ms });
    }

    /// Check the pending resize against `now`, consuming it once it is due.
    pub fn poll(&mut self, now: f64) -> Settle {
        match self.pending {
            None => Settle::Idle,
            Some(p) if now >= p.due_at => {
                self.pending = None;
                Settle::Ready { width: p.width, height: p.height }
            }
            Some(p) => Settle::Wait(p.due_at - now),
        }
    }

    /// Take the pending size regardless of the deadline.
    pub fn flush(&mut self) -> Option<(f64, f64)> {
        self.pending.take().map(|p| (p.width, p.height))
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
