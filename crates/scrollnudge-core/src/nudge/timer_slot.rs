//! The scheduler's one and only timer.
//!
//! Arming replaces whatever was pending, so there is never more than one
//! outstanding deadline. Every arm gets a fresh [`TimerId`]; a host that
//! fires an id the slot no longer holds is reporting a cancelled timer and
//! gets nothing back.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

/// What happens when the pending timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Randomized delay before the next nudge.
    Reappear,
    /// Display time of an auto-expiring nudge.
    Expire,
    /// Breathing interlude after the user accepted a nudge.
    Breather,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTimer {
    pub id: TimerId,
    pub kind: TimerKind,
    pub deadline_ms: u64,
}

impl PendingTimer {
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms >= self.deadline_ms
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimerSlot {
    pending: Option<PendingTimer>,
    next_id: u64,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a new timer, dropping any pending one.
    pub fn arm(&mut self, kind: TimerKind, deadline_ms: u64) -> PendingTimer {
        self.next_id += 1;
        let timer = PendingTimer {
            id: TimerId(self.next_id),
            kind,
            deadline_ms,
        };
        if let Some(replaced) = self.pending.replace(timer) {
            tracing::debug!(?replaced.kind, "replaced pending timer");
        }
        timer
    }

    pub fn cancel(&mut self) -> Option<PendingTimer> {
        self.pending.take()
    }

    /// Cancel only if the pending timer is of `kind`.
    pub fn cancel_kind(&mut self, kind: TimerKind) -> Option<PendingTimer> {
        if self.pending.is_some_and(|t| t.kind == kind) {
            return self.pending.take();
        }
        None
    }

    pub fn pending(&self) -> Option<PendingTimer> {
        self.pending
    }

    /// Claim the pending timer for firing if it is still `id`.
    pub fn claim(&mut self, id: TimerId) -> Option<PendingTimer> {
        if self.pending.is_some_and(|t| t.id == id) {
            return self.pending.take();
        }
        None
    }
}
