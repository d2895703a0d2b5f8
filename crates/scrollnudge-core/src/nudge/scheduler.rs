//! Nudge scheduler.
//!
//! A wall-clock state machine deciding when an engagement nudge is shown.
//! Like the rest of the core it has no threads: the single pending timer is
//! a deadline in a [`TimerSlot`], and the host calls [`NudgeScheduler::poll`]
//! (or [`NudgeScheduler::fire`] with the timer id) once the deadline passes.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Armed -> Visible -> Cooldown -> Idle -> Armed ...
//!           ^ randomized timer, forced index or manual request
//! ```
//!
//! `Cooldown` is instantaneous after a dismissal or an expiry. After the
//! user accepts a nudge it lasts for the breather duration. Teardown
//! returns to `Idle` from anywhere and silences the scheduler for good.

use chrono::Utc;
use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::messages::MessagePool;
use super::timer_slot::{PendingTimer, TimerId, TimerKind, TimerSlot};
use crate::clock::Clock;
use crate::config::{DisplayStyle, FeedConfig};
use crate::error::ConfigError;
use crate::events::{FeedEvent, HideReason, NudgeTrigger};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NudgePhase {
    Idle,
    Armed,
    Visible,
    Cooldown,
}

/// Snapshot of the scheduler's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NudgeState {
    pub phase: NudgePhase,
    /// Pool index of the next message to show.
    pub current_message_index: usize,
    pub pending_timer: Option<PendingTimer>,
    pub has_fired_forced_trigger: bool,
}

pub struct NudgeScheduler<C: Clock> {
    clock: C,
    rng: Mcg128Xsl64,
    min_delay_ms: u64,
    max_delay_ms: u64,
    toast_duration_ms: u64,
    breather_duration_ms: u64,
    forced_trigger_index: usize,
    display_style: DisplayStyle,
    phase: NudgePhase,
    pool: MessagePool,
    timer: TimerSlot,
    has_fired_forced_trigger: bool,
    /// Cleared on teardown. Nothing is emitted afterwards.
    live: bool,
}

impl<C: Clock> NudgeScheduler<C> {
    /// Create a scheduler in `Idle`. Call [`NudgeScheduler::start`] to arm it.
    pub fn new(config: &FeedConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Ok(Self {
            clock,
            rng,
            min_delay_ms: config.min_delay_ms(),
            max_delay_ms: config.max_delay_ms(),
            toast_duration_ms: config.toast_duration_ms(),
            breather_duration_ms: config.breather_duration_ms(),
            forced_trigger_index: config.forced_trigger_index,
            display_style: config.display_style,
            phase: NudgePhase::Idle,
            pool: MessagePool::new(config.messages.clone())?,
            timer: TimerSlot::new(),
            has_fired_forced_trigger: false,
            live: true,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> NudgePhase {
        self.phase
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn display_style(&self) -> DisplayStyle {
        self.display_style
    }

    pub fn has_fired_forced_trigger(&self) -> bool {
        self.has_fired_forced_trigger
    }

    pub fn pending_timer(&self) -> Option<PendingTimer> {
        self.timer.pending()
    }

    /// Deadline of the pending timer, in clock milliseconds.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timer.pending().map(|t| t.deadline_ms)
    }

    pub fn state(&self) -> NudgeState {
        NudgeState {
            phase: self.phase,
            current_message_index: self.pool.next_index(),
            pending_timer: self.timer.pending(),
            has_fired_forced_trigger: self.has_fired_forced_trigger,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// `Idle -> Armed`. No-op once started or after teardown.
    pub fn start(&mut self) -> Vec<FeedEvent> {
        if !self.live || self.phase != NudgePhase::Idle {
            return Vec::new();
        }
        vec![self.arm_reappear()]
    }

    /// React to the tracker's active-item change.
    ///
    /// Fires the forced nudge the first time `index` matches the forced
    /// trigger while `Armed`. Reaching it in any other phase is ignored and
    /// does not use up the trigger.
    pub fn on_active_item_changed(&mut self, index: usize) -> Vec<FeedEvent> {
        if !self.live || index != self.forced_trigger_index || self.has_fired_forced_trigger {
            return Vec::new();
        }
        if self.phase != NudgePhase::Armed {
            debug!(index, phase = ?self.phase, "forced trigger index reached while busy; ignored");
            return Vec::new();
        }
        self.has_fired_forced_trigger = true;
        self.timer.cancel_kind(TimerKind::Reappear);
        vec![self.show(NudgeTrigger::ForcedIndex)]
    }

    /// The user tapped the assistant indicator. Only honoured while `Armed`.
    pub fn request(&mut self) -> Vec<FeedEvent> {
        if !self.live || self.phase != NudgePhase::Armed {
            return Vec::new();
        }
        self.timer.cancel_kind(TimerKind::Reappear);
        vec![self.show(NudgeTrigger::Manual)]
    }

    /// "Not now": hide and re-arm with a fresh random delay.
    pub fn dismiss(&mut self) -> Vec<FeedEvent> {
        if !self.live || self.phase != NudgePhase::Visible {
            return Vec::new();
        }
        let mut events = vec![self.hide(HideReason::Dismissed)];
        events.push(self.finish_cooldown());
        events
    }

    /// "Good idea": hide, then hold `Cooldown` for the breather before
    /// re-arming.
    pub fn acknowledge(&mut self) -> Vec<FeedEvent> {
        if !self.live || self.phase != NudgePhase::Visible {
            return Vec::new();
        }
        let mut events = vec![self.hide(HideReason::Acknowledged)];
        if self.breather_duration_ms == 0 {
            events.push(self.finish_cooldown());
            return events;
        }
        let deadline = self.clock.now_ms().saturating_add(self.breather_duration_ms);
        self.timer.arm(TimerKind::Breather, deadline);
        events.push(FeedEvent::BreatherStarted {
            duration_ms: self.breather_duration_ms,
            at: Utc::now(),
        });
        events
    }

    /// Switch presentation style. A visible nudge picks up or drops its
    /// expiry timer to match the new style.
    pub fn set_display_style(&mut self, style: DisplayStyle) {
        if style == self.display_style {
            return;
        }
        debug!(from = ?self.display_style, to = ?style, "display style changed");
        self.display_style = style;
        if !self.live || self.phase != NudgePhase::Visible {
            return;
        }
        if style.auto_expires() {
            if self.timer.pending().is_none() {
                self.arm_expiry();
            }
        } else {
            self.timer.cancel_kind(TimerKind::Expire);
        }
    }

    /// Fire the pending timer if its deadline has passed.
    ///
    /// Fires at most one timer per call; the next one is always armed for a
    /// later deadline unless every configured duration is zero.
    pub fn poll(&mut self) -> Vec<FeedEvent> {
        let now = self.clock.now_ms();
        match self.timer.pending() {
            Some(timer) if timer.is_due(now) => self.fire(timer.id),
            _ => Vec::new(),
        }
    }

    /// Timer callback for hosts that run their own timers.
    ///
    /// Stale ids and callbacks arriving after teardown are suppressed.
    pub fn fire(&mut self, id: TimerId) -> Vec<FeedEvent> {
        if !self.live {
            warn!(?id, "timer fired after teardown; suppressed");
            return Vec::new();
        }
        let Some(timer) = self.timer.claim(id) else {
            debug!(?id, "stale timer fired; ignored");
            return Vec::new();
        };

        match (timer.kind, self.phase) {
            (TimerKind::Reappear, NudgePhase::Armed) => vec![self.show(NudgeTrigger::Timer)],
            (TimerKind::Expire, NudgePhase::Visible) => {
                vec![self.hide(HideReason::Expired), self.finish_cooldown()]
            }
            (TimerKind::Breather, NudgePhase::Cooldown) => {
                vec![FeedEvent::BreatherEnded { at: Utc::now() }, self.finish_cooldown()]
            }
            (kind, phase) => {
                warn!(?kind, ?phase, "timer fired in unexpected phase; suppressed");
                Vec::new()
            }
        }
    }

    /// Cancel the pending timer and go quiet. Idempotent.
    pub fn teardown(&mut self) {
        if !self.live {
            return;
        }
        if let Some(timer) = self.timer.cancel() {
            debug!(kind = ?timer.kind, "cancelled pending timer on teardown");
        }
        self.phase = NudgePhase::Idle;
        self.live = false;
        info!("nudge scheduler torn down");
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn arm_reappear(&mut self) -> FeedEvent {
        let delay_ms = self.rng.gen_range(self.min_delay_ms..=self.max_delay_ms);
        let deadline = self.clock.now_ms().saturating_add(delay_ms);
        self.timer.arm(TimerKind::Reappear, deadline);
        self.phase = NudgePhase::Armed;
        debug!(delay_ms, "nudge armed");
        FeedEvent::NudgeArmed {
            delay_ms,
            at: Utc::now(),
        }
    }

    fn arm_expiry(&mut self) {
        let deadline = self.clock.now_ms().saturating_add(self.toast_duration_ms);
        self.timer.arm(TimerKind::Expire, deadline);
    }

    fn show(&mut self, trigger: NudgeTrigger) -> FeedEvent {
        let (index, message) = self.pool.take_next();
        let message = message.to_string();
        self.phase = NudgePhase::Visible;
        if self.display_style.auto_expires() {
            self.arm_expiry();
        }
        info!(?trigger, index, "nudge shown");
        FeedEvent::shown(message, trigger)
    }

    /// `Visible -> Cooldown`.
    fn hide(&mut self, reason: HideReason) -> FeedEvent {
        self.timer.cancel();
        self.phase = NudgePhase::Cooldown;
        info!(?reason, "nudge hidden");
        FeedEvent::hidden(reason)
    }

    /// `Cooldown -> Idle -> Armed`.
    fn finish_cooldown(&mut self) -> FeedEvent {
        self.phase = NudgePhase::Idle;
        self.arm_reappear()
    }
}
