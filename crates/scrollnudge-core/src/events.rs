use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::progress::{ProgressState, SegmentReadout};

/// Why a nudge became visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeTrigger {
    /// The randomized re-appearance timer fired.
    Timer,
    /// The user reached the forced-trigger item.
    ForcedIndex,
    /// The user tapped the assistant indicator.
    Manual,
}

/// Why a visible nudge went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HideReason {
    Dismissed,
    Acknowledged,
    Expired,
}

/// Every state change a feed instance produces is an Event.
/// The render layer consumes these; it never drives timing itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeedEvent {
    ProgressChanged {
        progress: ProgressState,
        at: DateTime<Utc>,
    },
    SegmentsChanged {
        readout: SegmentReadout,
        at: DateTime<Utc>,
    },
    /// The page filling the viewport changed. `from` is `None` for the
    /// first sample after attach.
    ActiveItemChanged {
        from: Option<usize>,
        to: usize,
        at: DateTime<Utc>,
    },
    /// The randomized timer was (re-)armed.
    NudgeArmed {
        delay_ms: u64,
        at: DateTime<Utc>,
    },
    NudgeVisibilityChanged {
        visible: bool,
        /// Present only when `visible` is true.
        message: Option<String>,
        trigger: Option<NudgeTrigger>,
        hide_reason: Option<HideReason>,
        at: DateTime<Utc>,
    },
    /// The user accepted a nudge; the breathing interlude is running.
    BreatherStarted {
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    BreatherEnded {
        at: DateTime<Utc>,
    },
}

impl FeedEvent {
    pub(crate) fn shown(message: String, trigger: NudgeTrigger) -> Self {
        FeedEvent::NudgeVisibilityChanged {
            visible: true,
            message: Some(message),
            trigger: Some(trigger),
            hide_reason: None,
            at: Utc::now(),
        }
    }

    pub(crate) fn hidden(reason: HideReason) -> Self {
        FeedEvent::NudgeVisibilityChanged {
            visible: false,
            message: None,
            trigger: None,
            hide_reason: Some(reason),
            at: Utc::now(),
        }
    }

    /// Message carried by a "nudge shown" event.
    pub fn shown_message(&self) -> Option<&str> {
        match self {
            FeedEvent::NudgeVisibilityChanged {
                visible: true,
                message,
                ..
            } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_nudge_shown(&self) -> bool {
        matches!(
            self,
            FeedEvent::NudgeVisibilityChanged { visible: true, .. }
        )
    }

    pub fn is_nudge_hidden(&self) -> bool {
        matches!(
            self,
            FeedEvent::NudgeVisibilityChanged { visible: false, .. }
        )
    }
}
