//! # ScrollNudge Core Library
//!
//! State and timing logic behind a vertically-paged media feed: how far the
//! user has scrolled, and when to surface a gentle "take a break" nudge.
//! Rendering is someone else's job. A UI shell feeds in geometry and user
//! actions and paints whatever [`FeedEvent`]s come back.
//!
//! ## Architecture
//!
//! - **Progress Tracker**: maps raw scroll geometry to a clamped fraction,
//!   the active item index, and a segmented readout for multi-bar
//!   indicators
//! - **Nudge Scheduler**: a wall-clock state machine with one owned timer;
//!   randomized re-appearance, a one-time forced trigger at a feed
//!   position, round-robin messages
//! - **Feed**: one tracker/scheduler pair behind the attach/detach surface
//! - **Runtime**: optional tokio task hosting a feed on a single timeline
//!
//! ## Key Components
//!
//! - [`Feed`]: attach, report samples, dismiss/acknowledge, detach
//! - [`NudgeScheduler`]: nudge state machine
//! - [`ProgressTracker`] / [`project`]: progress math
//! - [`FeedConfig`]: validated configuration

pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod feed;
pub mod logging;
pub mod nudge;
pub mod progress;
pub mod runtime;
pub mod simulation;

pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use config::{DisplayStyle, FeedConfig};
pub use error::{ConfigError, CoreError};
pub use events::{FeedEvent, HideReason, NudgeTrigger};
pub use feed::{EventSink, Feed};
pub use nudge::{NudgePhase, NudgeScheduler, NudgeState, PendingTimer, TimerId, TimerKind};
pub use progress::{project, ProgressState, ProgressTracker, ScrollSample, SegmentReadout};
pub use runtime::{spawn_feed, FeedHandle};
pub use simulation::{Scenario, ScenarioReport, ScenarioStep};
