//! Deterministic scenario replay.
//!
//! A [`Scenario`] is a feed configuration plus a scripted list of scroll
//! samples, user actions and clock advances. [`run`] replays it against a
//! [`ManualClock`] and records every event, which makes it usable both for
//! regression tests and for checking a configuration by hand.
//!
//! Scenarios can be written in TOML:
//!
//! ```toml
//! name = "forced toast"
//!
//! [config]
//! item_count = 12
//! display_style = "toast"
//! seed = 7
//!
//! [[steps]]
//! action = "scroll_to"
//! index = 4
//!
//! [[steps]]
//! action = "advance"
//! ms = 2000
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::{Clock, ManualClock};
use crate::config::{DisplayStyle, FeedConfig};
use crate::error::{ConfigError, Result};
use crate::events::FeedEvent;
use crate::feed::Feed;
use crate::nudge::NudgeState;
use crate::progress::ScrollSample;

/// Guard against configurations where every duration is zero and timers
/// would re-arm forever within one advance.
const MAX_TIMERS_PER_ADVANCE: usize = 10_000;

fn default_page_extent() -> f64 {
    844.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub config: FeedConfig,
    /// Page height used by `scroll_to` steps.
    #[serde(default = "default_page_extent")]
    pub page_extent: f64,
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    Sample {
        offset: f64,
        viewport_extent: f64,
        content_extent: f64,
    },
    /// Rest on a page, as a paging scroll view would.
    ScrollTo {
        index: usize,
    },
    Advance {
        ms: u64,
    },
    Dismiss,
    Acknowledge,
    Request,
    SetStyle {
        style: DisplayStyle,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub events: Vec<FeedEvent>,
    /// Messages in the order they were shown.
    pub shown_messages: Vec<String>,
    pub final_state: NudgeState,
    /// Clock reading when the script ended.
    pub elapsed_ms: u64,
}

impl Scenario {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(scenario)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Replay `scenario` from time zero.
///
/// # Errors
///
/// Returns a configuration error if the scenario's config is invalid.
pub fn run(scenario: &Scenario) -> Result<ScenarioReport> {
    let clock = ManualClock::new();
    let mut feed = Feed::attach(scenario.config.clone(), clock.clone(), Vec::new())?;
    let item_count = scenario.config.item_count;

    for step in &scenario.steps {
        debug!(scenario = %scenario.name, ?step, "replaying step");
        match *step {
            ScenarioStep::Sample {
                offset,
                viewport_extent,
                content_extent,
            } => feed.report_scroll_sample(ScrollSample::new(offset, viewport_extent, content_extent)),
            ScenarioStep::ScrollTo { index } => feed.report_scroll_sample(ScrollSample::at_page(
                index,
                scenario.page_extent,
                item_count,
            )),
            ScenarioStep::Advance { ms } => advance(&mut feed, &clock, ms),
            ScenarioStep::Dismiss => feed.dismiss_nudge(),
            ScenarioStep::Acknowledge => feed.acknowledge_nudge(),
            ScenarioStep::Request => feed.request_nudge(),
            ScenarioStep::SetStyle { style } => feed.set_display_style(style),
        }
    }

    let final_state = feed.nudge_state();
    feed.detach();
    let events = std::mem::take(feed.sink_mut());
    let shown_messages = events
        .iter()
        .filter_map(|e| e.shown_message().map(String::from))
        .collect();

    Ok(ScenarioReport {
        name: scenario.name.clone(),
        events,
        shown_messages,
        final_state,
        elapsed_ms: clock.now_ms(),
    })
}

/// Step the clock through every deadline up to `now + ms`, firing each
/// timer at its own deadline.
fn advance(feed: &mut Feed<ManualClock, Vec<FeedEvent>>, clock: &ManualClock, ms: u64) {
    let target = clock.now_ms().saturating_add(ms);
    let mut fired = 0;
    while let Some(deadline) = feed.next_deadline().filter(|d| *d <= target) {
        if fired == MAX_TIMERS_PER_ADVANCE {
            warn!(fired, "timer budget exhausted during advance");
            break;
        }
        clock.set(deadline.max(clock.now_ms()));
        feed.poll();
        fired += 1;
    }
    clock.set(target);
}
