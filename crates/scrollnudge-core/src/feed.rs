//! One feed instance: a tracker/scheduler pair and the events they emit.
//!
//! `Feed` is the surface the UI shell talks to. Geometry samples, user
//! actions and timer polls go in; [`FeedEvent`]s come out through an
//! [`EventSink`]. All calls are expected on one control thread or task.
//! Independent feeds share nothing.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::{DisplayStyle, FeedConfig};
use crate::error::Result;
use crate::events::FeedEvent;
use crate::nudge::{NudgeScheduler, NudgeState, TimerId};
use crate::progress::{project, ProgressState, ProgressTracker, ScrollSample, SegmentReadout};

/// Receives every event a feed produces.
pub trait EventSink {
    fn emit(&mut self, event: FeedEvent);
}

impl EventSink for Vec<FeedEvent> {
    fn emit(&mut self, event: FeedEvent) {
        self.push(event);
    }
}

impl EventSink for tokio::sync::mpsc::UnboundedSender<FeedEvent> {
    fn emit(&mut self, event: FeedEvent) {
        // A dropped receiver just means nobody is rendering any more.
        let _ = self.send(event);
    }
}

pub struct Feed<C: Clock, S: EventSink> {
    id: Uuid,
    span: tracing::Span,
    segment_count: usize,
    tracker: ProgressTracker,
    scheduler: NudgeScheduler<C>,
    sink: S,
    attached: bool,
}

impl<C: Clock, S: EventSink> Feed<C, S> {
    /// Validate `config`, create the tracker and scheduler, and arm the
    /// first nudge.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid. No feed is
    /// created in that case.
    pub fn attach(config: FeedConfig, clock: C, sink: S) -> Result<Self> {
        if let Err(err) = config.validate() {
            warn!(%err, "rejected feed configuration");
            return Err(err.into());
        }
        let id = Uuid::new_v4();
        let span = tracing::info_span!("feed", session = %id);
        let scheduler = NudgeScheduler::new(&config, clock)?;

        let mut feed = Self {
            id,
            span,
            segment_count: config.segment_count,
            tracker: ProgressTracker::new(config.item_count),
            scheduler,
            sink,
            attached: true,
        };
        let _enter = feed.span.clone().entered();
        info!(
            items = config.item_count,
            forced_trigger_index = config.forced_trigger_index,
            style = ?config.display_style,
            "feed attached"
        );
        let events = feed.scheduler.start();
        feed.dispatch(events);
        Ok(feed)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Latest progress, `None` until the first sample arrives.
    pub fn progress(&self) -> Option<ProgressState> {
        self.tracker.current()
    }

    /// Segment readout for the latest progress. Pure read.
    pub fn segments(&self) -> SegmentReadout {
        let progress = self.tracker.current().unwrap_or(ProgressState {
            fraction: 0.0,
            active_item_index: 0,
        });
        project(&progress, self.segment_count)
    }

    pub fn nudge_state(&self) -> NudgeState {
        self.scheduler.state()
    }

    pub fn display_style(&self) -> DisplayStyle {
        self.scheduler.display_style()
    }

    /// When the host should next call [`Feed::poll`].
    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.next_deadline()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn report_scroll_sample(&mut self, sample: ScrollSample) {
        if !self.attached {
            return;
        }
        let _enter = self.span.clone().entered();
        let update = self.tracker.update(sample);
        if update.is_unchanged() {
            return;
        }
        debug!(
            fraction = update.progress.fraction,
            index = update.progress.active_item_index,
            "scroll sample"
        );

        let now = chrono::Utc::now();
        self.sink.emit(FeedEvent::ProgressChanged {
            progress: update.progress,
            at: now,
        });
        if update.fraction_changed() {
            self.sink.emit(FeedEvent::SegmentsChanged {
                readout: project(&update.progress, self.segment_count),
                at: now,
            });
        }
        if let Some((from, to)) = update.index_change() {
            self.sink.emit(FeedEvent::ActiveItemChanged { from, to, at: now });
            let events = self.scheduler.on_active_item_changed(to);
            self.dispatch(events);
        }
    }

    pub fn dismiss_nudge(&mut self) {
        let _enter = self.span.clone().entered();
        let events = self.scheduler.dismiss();
        self.dispatch(events);
    }

    pub fn acknowledge_nudge(&mut self) {
        let _enter = self.span.clone().entered();
        let events = self.scheduler.acknowledge();
        self.dispatch(events);
    }

    /// Show a nudge now if one is armed.
    pub fn request_nudge(&mut self) {
        let _enter = self.span.clone().entered();
        let events = self.scheduler.request();
        self.dispatch(events);
    }

    pub fn set_display_style(&mut self, style: DisplayStyle) {
        let _enter = self.span.clone().entered();
        self.scheduler.set_display_style(style);
    }

    /// Fire the scheduler's timer if it is due.
    pub fn poll(&mut self) {
        let _enter = self.span.clone().entered();
        let events = self.scheduler.poll();
        self.dispatch(events);
    }

    /// Deliver a timer callback from a host-owned timer.
    pub fn fire_timer(&mut self, id: TimerId) {
        let _enter = self.span.clone().entered();
        let events = self.scheduler.fire(id);
        self.dispatch(events);
    }

    /// Cancel the pending timer and stop emitting. Idempotent; also runs
    /// on drop.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        let _enter = self.span.clone().entered();
        self.scheduler.teardown();
        self.attached = false;
        info!("feed detached");
    }

    fn dispatch(&mut self, events: Vec<FeedEvent>) {
        for event in events {
            self.sink.emit(event);
        }
    }
}

impl<C: Clock, S: EventSink> Drop for Feed<C, S> {
    fn drop(&mut self) {
        self.detach();
    }
}
