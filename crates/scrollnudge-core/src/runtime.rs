//! Tokio host for a [`Feed`].
//!
//! Each feed runs on its own task. Geometry samples, user actions and the
//! scheduler's deadline are multiplexed with `tokio::select!`, so they are
//! applied one at a time on a single timeline. Events come back on an
//! unbounded channel.
//!
//! ```ignore
//! let (handle, mut events) = spawn_feed(FeedConfig::default())?;
//! handle.report_scroll_sample(sample)?;
//! while let Some(event) = events.recv().await { /* render */ }
//! handle.detach().await?;
//! ```

use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tracing::debug;
use uuid::Uuid;

use crate::clock::{Clock, TokioClock};
use crate::config::{DisplayStyle, FeedConfig};
use crate::error::{CoreError, Result};
use crate::events::FeedEvent;
use crate::feed::Feed;
use crate::progress::ScrollSample;

type HostedFeed = Feed<TokioClock, mpsc::UnboundedSender<FeedEvent>>;

#[derive(Debug)]
enum FeedCommand {
    Sample(ScrollSample),
    Dismiss,
    Acknowledge,
    Request,
    SetStyle(DisplayStyle),
    Detach(oneshot::Sender<()>),
}

/// Cloneable handle to a running feed task. The feed is detached when the
/// last handle is dropped.
#[derive(Debug, Clone)]
pub struct FeedHandle {
    id: Uuid,
    commands: mpsc::UnboundedSender<FeedCommand>,
}

impl FeedHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    pub fn report_scroll_sample(&self, sample: ScrollSample) -> Result<()> {
        self.send(FeedCommand::Sample(sample))
    }

    pub fn dismiss_nudge(&self) -> Result<()> {
        self.send(FeedCommand::Dismiss)
    }

    pub fn acknowledge_nudge(&self) -> Result<()> {
        self.send(FeedCommand::Acknowledge)
    }

    pub fn request_nudge(&self) -> Result<()> {
        self.send(FeedCommand::Request)
    }

    pub fn set_display_style(&self, style: DisplayStyle) -> Result<()> {
        self.send(FeedCommand::SetStyle(style))
    }

    /// Detach the feed and wait until its timer has been cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SessionClosed`] if the feed task is already gone.
    pub async fn detach(&self) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(FeedCommand::Detach(ack_tx))?;
        ack_rx.await.map_err(|_| CoreError::SessionClosed)
    }

    fn send(&self, command: FeedCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| CoreError::SessionClosed)
    }
}

/// Attach a feed and run it on a new tokio task.
///
/// Must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns a configuration error if `config` is invalid; nothing is
/// spawned in that case.
pub fn spawn_feed(config: FeedConfig) -> Result<(FeedHandle, mpsc::UnboundedReceiver<FeedEvent>)> {
    let clock = TokioClock::new();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let feed = Feed::attach(config, clock, event_tx)?;
    let handle = FeedHandle {
        id: feed.id(),
        commands: command_tx,
    };
    tokio::spawn(run_feed(feed, clock, command_rx));
    Ok((handle, event_rx))
}

async fn run_feed(
    mut feed: HostedFeed,
    clock: TokioClock,
    mut commands: mpsc::UnboundedReceiver<FeedCommand>,
) {
    loop {
        let deadline = feed.next_deadline().map(|ms| clock.instant_at(ms));
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => apply(&mut feed, command),
                None => {
                    debug!(session = %feed.id(), "all handles dropped");
                    feed.detach();
                }
            },
            _ = wait_for(deadline) => {
                debug!(session = %feed.id(), now_ms = clock.now_ms(), "timer deadline reached");
                feed.poll();
            }
        }
        if !feed.is_attached() {
            break;
        }
    }
}

fn apply(feed: &mut HostedFeed, command: FeedCommand) {
    match command {
        FeedCommand::Sample(sample) => feed.report_scroll_sample(sample),
        FeedCommand::Dismiss => feed.dismiss_nudge(),
        FeedCommand::Acknowledge => feed.acknowledge_nudge(),
        FeedCommand::Request => feed.request_nudge(),
        FeedCommand::SetStyle(style) => feed.set_display_style(style),
        FeedCommand::Detach(ack) => {
            feed.detach();
            let _ = ack.send(());
        }
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
