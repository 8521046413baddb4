use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::assets::raster::EncodedImage;
use crate::foundation::error::ThumbResult;
use crate::render::backend::RenderOutput;
use crate::style::options::TextOptions;

/// Where the render loop currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// Nothing pending and nothing in flight.
    Idle,
    /// An option change is waiting for its debounce deadline.
    Pending { deadline: Instant },
    /// A composite is in flight under `token`.
    Rendering { token: u64 },
}

/// Snapshot of inputs handed to a render worker.
///
/// Both fields are immutable shared values; a worker never observes later edits.
#[derive(Clone, Debug)]
pub struct RenderJob {
    /// Generation token the result must be reported with.
    pub token: u64,
    pub background: EncodedImage,
    pub options: Arc<TextOptions>,
}

/// Effect of feeding one event into the [`Scheduler`].
#[derive(Clone, Debug)]
pub enum Transition {
    /// Nothing observable changed.
    Unchanged,
    /// A new output was committed without a render (no background, or blank text).
    Committed,
    /// A composite should be started for this job.
    Started(RenderJob),
    /// A finished render carried the latest token and its output was committed.
    Finished,
    /// A finished render was stale and has been dropped.
    Superseded { token: u64 },
}

/// Debounce and cancellation state machine for the re-render loop.
///
/// Time is passed in explicitly, so the machine is deterministic and carries no threads or
/// timers of its own. Every scheduled evaluation takes a fresh generation token; only the
/// completion carrying the latest token may commit.
#[derive(Debug)]
pub struct Scheduler {
    debounce: Duration,
    background: Option<EncodedImage>,
    settled: Arc<TextOptions>,
    pending: Option<(Arc<TextOptions>, Instant)>,
    latest_token: u64,
    in_flight: Option<u64>,
    output: RenderOutput,
}

impl Scheduler {
    pub fn new(debounce: Duration) -> Self {
        Self::with_options(debounce, TextOptions::default())
    }

    /// Start with `options` already settled.
    pub fn with_options(debounce: Duration, options: TextOptions) -> Self {
        Self {
            debounce,
            background: None,
            settled: Arc::new(options),
            pending: None,
            latest_token: 0,
            in_flight: None,
            output: RenderOutput::NoImage,
        }
    }

    pub fn state(&self) -> SchedulerState {
        if let Some(token) = self.in_flight {
            SchedulerState::Rendering { token }
        } else if let Some((_, deadline)) = self.pending {
            SchedulerState::Pending { deadline }
        } else {
            SchedulerState::Idle
        }
    }

    pub fn output(&self) -> &RenderOutput {
        &self.output
    }

    pub fn is_rendering(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Latest generation token handed out.
    pub fn generation(&self) -> u64 {
        self.latest_token
    }

    /// Options the last evaluation used (or will use).
    pub fn settled_options(&self) -> &Arc<TextOptions> {
        &self.settled
    }

    /// Earliest instant at which [`Scheduler::poll`] can make progress.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Record an option edit. The edit settles `debounce` after the *last* call.
    pub fn set_options(&mut self, options: Arc<TextOptions>, now: Instant) {
        self.pending = Some((options, now + self.debounce));
    }

    /// Replace the background and evaluate immediately with the settled options.
    pub fn set_background(&mut self, background: Option<EncodedImage>) -> Transition {
        self.background = background;
        self.evaluate()
    }

    /// Settle a pending option edit once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Transition {
        match self.pending.take() {
            Some((options, deadline)) if deadline <= now => {
                self.settled = options;
                self.evaluate()
            }
            still_pending => {
                self.pending = still_pending;
                Transition::Unchanged
            }
        }
    }

    /// Report the outcome of the render started under `token`.
    pub fn complete(&mut self, token: u64, result: ThumbResult<EncodedImage>) -> Transition {
        if token != self.latest_token || self.in_flight != Some(token) {
            tracing::debug!(token, latest = self.latest_token, "dropping superseded render");
            return Transition::Superseded { token };
        }
        self.in_flight = None;

        self.output = match (result, self.background.clone()) {
            (Ok(image), _) => RenderOutput::Composite(image),
            (Err(e), Some(bg)) => {
                tracing::warn!(token, error = %e, "composite failed; showing plain background");
                RenderOutput::Background(bg)
            }
            (Err(e), None) => {
                tracing::warn!(token, error = %e, "composite failed without a background");
                RenderOutput::NoImage
            }
        };
        Transition::Finished
    }

    fn evaluate(&mut self) -> Transition {
        self.latest_token += 1;
        let token = self.latest_token;

        let Some(background) = self.background.clone() else {
            self.in_flight = None;
            self.output = RenderOutput::NoImage;
            return Transition::Committed;
        };
        if self.settled.is_blank() {
            self.in_flight = None;
            self.output = RenderOutput::Background(background);
            return Transition::Committed;
        }

        self.in_flight = Some(token);
        Transition::Started(RenderJob {
            token,
            background,
            options: Arc::clone(&self.settled),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scheduler.rs"]
mod tests;
