use std::sync::{Arc, RwLock, mpsc};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::{
    assets::raster::EncodedImage,
    config::PipelineConfig,
    foundation::error::{ThumbError, ThumbResult},
    render::{
        backend::{Compositor, RenderOutput},
        scheduler::{RenderJob, Scheduler, Transition},
    },
    style::options::TextOptions,
};

/// Events buffered for a reader that is not draining [`RenderPipeline::events`].
///
/// When the queue is full further events are dropped; [`RenderPipeline::snapshot`] always
/// holds the latest state.
pub const EVENT_QUEUE_CAPACITY: usize = 32;

/// Notification published by the pipeline's coordinator thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineEvent {
    /// The rendering flag flipped.
    Rendering(bool),
    /// A new output was committed.
    Output(RenderOutput),
}

/// Last committed state, readable at any time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineSnapshot {
    pub output: RenderOutput,
    pub is_rendering: bool,
    /// Latest generation token handed out.
    pub generation: u64,
}

enum Command {
    Background(Option<EncodedImage>),
    Options(Arc<TextOptions>),
    Finished {
        token: u64,
        result: ThumbResult<EncodedImage>,
    },
    Shutdown,
}

/// Debounced, cancelable re-render loop.
///
/// A coordinator thread owns the [`Scheduler`]; every composite runs on its own worker thread
/// and reports back through the command channel. Stale results are dropped at commit time, so
/// a render that never finishes does not hold up newer ones.
pub struct RenderPipeline {
    commands: mpsc::Sender<Command>,
    events: mpsc::Receiver<PipelineEvent>,
    snapshot: Arc<RwLock<PipelineSnapshot>>,
    coordinator: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for RenderPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPipeline")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

impl RenderPipeline {
    /// Start the coordinator thread with default text options.
    pub fn spawn(config: &PipelineConfig, compositor: Arc<dyn Compositor>) -> ThumbResult<Self> {
        Self::spawn_with_options(config, compositor, TextOptions::default())
    }

    /// Start the coordinator thread with `options` already settled.
    pub fn spawn_with_options(
        config: &PipelineConfig,
        compositor: Arc<dyn Compositor>,
        options: TextOptions,
    ) -> ThumbResult<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (event_tx, event_rx) = mpsc::sync_channel::<PipelineEvent>(EVENT_QUEUE_CAPACITY);
        let snapshot = Arc::new(RwLock::new(PipelineSnapshot::default()));

        let coordinator = Coordinator {
            scheduler: Scheduler::with_options(config.debounce, options),
            compositor,
            commands: cmd_tx.clone(),
            events: event_tx,
            snapshot: Arc::clone(&snapshot),
            rendering: false,
        };
        let handle = std::thread::Builder::new()
            .name("thumbcraft-pipeline".to_string())
            .spawn(move || coordinator.run(cmd_rx))
            .map_err(|e| ThumbError::render(format!("spawn pipeline thread: {e}")))?;

        Ok(Self {
            commands: cmd_tx,
            events: event_rx,
            snapshot,
            coordinator: Some(handle),
        })
    }

    /// Replace the background. Takes effect immediately.
    pub fn set_background(&self, background: Option<EncodedImage>) -> ThumbResult<()> {
        self.send(Command::Background(background))
    }

    /// Replace the text options. Takes effect after the debounce period.
    pub fn set_options(&self, options: TextOptions) -> ThumbResult<()> {
        self.send(Command::Options(Arc::new(options)))
    }

    pub fn snapshot(&self) -> PipelineSnapshot {
        self.snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Event stream, in commit order. Holds at most [`EVENT_QUEUE_CAPACITY`] undrained events.
    pub fn events(&self) -> &mpsc::Receiver<PipelineEvent> {
        &self.events
    }

    /// Block until an output is committed or `timeout` elapses.
    ///
    /// Rendering-flag events received while waiting are discarded.
    pub fn next_output(&self, timeout: Duration) -> Option<RenderOutput> {
        let deadline = Instant::now() + timeout;
        loop {
            let left = deadline.checked_duration_since(Instant::now())?;
            match self.events.recv_timeout(left) {
                Ok(PipelineEvent::Output(out)) => return Some(out),
                Ok(PipelineEvent::Rendering(_)) => continue,
                Err(_) => return None,
            }
        }
    }

    /// Stop the coordinator and wait for it to exit. In-flight workers are detached.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(handle) = self.coordinator.take()
            && handle.join().is_err()
        {
            tracing::warn!("pipeline coordinator panicked");
        }
    }

    fn send(&self, cmd: Command) -> ThumbResult<()> {
        self.commands
            .send(cmd)
            .map_err(|_| ThumbError::render("pipeline coordinator is not running"))
    }
}

impl Drop for RenderPipeline {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Coordinator {
    scheduler: Scheduler,
    compositor: Arc<dyn Compositor>,
    commands: mpsc::Sender<Command>,
    events: mpsc::SyncSender<PipelineEvent>,
    snapshot: Arc<RwLock<PipelineSnapshot>>,
    rendering: bool,
}

impl Coordinator {
    fn run(mut self, rx: mpsc::Receiver<Command>) {
        loop {
            let cmd = match self.scheduler.next_deadline() {
                Some(deadline) => {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match rx.recv_timeout(wait) {
                        Ok(cmd) => Some(cmd),
                        Err(mpsc::RecvTimeoutError::Timeout) => None,
                        Err(mpsc::RecvTimeoutError::Disconnected) => return,
                    }
                }
                None => match rx.recv() {
                    Ok(cmd) => Some(cmd),
                    Err(_) => return,
                },
            };

            let transition = match cmd {
                None => self.scheduler.poll(Instant::now()),
                Some(Command::Background(bg)) => self.scheduler.set_background(bg),
                Some(Command::Options(options)) => {
                    self.scheduler.set_options(options, Instant::now());
                    Transition::Unchanged
                }
                Some(Command::Finished { token, result }) => self.scheduler.complete(token, result),
                Some(Command::Shutdown) => return,
            };
            self.apply(transition);
        }
    }

    fn apply(&mut self, transition: Transition) {
        let job = match transition {
            Transition::Unchanged | Transition::Superseded { .. } => return,
            Transition::Committed | Transition::Finished => None,
            Transition::Started(job) => Some(job),
        };
        // Snapshot first so a reader woken by an event sees the same state.
        self.store_snapshot();
        self.publish_rendering();
        match job {
            Some(job) => self.start_worker(job),
            None => self.publish(PipelineEvent::Output(self.scheduler.output().clone())),
        }
    }

    fn start_worker(&self, job: RenderJob) {
        let compositor = Arc::clone(&self.compositor);
        let reply = self.commands.clone();
        let token = job.token;
        let spawned = std::thread::Builder::new()
            .name(format!("thumbcraft-render-{token}"))
            .spawn(move || {
                let result = compositor.composite(&job.background, &job.options);
                let _ = reply.send(Command::Finished {
                    token: job.token,
                    result,
                });
            });
        if let Err(e) = spawned {
            let _ = self.commands.send(Command::Finished {
                token,
                result: Err(ThumbError::render(format!("spawn render thread: {e}"))),
            });
        }
    }

    fn publish_rendering(&mut self) {
        let now = self.scheduler.is_rendering();
        if now != self.rendering {
            self.rendering = now;
            self.publish(PipelineEvent::Rendering(now));
        }
    }

    fn publish(&self, event: PipelineEvent) {
        match self.events.try_send(event) {
            Ok(()) | Err(mpsc::TrySendError::Disconnected(_)) => {}
            Err(mpsc::TrySendError::Full(_)) => {
                tracing::trace!("event queue full; dropping event");
            }
        }
    }

    fn store_snapshot(&self) {
        let mut snap = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        snap.output = self.scheduler.output().clone();
        snap.is_rendering = self.scheduler.is_rendering();
        snap.generation = self.scheduler.generation();
    }
}
