use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::event::{Event, EventHandler};
use crate::metrics::collector::MetricSource;
use crate::metrics::derive::derive;
use crate::metrics::snapshot::Snapshot;

/// Rendering boundary the scheduler hands finished snapshots to. Injected
/// so the loop can be driven against a fake sink in tests.
pub trait DisplaySink {
    fn update(&mut self, snapshot: &Snapshot) -> Result<()>;

    /// Re-render the previous snapshot after a terminal resize.
    fn redraw(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Sampling,
    Rendering,
    ShuttingDown,
}

/// Requests graceful termination of the loop from outside. Idempotent:
/// repeated stops, or a stop after shutdown already began, are no-ops.
#[derive(Clone)]
pub struct Stopper {
    tx: mpsc::UnboundedSender<Event>,
}

impl Stopper {
    pub fn stop(&self) {
        let _ = self.tx.send(Event::Signal);
    }
}

/// Drives the sample -> derive -> render cycle off the event loop.
///
/// One cycle runs at a time: while a sample is in flight the event channel
/// is still drained, so ticks arriving meanwhile are dropped rather than
/// queued, and quit events or signals cancel the in-flight sample
/// promptly. No snapshot reaches the sink once shutdown has begun.
pub struct Scheduler<P, S> {
    source: P,
    sink: S,
    events: EventHandler,
    cpu_window: Duration,
    quit_key: KeyCode,
    state: SchedulerState,
    ticks_dropped: u64,
}

enum Flow {
    Continue,
    Shutdown,
}

impl<P: MetricSource, S: DisplaySink> Scheduler<P, S> {
    pub fn new(
        source: P,
        sink: S,
        events: EventHandler,
        cpu_window: Duration,
        quit_key: KeyCode,
    ) -> Self {
        Scheduler {
            source,
            sink,
            events,
            cpu_window,
            quit_key,
            state: SchedulerState::Idle,
            ticks_dropped: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn ticks_dropped(&self) -> u64 {
        self.ticks_dropped
    }

    pub fn stopper(&self) -> Stopper {
        Stopper {
            tx: self.events.sender(),
        }
    }

    /// Runs until a quit key, Ctrl+C, SIGINT/SIGTERM, or [`Stopper::stop`]
    /// ends the loop.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.state = SchedulerState::Idle;
            let Some(event) = self.events.next().await else {
                break;
            };
            match event {
                Event::Tick => {
                    if let Flow::Shutdown = self.cycle().await? {
                        info!("shutdown requested mid-sample");
                        break;
                    }
                }
                Event::Key(key) if is_quit(key, self.quit_key) => {
                    info!("closing on quit key");
                    break;
                }
                Event::Signal => {
                    info!("closing on termination signal");
                    break;
                }
                Event::Resize => self.sink.redraw()?,
                Event::Key(_) => {}
            }
        }
        self.state = SchedulerState::ShuttingDown;
        Ok(())
    }

    async fn cycle(&mut self) -> Result<Flow> {
        self.state = SchedulerState::Sampling;
        let raw = tokio::select! {
            raw = self.source.sample(self.cpu_window) => raw,
            _ = drain_until_shutdown(&mut self.events, self.quit_key, &mut self.ticks_dropped) => {
                return Ok(Flow::Shutdown);
            }
        };
        let snapshot = derive(&raw);
        self.state = SchedulerState::Rendering;
        self.sink.update(&snapshot)?;
        Ok(Flow::Continue)
    }
}

/// Consumes events while a sample is in flight. Ticks are dropped (the
/// single-flight policy: never queue, never overlap); resolves only when
/// shutdown is requested, cancelling the racing sample.
async fn drain_until_shutdown(
    events: &mut EventHandler,
    quit_key: KeyCode,
    ticks_dropped: &mut u64,
) {
    loop {
        match events.next().await {
            Some(Event::Tick) => {
                *ticks_dropped += 1;
                debug!(total = *ticks_dropped, "tick dropped while sampling");
            }
            Some(Event::Key(key)) if is_quit(key, quit_key) => return,
            Some(Event::Signal) | None => return,
            Some(_) => {}
        }
    }
}

fn is_quit(key: KeyEvent, quit_key: KeyCode) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    key.code == quit_key
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
