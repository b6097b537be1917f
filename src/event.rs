use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use futures::StreamExt;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::mpsc;

#[derive(Clone, Debug)]
pub enum Event {
    /// Periodic timer fired; drives one sample+derive+render cycle.
    Tick,
    Key(KeyEvent),
    Resize,
    /// SIGINT or SIGTERM delivered to the process.
    Signal,
}

/// Multiplexes the three event sources the scheduler reacts to — the
/// periodic timer, terminal input, and OS termination signals — into one
/// channel. The interval fires immediately on startup, so the first
/// sample happens right away.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
    _task: Option<tokio::task::JoinHandle<()>>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        // interval() panics on a zero period.
        let tick_rate = tick_rate.max(Duration::from_millis(1));
        let (tx, rx) = mpsc::unbounded_channel::<Event>();
        let task_tx = tx.clone();

        let task = tokio::spawn(async move {
            let tx = task_tx;
            let mut reader = event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_rate);
            tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut sigint = match signal(SignalKind::interrupt()) {
                Ok(stream) => stream,
                Err(_) => return,
            };
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(stream) => stream,
                Err(_) => return,
            };

            loop {
                tokio::select! {
                    maybe_event = reader.next() => {
                        match maybe_event {
                            Some(Ok(evt)) => {
                                let mapped = match evt {
                                    CrosstermEvent::Key(key) => Some(Event::Key(key)),
                                    CrosstermEvent::Resize(_, _) => Some(Event::Resize),
                                    _ => None,
                                };
                                if let Some(e) = mapped
                                    && tx.send(e).is_err()
                                {
                                    break;
                                }
                            }
                            Some(Err(_)) => break,
                            None => break,
                        }
                    }
                    _ = tick_interval.tick() => {
                        if tx.send(Event::Tick).is_err() {
                            break;
                        }
                    }
                    _ = sigint.recv() => {
                        if tx.send(Event::Signal).is_err() {
                            break;
                        }
                    }
                    _ = sigterm.recv() => {
                        if tx.send(Event::Signal).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self {
            rx,
            tx,
            _task: Some(task),
        }
    }

    /// A handler fed by hand instead of by the terminal/timer/signal task.
    /// Used by scheduler tests to script exact event sequences.
    pub fn manual() -> (mpsc::UnboundedSender<Event>, Self) {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();
        let sender = tx.clone();
        (sender, Self { rx, tx, _task: None })
    }

    /// Clone of the channel's send side; lets callers inject events (used
    /// by the scheduler's stop handle).
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
