use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use vitals::event::{Event, EventHandler};
use vitals::metrics::collector::MetricSource;
use vitals::metrics::sample::{RawBattery, RawSample};
use vitals::metrics::snapshot::Snapshot;
use vitals::scheduler::{DisplaySink, Scheduler, SchedulerState};

fn canned_raw() -> RawSample {
    RawSample {
        cpu_percent_per_core: Some(vec![42.0]),
        memory: None,
        battery: RawBattery::unavailable(),
    }
}

/// Completes after `delay` of (paused) time.
struct FakeSource {
    delay: Duration,
    samples_taken: Rc<RefCell<u32>>,
}

impl MetricSource for FakeSource {
    async fn sample(&mut self, _cpu_window: Duration) -> RawSample {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        *self.samples_taken.borrow_mut() += 1;
        canned_raw()
    }
}

/// A sample that never finishes; exercises cancellation mid-flight.
struct StalledSource;

impl MetricSource for StalledSource {
    async fn sample(&mut self, _cpu_window: Duration) -> RawSample {
        std::future::pending().await
    }
}

#[derive(Clone, Default)]
struct SinkLog {
    updates: Rc<RefCell<Vec<Snapshot>>>,
    redraws: Rc<RefCell<u32>>,
}

struct RecordingSink {
    log: SinkLog,
}

impl DisplaySink for RecordingSink {
    fn update(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.log.updates.borrow_mut().push(snapshot.clone());
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        *self.log.redraws.borrow_mut() += 1;
        Ok(())
    }
}

fn quit_key_event() -> Event {
    Event::Key(KeyEvent::from(KeyCode::Char('q')))
}

#[tokio::test(start_paused = true)]
async fn tick_drives_exactly_one_sink_update() {
    let (tx, events) = EventHandler::manual();
    let log = SinkLog::default();
    let samples_taken = Rc::new(RefCell::new(0));
    let mut scheduler = Scheduler::new(
        FakeSource {
            delay: Duration::ZERO,
            samples_taken: samples_taken.clone(),
        },
        RecordingSink { log: log.clone() },
        events,
        Duration::from_millis(500),
        KeyCode::Char('q'),
    );

    tx.send(Event::Tick).unwrap();
    let driver = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(quit_key_event()).unwrap();
    };
    let (result, ()) = tokio::join!(scheduler.run(), driver);

    result.unwrap();
    assert_eq!(log.updates.borrow().len(), 1);
    assert_eq!(*samples_taken.borrow(), 1);
    assert_eq!(scheduler.state(), SchedulerState::ShuttingDown);
}

#[tokio::test(start_paused = true)]
async fn quit_key_alone_stops_without_any_update() {
    let (tx, events) = EventHandler::manual();
    let log = SinkLog::default();
    let mut scheduler = Scheduler::new(
        StalledSource,
        RecordingSink { log: log.clone() },
        events,
        Duration::from_millis(500),
        KeyCode::Char('q'),
    );

    tx.send(quit_key_event()).unwrap();
    scheduler.run().await.unwrap();

    assert!(log.updates.borrow().is_empty());
    assert_eq!(scheduler.state(), SchedulerState::ShuttingDown);
}

#[tokio::test(start_paused = true)]
async fn signal_cancels_in_flight_sample_without_delivering() {
    let (tx, events) = EventHandler::manual();
    let log = SinkLog::default();
    let mut scheduler = Scheduler::new(
        StalledSource,
        RecordingSink { log: log.clone() },
        events,
        Duration::from_millis(500),
        KeyCode::Char('q'),
    );

    tx.send(Event::Tick).unwrap();
    tx.send(Event::Signal).unwrap();
    scheduler.run().await.unwrap();

    assert!(log.updates.borrow().is_empty());
    assert_eq!(scheduler.state(), SchedulerState::ShuttingDown);
}

#[tokio::test(start_paused = true)]
async fn quit_key_matches_signal_behavior_mid_sample() {
    let (tx, events) = EventHandler::manual();
    let log = SinkLog::default();
    let mut scheduler = Scheduler::new(
        StalledSource,
        RecordingSink { log: log.clone() },
        events,
        Duration::from_millis(500),
        KeyCode::Char('q'),
    );

    tx.send(Event::Tick).unwrap();
    tx.send(quit_key_event()).unwrap();
    scheduler.run().await.unwrap();

    assert!(log.updates.borrow().is_empty());
    assert_eq!(scheduler.state(), SchedulerState::ShuttingDown);
}

#[tokio::test(start_paused = true)]
async fn ticks_during_a_cycle_are_dropped_not_queued() {
    let (tx, events) = EventHandler::manual();
    let log = SinkLog::default();
    let samples_taken = Rc::new(RefCell::new(0));
    let mut scheduler = Scheduler::new(
        FakeSource {
            delay: Duration::from_millis(100),
            samples_taken: samples_taken.clone(),
        },
        RecordingSink { log: log.clone() },
        events,
        Duration::from_millis(100),
        KeyCode::Char('q'),
    );

    // A burst of ticks while the first sample is still in flight.
    tx.send(Event::Tick).unwrap();
    tx.send(Event::Tick).unwrap();
    tx.send(Event::Tick).unwrap();
    let driver = async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        tx.send(quit_key_event()).unwrap();
    };
    let (result, ()) = tokio::join!(scheduler.run(), driver);

    result.unwrap();
    assert_eq!(log.updates.borrow().len(), 1);
    assert_eq!(*samples_taken.borrow(), 1);
    assert_eq!(scheduler.ticks_dropped(), 2);
}

#[tokio::test(start_paused = true)]
async fn stopper_is_idempotent_and_ends_the_loop() {
    let (_tx, events) = EventHandler::manual();
    let log = SinkLog::default();
    let mut scheduler = Scheduler::new(
        StalledSource,
        RecordingSink { log: log.clone() },
        events,
        Duration::from_millis(500),
        KeyCode::Char('q'),
    );

    let stopper = scheduler.stopper();
    stopper.stop();
    stopper.stop();
    scheduler.run().await.unwrap();

    assert!(log.updates.borrow().is_empty());
    assert_eq!(scheduler.state(), SchedulerState::ShuttingDown);
}

#[tokio::test(start_paused = true)]
async fn resize_redraws_without_a_fresh_sample() {
    let (tx, events) = EventHandler::manual();
    let log = SinkLog::default();
    let samples_taken = Rc::new(RefCell::new(0));
    let mut scheduler = Scheduler::new(
        FakeSource {
            delay: Duration::ZERO,
            samples_taken: samples_taken.clone(),
        },
        RecordingSink { log: log.clone() },
        events,
        Duration::from_millis(500),
        KeyCode::Char('q'),
    );

    tx.send(Event::Resize).unwrap();
    tx.send(quit_key_event()).unwrap();
    scheduler.run().await.unwrap();

    assert_eq!(*log.redraws.borrow(), 1);
    assert!(log.updates.borrow().is_empty());
    assert_eq!(*samples_taken.borrow(), 0);
}
