use std::cell::Cell;
use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};
use log::debug;

use crate::timer::{Clock, SystemClock};

/// What the main loop reacts to
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// The tick interval has passed; the session timer should be polled
    Tick,
}

/// The terminal stopped delivering events, so keystrokes (including quit)
/// can no longer reach the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSourceClosed;

impl fmt::Display for EventSourceClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("terminal event source closed")
    }
}

impl std::error::Error for EventSourceClosed {}

/// Source of keyboard and resize events
pub trait AppEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a helper thread and forwards them over a channel
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) => tx.send(AppEvent::Key(key)),
                Ok(CtEvent::Resize(_, _)) => tx.send(AppEvent::Resize),
                Ok(_) => Ok(()),
                Err(e) => {
                    debug!("terminal event reader stopped: {e}");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AppEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-backed source for headless runs
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl AppEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Interleaves input events with ticks.
///
/// A tick is due once per interval no matter how busy the input is, so a
/// steady stream of keystrokes cannot hold back the elapsed time counter.
pub struct Runner<E: AppEventSource, T: Ticker, C: Clock = SystemClock> {
    event_source: E,
    ticker: T,
    clock: C,
    next_tick: Cell<Instant>,
}

impl<E: AppEventSource, T: Ticker> Runner<E, T, SystemClock> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self::with_clock(event_source, ticker, SystemClock)
    }
}

impl<E: AppEventSource, T: Ticker, C: Clock> Runner<E, T, C> {
    pub fn with_clock(event_source: E, ticker: T, clock: C) -> Self {
        let next_tick = Cell::new(clock.now() + ticker.interval());
        Self {
            event_source,
            ticker,
            clock,
            next_tick,
        }
    }

    fn rearm(&self) {
        self.next_tick.set(self.clock.now() + self.ticker.interval());
    }

    /// Returns `Tick` when one is due, otherwise waits for an input event
    /// until the next tick is due.
    pub fn step(&self) -> Result<AppEvent, EventSourceClosed> {
        let now = self.clock.now();
        let due = self.next_tick.get();
        if now >= due {
            // keep the cadence unless a whole interval was missed
            let next = due + self.ticker.interval();
            self.next_tick.set(if next > now {
                next
            } else {
                now + self.ticker.interval()
            });
            return Ok(AppEvent::Tick);
        }

        match self.event_source.recv_timeout(due - now) {
            Ok(ev) => Ok(ev),
            Err(RecvTimeoutError::Timeout) => {
                self.rearm();
                Ok(AppEvent::Tick)
            }
            Err(RecvTimeoutError::Disconnected) => Err(EventSourceClosed),
        }
    }
}
