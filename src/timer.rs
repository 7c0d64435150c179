use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Time source for the session timer
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Production clock backed by `Instant::now`
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Used by tests and headless runs.
/// Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

pub const TIMER_INTERVAL: Duration = Duration::from_secs(1);

/// Handle for the once-per-second elapsed time counter of a running test.
///
/// Owning the handle is what keeps the timer alive: dropping it cancels the
/// schedule, and a session holds at most one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTimer {
    started_at: Instant,
    interval: Duration,
    next_due: Instant,
}

impl SessionTimer {
    pub fn start(now: Instant) -> Self {
        Self::with_interval(now, TIMER_INTERVAL)
    }

    pub fn with_interval(now: Instant, interval: Duration) -> Self {
        Self {
            started_at: now,
            interval,
            // the original counter fires once right away, showing 0s
            next_due: now,
        }
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        self.elapsed(now).as_secs_f64()
    }

    /// Whole seconds since start, if a firing is due.
    ///
    /// Firings stay on whole intervals from the start, so a late poll does
    /// not push later ones back. Missed firings collapse into one.
    pub fn poll(&mut self, now: Instant) -> Option<u64> {
        if now < self.next_due {
            return None;
        }
        let elapsed = self.elapsed(now);
        let intervals = elapsed.as_nanos() / self.interval.as_nanos().max(1);
        let next = u32::try_from(intervals + 1).unwrap_or(u32::MAX);
        self.next_due = self.started_at + self.interval.saturating_mul(next);
        Some(elapsed.as_secs())
    }
}
