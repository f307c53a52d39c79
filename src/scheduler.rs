//! Single-threaded timer queue.
//!
//! The manager never spawns threads or sleeps inside a tick. Periodic polling
//! and the deferred reconnect are both timers in a [`Scheduler`], and the host
//! drives them by calling `SpaceMouseManager::run_pending` from its own loop
//! (or `run_until` for a standalone blocking loop).
//!
//! Time comes from a [`Clock`] so tests can step it by hand with
//! [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time via [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-stepped clock. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Work a timer performs when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// One poll tick.
    Poll,
    /// Deferred reconnect attempt after a read failure.
    Reconnect,
}

/// Handle used to cancel a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Timer {
    handle: TimerHandle,
    deadline: Instant,
    period: Option<Duration>,
    task: TimerTask,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `task` every `interval`, first at `now + interval`.
    pub fn schedule_repeating(
        &mut self,
        now: Instant,
        interval: Duration,
        task: TimerTask,
    ) -> TimerHandle {
        self.insert(now + interval, Some(interval), task)
    }

    /// Fire `task` once at `now + delay`.
    pub fn schedule_once(
        &mut self,
        now: Instant,
        delay: Duration,
        task: TimerTask,
    ) -> TimerHandle {
        self.insert(now + delay, None, task)
    }

    /// Remove a timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    /// Number of live timers running `task`.
    pub fn count(&self, task: TimerTask) -> usize {
        self.timers.iter().filter(|t| t.task == task).count()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Earliest deadline of any live timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|t| t.deadline).min()
    }

    /// Take the earliest timer that is due at `now`.
    ///
    /// One-shot timers are removed. Repeating timers are re-armed one period
    /// later; if that is still not in the future the missed ticks are skipped,
    /// so a repeating timer fires at most once per call sequence at a given `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<TimerTask> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by_key(|(_, t)| (t.deadline, t.handle.0))
            .map(|(i, _)| i)?;

        let task = self.timers[idx].task;
        match self.timers[idx].period {
            Some(period) => {
                let timer = &mut self.timers[idx];
                let next = timer.deadline + period;
                timer.deadline = if next > now { next } else { now + period };
            }
            None => {
                self.timers.remove(idx);
            }
        }
        Some(task)
    }

    fn insert(
        &mut self,
        deadline: Instant,
        period: Option<Duration>,
        task: TimerTask,
    ) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            handle,
            deadline,
            period,
            task,
        });
        handle
    }
}
