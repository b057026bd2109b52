//! Countdown engine background task
//!
//! A countdown runs as a spawned tokio task that wakes on a fixed interval and
//! reports the remaining milliseconds. Every callback is dispatched while the
//! run's phase lock is held, and [`CountdownHandle::cancel`] takes that same
//! lock, so once `cancel` returns nothing further is delivered for the run.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::{debug, trace};

use crate::error::TimerError;

/// Tick granularity used when none is configured
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Lifecycle of a single countdown run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Created,
    Running,
    Finished,
    Cancelled,
}

impl EnginePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, EnginePhase::Finished | EnginePhase::Cancelled)
    }
}

/// Starts countdown runs with a fixed tick interval
#[derive(Debug, Clone, Copy)]
pub struct CountdownEngine {
    tick_interval: Duration,
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

impl CountdownEngine {
    pub fn new(tick_interval: Duration) -> Result<Self, TimerError> {
        if tick_interval.is_zero() {
            return Err(TimerError::InvalidArgument(
                "tick interval must be positive".to_string(),
            ));
        }
        Ok(Self { tick_interval })
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Count down from `total_seconds`.
    ///
    /// `on_tick` receives the remaining milliseconds at every tick, never
    /// increasing, ending with a tick of 0. `on_finish` then runs exactly once.
    /// A zero duration delivers a single tick of 0 and finishes right away.
    ///
    /// Callbacks must not cancel their own handle.
    pub fn start<T, F>(
        &self,
        total_seconds: i64,
        on_tick: T,
        on_finish: F,
    ) -> Result<CountdownHandle, TimerError>
    where
        T: FnMut(u64) + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        let total_seconds = u64::try_from(total_seconds).map_err(|_| {
            TimerError::InvalidArgument(format!(
                "countdown duration must be non-negative, got {}s",
                total_seconds
            ))
        })?;
        let total_ms = total_seconds.checked_mul(1000).ok_or_else(|| {
            TimerError::InvalidArgument(format!(
                "countdown duration of {}s overflows milliseconds",
                total_seconds
            ))
        })?;

        self.start_millis(total_ms, on_tick, on_finish)
    }

    /// Count down from an exact number of milliseconds
    pub fn start_millis<T, F>(
        &self,
        total_ms: u64,
        on_tick: T,
        on_finish: F,
    ) -> Result<CountdownHandle, TimerError>
    where
        T: FnMut(u64) + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| TimerError::NoRuntime)?;

        let started = Instant::now();
        let phase = Arc::new(Mutex::new(EnginePhase::Created));
        *lock_phase(&phase) = EnginePhase::Running;

        debug!("Starting countdown of {}ms (tick every {:?})", total_ms, self.tick_interval);
        let task = runtime.spawn(run_countdown(
            Arc::clone(&phase),
            started,
            total_ms,
            self.tick_interval,
            on_tick,
            on_finish,
        ));

        Ok(CountdownHandle { phase, task })
    }
}

/// Opaque reference to an in-flight countdown run
#[derive(Debug)]
pub struct CountdownHandle {
    phase: Arc<Mutex<EnginePhase>>,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Stop tick delivery. Idempotent, and a no-op after the run finished.
    pub fn cancel(&self) {
        let mut phase = lock_phase(&self.phase);
        if *phase == EnginePhase::Running {
            *phase = EnginePhase::Cancelled;
            debug!("Countdown cancelled");
        }
        drop(phase);

        self.task.abort();
    }

    pub fn phase(&self) -> EnginePhase {
        *lock_phase(&self.phase)
    }
}

// The phase is a plain enum, so a panic inside a callback cannot leave it
// half-written and the poison flag is safe to ignore.
fn lock_phase(phase: &Mutex<EnginePhase>) -> MutexGuard<'_, EnginePhase> {
    phase.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn run_countdown<T, F>(
    phase: Arc<Mutex<EnginePhase>>,
    started: Instant,
    total_ms: u64,
    tick_interval: Duration,
    mut on_tick: T,
    on_finish: F,
) where
    T: FnMut(u64) + Send + 'static,
    F: FnOnce() + Send + 'static,
{
    let mut interval = tokio::time::interval_at(started, tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The last wait is cut short at the deadline so a run ends on time even
    // when the tick interval does not divide the duration.
    let deadline = started.checked_add(Duration::from_millis(total_ms));
    let mut last_remaining = total_ms;

    loop {
        match deadline {
            Some(deadline) => {
                let _ = tokio::time::timeout_at(deadline, interval.tick()).await;
            }
            None => {
                interval.tick().await;
            }
        }

        let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let remaining = total_ms.saturating_sub(elapsed).min(last_remaining);
        last_remaining = remaining;

        let mut current = lock_phase(&phase);
        if *current != EnginePhase::Running {
            trace!("Dropping tick for {:?} countdown", *current);
            return;
        }

        trace!(remaining_ms = remaining, "tick");
        on_tick(remaining);

        if remaining == 0 {
            *current = EnginePhase::Finished;
            debug!("Countdown of {}ms finished", total_ms);
            on_finish();
            return;
        }
    }
}
