//! Timer controller: routes user intents and owns the timer state

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{
    accumulator::MAX_TOTAL_SECONDS, Controls, DurationAccumulator, SavedTimer, TimeUnit, TimerEvent,
    TimerSnapshot, TimerStatus,
};
use crate::{
    error::TimerError,
    tasks::countdown::{CountdownEngine, CountdownHandle},
};

/// Mutable state guarded by the controller lock
#[derive(Debug)]
struct ControllerInner {
    accumulator: DurationAccumulator,
    status: TimerStatus,
    remaining_ms: u64,
    /// Incremented on every start and stop; callbacks from older runs are dropped
    run_id: u64,
    handle: Option<CountdownHandle>,
}

impl ControllerInner {
    fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::new(self.status, self.accumulator.total_seconds(), self.remaining_ms)
    }
}

#[derive(Debug)]
struct Shared {
    state: Mutex<ControllerInner>,
    updates: watch::Sender<TimerSnapshot>,
    events: broadcast::Sender<TimerEvent>,
}

impl Shared {
    fn lock(&self) -> Result<MutexGuard<'_, ControllerInner>, TimerError> {
        self.state.lock().map_err(|_| TimerError::Poisoned("timer state"))
    }

    fn publish(&self, inner: &ControllerInner) {
        self.updates.send_replace(inner.snapshot());
    }

    fn emit(&self, event: TimerEvent) {
        // No subscribers is the common case
        let _ = self.events.send(event);
    }
}

/// Buffered countdown events per subscriber before it starts lagging
const EVENT_CAPACITY: usize = 1024;

/// Owns the configured duration, the status and the active countdown
#[derive(Debug, Clone)]
pub struct TimerController {
    shared: Arc<Shared>,
    engine: CountdownEngine,
}

impl TimerController {
    /// Create an idle controller with a zero duration
    pub fn new(engine: CountdownEngine, max_seconds: Option<u64>) -> Self {
        let inner = ControllerInner {
            accumulator: DurationAccumulator::with_limit(max_seconds),
            status: TimerStatus::Idle,
            remaining_ms: 0,
            run_id: 0,
            handle: None,
        };
        let (updates, _) = watch::channel(inner.snapshot());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(inner),
                updates,
                events,
            }),
            engine,
        }
    }

    /// Add an increment to the configured duration (IDLE only)
    pub fn on_add_time(&self, amount: i64, unit: TimeUnit) -> Result<u64, TimerError> {
        let mut inner = self.shared.lock()?;
        let total = inner.accumulator.add_time(amount, unit).inspect_err(|e| {
            warn!("Rejected add time {} {:?}: {}", amount, unit, e);
        })?;

        info!("Added {} {:?}, duration is now {}s", amount, unit, total);
        self.shared.publish(&inner);
        Ok(total)
    }

    /// Clear the configured duration (IDLE only)
    pub fn on_reset(&self) -> Result<(), TimerError> {
        let mut inner = self.shared.lock()?;
        inner.accumulator.reset().inspect_err(|e| warn!("Rejected reset: {}", e))?;
        inner.remaining_ms = 0;

        info!("Duration reset");
        self.shared.publish(&inner);
        Ok(())
    }

    /// Start counting down from the configured duration (IDLE only)
    ///
    /// A zero duration is legal: the run finishes on its first tick and the
    /// controller returns to IDLE.
    pub fn on_start(&self) -> Result<(), TimerError> {
        let mut inner = self.shared.lock()?;
        if inner.status.is_running() {
            let err = TimerError::invalid_state("start", inner.status);
            warn!("Rejected start: {}", err);
            return Err(err);
        }

        let total_ms = inner
            .accumulator
            .total_seconds()
            .checked_mul(1000)
            .ok_or_else(|| TimerError::InvalidArgument("duration overflow".to_string()))?;

        info!("Starting countdown from {}s", inner.accumulator.total_seconds());
        self.start_run(&mut inner, total_ms)
    }

    /// Cancel the active countdown. A no-op while IDLE.
    ///
    /// Returns whether a running countdown was actually stopped.
    pub fn on_stop(&self) -> Result<bool, TimerError> {
        let mut inner = self.shared.lock()?;
        if !inner.status.is_running() {
            debug!("Stop requested while idle, ignoring");
            return Ok(false);
        }

        let handle = inner.handle.take();
        inner.run_id += 1;
        inner.status = TimerStatus::Idle;
        inner.remaining_ms = 0;
        inner.accumulator.unlock();
        self.shared.publish(&inner);
        self.shared.emit(TimerEvent::Stopped);
        // Release before cancelling: an in-flight tick may be waiting on this lock.
        drop(inner);

        if let Some(handle) = handle {
            handle.cancel();
        }
        info!("Countdown stopped");
        Ok(true)
    }

    pub fn snapshot(&self) -> Result<TimerSnapshot, TimerError> {
        Ok(self.shared.lock()?.snapshot())
    }

    pub fn status(&self) -> Result<TimerStatus, TimerError> {
        Ok(self.shared.lock()?.status)
    }

    pub fn display(&self) -> Result<String, TimerError> {
        Ok(self.snapshot()?.display)
    }

    pub fn controls(&self) -> Result<Controls, TimerError> {
        Ok(Controls::for_status(self.status()?))
    }

    pub fn total_seconds(&self) -> Result<u64, TimerError> {
        Ok(self.shared.lock()?.accumulator.total_seconds())
    }

    /// Receive a snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Receive every countdown event in order, including each tick
    pub fn subscribe_events(&self) -> broadcast::Receiver<TimerEvent> {
        self.shared.events.subscribe()
    }

    /// Record suitable for restoring this timer later
    pub fn saved(&self) -> Result<SavedTimer, TimerError> {
        let inner = self.shared.lock()?;
        Ok(SavedTimer {
            status: inner.status,
            total_seconds: inner.accumulator.total_seconds(),
            remaining_ms: if inner.status.is_running() { inner.remaining_ms } else { 0 },
        })
    }

    /// Restore a saved timer (IDLE only), resuming a saved countdown if one
    /// still had time left
    pub fn restore(&self, saved: SavedTimer) -> Result<(), TimerError> {
        let mut inner = self.shared.lock()?;
        if inner.status.is_running() {
            return Err(TimerError::invalid_state("restore", inner.status));
        }

        let limit = inner
            .accumulator
            .max_seconds()
            .map_or(MAX_TOTAL_SECONDS, |max| max.min(MAX_TOTAL_SECONDS));
        if saved.total_seconds > limit {
            return Err(TimerError::InvalidArgument(format!(
                "saved duration {}s exceeds limit of {}s",
                saved.total_seconds, limit
            )));
        }
        let total_ms = saved
            .total_seconds
            .checked_mul(1000)
            .ok_or_else(|| TimerError::InvalidArgument("duration overflow".to_string()))?;
        if saved.status.is_running() && saved.remaining_ms > total_ms {
            return Err(TimerError::InvalidArgument(format!(
                "saved remaining time {}ms exceeds duration of {}ms",
                saved.remaining_ms, total_ms
            )));
        }

        inner.accumulator.set_total(saved.total_seconds)?;
        inner.remaining_ms = 0;

        if saved.status.is_running() && saved.remaining_ms > 0 {
            info!("Resuming countdown with {}ms remaining", saved.remaining_ms);
            return self.start_run(&mut inner, saved.remaining_ms);
        }

        info!("Restored idle timer with duration {}s", saved.total_seconds);
        self.shared.publish(&inner);
        Ok(())
    }

    fn start_run(&self, inner: &mut ControllerInner, total_ms: u64) -> Result<(), TimerError> {
        inner.run_id += 1;
        let run_id = inner.run_id;

        let tick_shared = Arc::downgrade(&self.shared);
        let finish_shared = Arc::downgrade(&self.shared);
        let handle = self.engine.start_millis(
            total_ms,
            move |remaining| on_tick(&tick_shared, run_id, remaining),
            move || on_finish(&finish_shared, run_id),
        )?;

        inner.accumulator.lock();
        inner.status = TimerStatus::Running;
        inner.remaining_ms = total_ms;
        inner.handle = Some(handle);
        self.shared.publish(inner);
        self.shared.emit(TimerEvent::Started { remaining_ms: total_ms });
        Ok(())
    }
}

fn on_tick(shared: &Weak<Shared>, run_id: u64, remaining_ms: u64) {
    let Some(shared) = shared.upgrade() else { return };
    let Ok(mut inner) = shared.lock() else { return };
    if inner.run_id != run_id || !inner.status.is_running() {
        return;
    }

    inner.remaining_ms = remaining_ms;
    shared.publish(&inner);
    shared.emit(TimerEvent::Tick { remaining_ms });
}

fn on_finish(shared: &Weak<Shared>, run_id: u64) {
    let Some(shared) = shared.upgrade() else { return };
    let Ok(mut inner) = shared.lock() else { return };
    if inner.run_id != run_id || !inner.status.is_running() {
        return;
    }

    inner.handle = None;
    inner.status = TimerStatus::Idle;
    inner.remaining_ms = 0;
    inner.accumulator.unlock();
    info!("Countdown finished");
    shared.publish(&inner);
    shared.emit(TimerEvent::Finished);
}
