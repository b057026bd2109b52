//! Timer status and the observable state handed to the presentation layer

use std::fmt;

use serde::{Deserialize, Serialize};

use super::display;

/// The two states of the timer controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerStatus {
    /// Configuring, reset, or finished
    #[default]
    Idle,
    /// A countdown is active
    Running,
}

impl TimerStatus {
    pub fn is_running(self) -> bool {
        self == TimerStatus::Running
    }
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerStatus::Idle => write!(f, "IDLE"),
            TimerStatus::Running => write!(f, "RUNNING"),
        }
    }
}

/// Which user intents are currently enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub add_time: bool,
    pub reset: bool,
    pub start: bool,
    pub stop: bool,
}

impl Controls {
    pub fn for_status(status: TimerStatus) -> Self {
        let idle = !status.is_running();
        Self {
            add_time: idle,
            reset: idle,
            start: idle,
            stop: !idle,
        }
    }
}

/// Point-in-time view of the controller, published on every change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub status: TimerStatus,
    pub total_seconds: u64,
    /// Live countdown value, only present while running
    pub remaining_ms: Option<u64>,
    pub display: String,
    pub controls: Controls,
}

impl TimerSnapshot {
    pub fn new(status: TimerStatus, total_seconds: u64, remaining_ms: u64) -> Self {
        Self {
            status,
            total_seconds,
            remaining_ms: status.is_running().then_some(remaining_ms),
            display: display::project(status, total_seconds, remaining_ms),
            controls: Controls::for_status(status),
        }
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::new(TimerStatus::Idle, 0, 0)
    }
}

/// Lossless stream of countdown events, one per engine callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    Started { remaining_ms: u64 },
    Tick { remaining_ms: u64 },
    Finished,
    Stopped,
}

/// Plain serializable record used to restore a timer across restarts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavedTimer {
    pub status: TimerStatus,
    pub total_seconds: u64,
    pub remaining_ms: u64,
}
