//! Timer state module
//! 
//! This module contains the duration accumulator, the timer controller and
//! the observable state it publishes.

pub mod accumulator;
pub mod app_state;
pub mod controller;
pub mod display;
pub mod timer_state;

// Re-export main types
pub use accumulator::{DurationAccumulator, TimeUnit};
pub use controller::TimerController;
pub use timer_state::{Controls, SavedTimer, TimerEvent, TimerSnapshot, TimerStatus};
pub use app_state::AppState;
