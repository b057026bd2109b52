//! Countdown Timer - A countdown timer state machine with an HTTP front end
//!
//! This library provides the duration accumulator, the cancellable countdown
//! engine and the controller that routes user intents between them.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::{AppState, TimeUnit, TimerController, TimerSnapshot, TimerStatus};
pub use tasks::{CountdownEngine, CountdownHandle};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
