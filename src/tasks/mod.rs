//! Background tasks module
//! 
//! This module contains the countdown engine and the tasks that run alongside
//! the HTTP server.

pub mod countdown;
pub mod status_log;

// Re-export main types
pub use countdown::{CountdownEngine, CountdownHandle, EnginePhase, DEFAULT_TICK_INTERVAL};
pub use status_log::status_log_task;
