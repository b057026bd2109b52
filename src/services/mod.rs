//! External service module
//! 
//! This module contains the file-backed store used to restore the timer
//! across restarts.

pub mod snapshot_store;

// Re-export main functions
pub use snapshot_store::{load_saved_timer, save_timer};
