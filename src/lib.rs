//! Focus Timer - A Pomodoro countdown served over HTTP
//! 
//! This library provides a single focus timer with a progress ring snapshot,
//! custom session lengths, a completion chime, a random quote and a
//! completion webhook.

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
pub use state::{AppState, CompletionHooks, TimerSnapshot, TimerState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
