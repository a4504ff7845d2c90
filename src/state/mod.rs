//! State management module
//! 
//! This module contains the timer state machine, its presentation snapshot
//! and the controller that owns both.

pub mod app_state;
pub mod snapshot;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, CompletionHooks, TICK_PERIOD};
pub use snapshot::TimerSnapshot;
pub use timer_state::{ButtonLabel, TickOutcome, TimerState, DEFAULT_MINUTES, MAX_MINUTES, MIN_MINUTES};
