//! Presentation snapshot of the timer

use serde::{Deserialize, Serialize};

use super::{timer_state::ButtonLabel, TimerState};
use crate::utils::{format_clock, ring_offset, window_title};

/// Radius of the progress ring drawn by clients
pub const RING_RADIUS: f64 = 140.0;

/// Everything a display surface needs to render the timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// `MM:SS` clock text
    pub time: String,
    /// Window title text
    pub title: String,
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub running: bool,
    /// Remaining fraction, 1.0 is a full ring
    pub progress: f64,
    /// Dash offset for a ring of `RING_RADIUS`
    pub ring_offset: f64,
    pub button: ButtonLabel,
    /// Completion quote, present only after a finished session
    pub quote: Option<String>,
    /// Custom duration field is marked invalid
    pub input_error: bool,
}

impl From<&TimerState> for TimerSnapshot {
    fn from(timer: &TimerState) -> Self {
        let progress = timer.progress();
        let circumference = 2.0 * std::f64::consts::PI * RING_RADIUS;
        Self {
            time: format_clock(timer.remaining_seconds()),
            title: window_title(timer.remaining_seconds()),
            total_seconds: timer.total_seconds(),
            remaining_seconds: timer.remaining_seconds(),
            running: timer.is_running(),
            progress,
            ring_offset: ring_offset(progress, circumference),
            button: timer.button(),
            quote: timer.quote().map(|q| format!("\"{}\"", q)),
            input_error: timer.input_error(),
        }
    }
}
