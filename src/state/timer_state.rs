//! Timer state structure and transitions

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// Default session length in minutes
pub const DEFAULT_MINUTES: u64 = 25;
/// Shortest custom session in minutes
pub const MIN_MINUTES: u64 = 1;
/// Longest custom session in minutes
pub const MAX_MINUTES: u64 = 180;

/// Label of the start/pause control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonLabel {
    Start,
    Pause,
    Resume,
    Restart,
}

impl ButtonLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonLabel::Start => "Start",
            ButtonLabel::Pause => "Pause",
            ButtonLabel::Resume => "Resume",
            ButtonLabel::Restart => "Restart",
        }
    }
}

/// Result of applying one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer not running, or the tick came from a cancelled run
    Ignored,
    /// Countdown continues
    Counting { remaining_seconds: u64 },
    /// Remaining time reached zero on this tick
    Completed,
}

/// Parse raw custom duration input into whole minutes.
///
/// Accepts any finite number whose floor lies in `MIN_MINUTES..=MAX_MINUTES`.
pub fn parse_minutes(input: &str) -> Result<u64, TimerError> {
    let invalid = || TimerError::InvalidDuration {
        input: input.to_string(),
        min: MIN_MINUTES,
        max: MAX_MINUTES,
    };

    let value: f64 = input.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }

    let minutes = value.floor();
    if minutes < MIN_MINUTES as f64 || minutes > MAX_MINUTES as f64 {
        return Err(invalid());
    }

    Ok(minutes as u64)
}

/// Countdown state for a single focus session
#[derive(Debug, Clone)]
pub struct TimerState {
    total_seconds: u64,
    remaining_seconds: u64,
    running: bool,
    /// Identifies the tick source currently allowed to advance the countdown
    run_id: u64,
    quote: Option<String>,
    input_error: bool,
    button: ButtonLabel,
}

impl TimerState {
    /// Create a stopped timer with a full session of `minutes`
    pub fn new(minutes: u64) -> Self {
        let total_seconds = minutes.clamp(MIN_MINUTES, MAX_MINUTES) * 60;
        Self {
            total_seconds,
            remaining_seconds: total_seconds,
            running: false,
            run_id: 0,
            quote: None,
            input_error: false,
            button: ButtonLabel::Start,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn quote(&self) -> Option<&str> {
        self.quote.as_deref()
    }

    pub fn input_error(&self) -> bool {
        self.input_error
    }

    pub fn button(&self) -> ButtonLabel {
        self.button
    }

    /// Remaining fraction of the session, 1.0 when full
    pub fn progress(&self) -> f64 {
        crate::utils::progress_fraction(self.remaining_seconds, self.total_seconds)
    }

    /// Begin (or resume) counting down and return the id of the new run.
    ///
    /// A finished timer is refilled first, so starting after completion
    /// restarts the full session.
    pub fn start(&mut self) -> u64 {
        if self.remaining_seconds == 0 {
            self.remaining_seconds = self.total_seconds;
        }
        self.run_id = self.run_id.wrapping_add(1);
        self.running = true;
        self.quote = None;
        self.button = ButtonLabel::Pause;
        self.run_id
    }

    /// Stop counting down, keeping the remaining time
    pub fn pause(&mut self) {
        if self.running {
            self.running = false;
            self.button = ButtonLabel::Resume;
        }
    }

    /// Stop and refill the current session
    pub fn reset(&mut self) {
        self.running = false;
        self.quote = None;
        self.remaining_seconds = self.total_seconds;
        self.button = ButtonLabel::Start;
        self.input_error = false;
    }

    /// Apply a new session length from raw user input.
    ///
    /// Invalid input only raises the input error flag.
    pub fn set_custom_duration(&mut self, input: &str) -> Result<u64, TimerError> {
        let minutes = match parse_minutes(input) {
            Ok(minutes) => minutes,
            Err(e) => {
                self.input_error = true;
                return Err(e);
            }
        };

        self.running = false;
        self.quote = None;
        self.total_seconds = minutes * 60;
        self.remaining_seconds = self.total_seconds;
        self.button = ButtonLabel::Start;
        self.input_error = false;
        Ok(minutes)
    }

    /// The user edited the duration field again
    pub fn clear_input_error(&mut self) {
        self.input_error = false;
    }

    /// Advance the countdown by one second on behalf of run `run_id`
    pub fn tick(&mut self, run_id: u64) -> TickOutcome {
        if !self.running || run_id != self.run_id {
            return TickOutcome::Ignored;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.complete();
            TickOutcome::Completed
        } else {
            TickOutcome::Counting {
                remaining_seconds: self.remaining_seconds,
            }
        }
    }

    /// Show a completion quote
    pub fn show_quote(&mut self, text: impl Into<String>) {
        self.quote = Some(text.into());
    }

    fn complete(&mut self) {
        self.running = false;
        self.remaining_seconds = 0;
        self.button = ButtonLabel::Restart;
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(DEFAULT_MINUTES)
    }
}
