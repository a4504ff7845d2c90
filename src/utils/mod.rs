//! Utility functions module
//! 
//! This module contains utility functions used throughout the application.

pub mod format;
pub mod signals;

// Re-export main functions
pub use format::{format_clock, progress_fraction, ring_offset, window_title};
pub use signals::shutdown_signal;
