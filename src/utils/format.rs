//! Clock and progress formatting helpers

/// Format seconds as a zero-padded `MM:SS` clock
pub fn format_clock(seconds: u64) -> String {
    let minutes = seconds / 60;
    let seconds = seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Window title shown alongside the clock
pub fn window_title(seconds: u64) -> String {
    format!("{} - Focus", format_clock(seconds))
}

/// Fraction of the session still remaining, 1.0 is a full ring
pub fn progress_fraction(remaining_seconds: u64, total_seconds: u64) -> f64 {
    if total_seconds == 0 {
        return 0.0;
    }
    (remaining_seconds as f64 / total_seconds as f64).clamp(0.0, 1.0)
}

/// Stroke dash offset for a progress ring of the given circumference
pub fn ring_offset(fraction: f64, circumference: f64) -> f64 {
    circumference - fraction.clamp(0.0, 1.0) * circumference
}
