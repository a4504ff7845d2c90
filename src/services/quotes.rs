//! Motivational quotes shown when a session completes

use rand::seq::SliceRandom;

/// Fixed quote list
pub const QUOTES: [&str; 10] = [
    "Time is the most valuable thing a man can spend.",
    "The key is in not spending time, but in investing it.",
    "Lost time is never found again.",
    "Your time is limited, so don't waste it living someone else's life.",
    "Time stays long enough for anyone who will use it.",
    "Focus on being productive instead of busy.",
    "Until we can manage time, we can manage nothing else.",
    "A man who dares to waste one hour of time has not discovered the value of life.",
    "Determine never to be idle. No person will have occasion to complain of the want of time who never loses any.",
    "Time is what we want most, but what we use worst.",
];

/// Pick a quote uniformly at random
pub fn random_quote() -> &'static str {
    QUOTES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(QUOTES[0])
}
