//! Completion effect services
//! 
//! This module contains the collaborators invoked when a session finishes:
//! quote selection, the completion chime and the webhook notifier.

pub mod chime;
pub mod quotes;
pub mod webhook;

// Re-export main types
pub use chime::{default_player, Chime, ChimePlayer, NullChimePlayer};
pub use quotes::{random_quote, QUOTES};
pub use webhook::{Completion, NoopNotifier, Notifier, WebhookNotifier, WebhookPayload};
