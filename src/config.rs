//! Configuration and CLI argument handling

use std::sync::Arc;
use clap::Parser;

use crate::{
    services::{default_player, NoopNotifier, Notifier, WebhookNotifier},
    state::{CompletionHooks, MAX_MINUTES, MIN_MINUTES},
};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "focus-timer")]
#[command(about = "A Pomodoro focus timer served over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Default session length in minutes
    #[arg(short, long, default_value = "25", value_parser = clap::value_parser!(u64).range(MIN_MINUTES..=MAX_MINUTES))]
    pub minutes: u64,

    /// Webhook notified when a session completes
    #[arg(long)]
    pub webhook_url: Option<String>,

    /// User name reported to the webhook
    #[arg(long, default_value = "focus")]
    pub user: String,

    /// App name reported to the webhook
    #[arg(long, default_value = "Focus Timer")]
    pub app_name: String,

    /// Read commands from stdin and print the timer to stdout
    #[arg(long)]
    pub console: bool,

    /// Disable the completion chime
    #[arg(long)]
    pub mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Build the completion hooks this configuration asks for
    pub fn completion_hooks(&self) -> anyhow::Result<CompletionHooks> {
        let notifier: Arc<dyn Notifier> = match &self.webhook_url {
            Some(url) => Arc::new(WebhookNotifier::new(
                url.clone(),
                self.user.clone(),
                self.app_name.clone(),
            )?),
            None => Arc::new(NoopNotifier),
        };

        Ok(CompletionHooks {
            chime: default_player(self.mute),
            notifier,
        })
    }
}
