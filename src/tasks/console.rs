//! Terminal console: line commands in, status lines out

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::{
    error::TimerError,
    state::{AppState, TimerSnapshot},
};

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Toggle,
    Start,
    Pause,
    Reset,
    /// Raw custom duration text
    SetDuration(String),
    Quit,
    Help,
}

impl Command {
    /// Parse one line of input. An empty line toggles, a bare number sets the duration.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "" | "toggle" | "t" => Command::Toggle,
            "start" | "resume" | "restart" => Command::Start,
            "pause" | "p" => Command::Pause,
            "reset" | "r" => Command::Reset,
            "set" | "s" => Command::SetDuration(rest.to_string()),
            "quit" | "q" | "exit" => Command::Quit,
            "help" | "h" | "?" => Command::Help,
            _ => Command::SetDuration(line.to_string()),
        }
    }
}

/// Render a snapshot as one console line
pub fn status_line(snapshot: &TimerSnapshot) -> String {
    const WIDTH: usize = 20;
    let filled = (snapshot.progress * WIDTH as f64).round() as usize;
    let bar: String = "#".repeat(filled.min(WIDTH)) + &"-".repeat(WIDTH - filled.min(WIDTH));

    let mut line = format!("{} [{}] {}", snapshot.time, bar, snapshot.button.as_str());
    if snapshot.input_error {
        line.push_str("  (enter 1-180 minutes)");
    }
    if let Some(quote) = &snapshot.quote {
        line.push_str("\n  ");
        line.push_str(quote);
    }
    line
}

const HELP: &str = "commands: <enter>/toggle, start, pause, reset, set <minutes> or <minutes>, quit";

/// Apply a command; returns false when the console should stop
pub fn apply(state: &Arc<AppState>, command: Command) -> Result<bool, TimerError> {
    match command {
        Command::Toggle => {
            state.toggle()?;
        }
        Command::Start => {
            state.start()?;
        }
        Command::Pause => {
            state.pause()?;
        }
        Command::Reset => {
            state.reset()?;
        }
        Command::SetDuration(input) => {
            // Typing again clears a previous error marker, as an edit would
            state.clear_input_error()?;
            match state.set_duration(&input) {
                Ok(_) | Err(TimerError::InvalidDuration { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Command::Help => {
            println!("{}", HELP);
        }
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

/// Read commands from stdin and print a status line whenever the timer changes
pub async fn console_task(state: Arc<AppState>) {
    info!("Starting terminal console");
    println!("{}", HELP);

    let mut snapshots = state.subscribe();
    let printer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        loop {
            let line = status_line(&snapshots.borrow_and_update());
            if stdout.write_all(format!("{}\n", line).as_bytes()).await.is_err() {
                break;
            }
            if snapshots.changed().await.is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match apply(&state, Command::parse(&line)) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => warn!("Console command failed: {}", e),
            },
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read console input: {}", e);
                break;
            }
        }
    }

    printer.abort();
    info!("Terminal console closed");
}
