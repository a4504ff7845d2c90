//! Main application state: the timer controller

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use super::{TickOutcome, TimerSnapshot, TimerState};
use crate::{
    error::TimerError,
    services::{random_quote, Chime, ChimePlayer, Completion, NoopNotifier, NullChimePlayer, Notifier},
    tasks::spawn_ticker,
};

/// Default spacing between ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Effects fired when a session completes
#[derive(Clone)]
pub struct CompletionHooks {
    pub chime: Arc<dyn ChimePlayer>,
    pub notifier: Arc<dyn Notifier>,
}

impl CompletionHooks {
    /// Hooks that do nothing, for headless use
    pub fn silent() -> Self {
        Self {
            chime: Arc::new(NullChimePlayer),
            notifier: Arc::new(NoopNotifier),
        }
    }
}

/// Timer plus the handle of the tick task driving it
#[derive(Debug)]
struct Session {
    timer: TimerState,
    ticker: Option<JoinHandle<()>>,
}

impl Session {
    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
            debug!("Tick source cancelled");
        }
    }
}

/// Owns the single focus timer and serializes every operation on it
pub struct AppState {
    session: Mutex<Session>,
    hooks: CompletionHooks,
    tick_period: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<(String, DateTime<Utc>)>>,
    /// Channel for timer snapshots
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create a stopped timer with a full session of `minutes`
    pub fn new(port: u16, host: String, minutes: u64, hooks: CompletionHooks) -> Self {
        let timer = TimerState::new(minutes);
        let (snapshot_tx, snapshot_rx) = watch::channel(TimerSnapshot::from(&timer));

        Self {
            session: Mutex::new(Session { timer, ticker: None }),
            hooks,
            tick_period: TICK_PERIOD,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Override the tick spacing
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, Session>, TimerError> {
        self.session
            .lock()
            .map_err(|e| TimerError::LockPoisoned(e.to_string()))
    }

    /// Publish a snapshot to watchers
    fn publish(&self, timer: &TimerState) -> TimerSnapshot {
        let snapshot = TimerSnapshot::from(timer);
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }

    /// Publish a snapshot and record the user action that produced it
    fn publish_action(&self, action: &str, timer: &TimerState) -> TimerSnapshot {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some((action.to_string(), Utc::now()));
        }
        self.publish(timer)
    }

    /// Start or resume the countdown, restarting a finished session
    pub fn start(self: &Arc<Self>) -> Result<TimerSnapshot, TimerError> {
        let mut session = self.lock_session()?;
        self.start_locked(&mut session);
        Ok(self.publish_action("start", &session.timer))
    }

    /// Pause the countdown; pausing a stopped timer changes nothing
    pub fn pause(&self) -> Result<TimerSnapshot, TimerError> {
        let mut session = self.lock_session()?;
        Self::pause_locked(&mut session);
        Ok(self.publish_action("pause", &session.timer))
    }

    /// Pause when running, otherwise start
    pub fn toggle(self: &Arc<Self>) -> Result<TimerSnapshot, TimerError> {
        let mut session = self.lock_session()?;
        if session.timer.is_running() {
            Self::pause_locked(&mut session);
            Ok(self.publish_action("pause", &session.timer))
        } else {
            self.start_locked(&mut session);
            Ok(self.publish_action("start", &session.timer))
        }
    }

    fn start_locked(self: &Arc<Self>, session: &mut Session) {
        session.cancel_ticker();

        let run_id = session.timer.start();
        session.ticker = Some(spawn_ticker(Arc::clone(self), run_id, self.tick_period));
        info!(
            "Timer started with {}s of {}s remaining",
            session.timer.remaining_seconds(),
            session.timer.total_seconds()
        );
    }

    fn pause_locked(session: &mut Session) {
        session.cancel_ticker();
        session.timer.pause();
        info!("Timer paused at {}s", session.timer.remaining_seconds());
    }

    /// Stop and refill the current session
    pub fn reset(&self) -> Result<TimerSnapshot, TimerError> {
        let mut session = self.lock_session()?;
        session.cancel_ticker();
        session.timer.reset();
        info!("Timer reset to {}s", session.timer.total_seconds());

        Ok(self.publish_action("reset", &session.timer))
    }

    /// Apply a custom session length from raw input.
    ///
    /// On invalid input the error flag is published and the error returned.
    pub fn set_duration(&self, input: &str) -> Result<TimerSnapshot, TimerError> {
        let mut session = self.lock_session()?;

        match session.timer.set_custom_duration(input) {
            Ok(minutes) => {
                session.cancel_ticker();
                info!("Session length set to {} minutes", minutes);
                Ok(self.publish_action("duration", &session.timer))
            }
            Err(e) => {
                warn!("Rejected custom duration: {}", e);
                self.publish_action("duration-rejected", &session.timer);
                Err(e)
            }
        }
    }

    /// The duration field was edited, drop its error marker
    pub fn clear_input_error(&self) -> Result<TimerSnapshot, TimerError> {
        let mut session = self.lock_session()?;
        session.timer.clear_input_error();
        Ok(self.publish_action("input", &session.timer))
    }

    /// Advance the active run by one second
    pub fn tick(&self) -> Result<TickOutcome, TimerError> {
        let run_id = self.lock_session()?.timer.run_id();
        self.tick_run(run_id)
    }

    /// Advance the countdown on behalf of tick source `run_id`.
    ///
    /// Ticks from cancelled runs are ignored.
    pub fn tick_run(&self, run_id: u64) -> Result<TickOutcome, TimerError> {
        let mut session = self.lock_session()?;
        let outcome = session.timer.tick(run_id);

        match outcome {
            TickOutcome::Ignored => {}
            TickOutcome::Counting { remaining_seconds } => {
                debug!("Tick: {}s remaining", remaining_seconds);
                self.publish(&session.timer);
            }
            TickOutcome::Completed => {
                session.cancel_ticker();
                self.complete(&mut session);
            }
        }

        Ok(outcome)
    }

    fn complete(&self, session: &mut Session) {
        let total_seconds = session.timer.total_seconds();
        info!("Focus session of {}s completed", total_seconds);

        self.hooks.chime.play(&Chime::completion());
        session.timer.show_quote(random_quote());
        self.hooks
            .notifier
            .session_completed(&Completion::now(total_seconds));

        self.publish(&session.timer);
    }

    /// Current presentation snapshot
    pub fn snapshot(&self) -> Result<TimerSnapshot, TimerError> {
        let session = self.lock_session()?;
        Ok(TimerSnapshot::from(&session.timer))
    }

    /// Subscribe to snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;
        
        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_action.lock().ok().and_then(|a| a.clone()) {
            Some((action, time)) => (Some(action), Some(time)),
            None => (None, None),
        }
    }
}
