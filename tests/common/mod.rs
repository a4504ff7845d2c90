use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use focus_timer::{
    services::{Chime, ChimePlayer, Completion, Notifier},
    AppState, CompletionHooks,
};

/// Counts chimes played
#[derive(Default)]
pub struct CountingChime {
    plays: AtomicUsize,
}

impl CountingChime {
    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

impl ChimePlayer for CountingChime {
    fn play(&self, _chime: &Chime) {
        self.plays.fetch_add(1, Ordering::SeqCst);
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Records every completion notification
#[derive(Default)]
pub struct RecordingNotifier {
    completions: Mutex<Vec<Completion>>,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        self.completions.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<Completion> {
        self.completions.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn session_completed(&self, completion: &Completion) {
        self.completions.lock().unwrap().push(completion.clone());
    }
}

pub struct Harness {
    pub state: Arc<AppState>,
    pub chime: Arc<CountingChime>,
    pub notifier: Arc<RecordingNotifier>,
}

/// Controller with recording completion hooks
pub fn harness(minutes: u64) -> Harness {
    let chime = Arc::new(CountingChime::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let hooks = CompletionHooks {
        chime: chime.clone(),
        notifier: notifier.clone(),
    };
    let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), minutes, hooks));

    Harness {
        state,
        chime,
        notifier,
    }
}
