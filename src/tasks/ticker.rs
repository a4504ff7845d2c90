//! Cancelable one-second tick source

use std::{sync::Arc, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error};

use crate::state::{AppState, TickOutcome};

/// Spawn the tick source for run `run_id`.
///
/// The first tick fires one `period` after spawning. The task ends once the
/// run completes or is superseded, and may also be aborted through its handle.
pub fn spawn_ticker(state: Arc<AppState>, run_id: u64, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("Tick source {} started", run_id);

        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            match state.tick_run(run_id) {
                Ok(TickOutcome::Counting { .. }) => continue,
                Ok(TickOutcome::Completed) => {
                    debug!("Tick source {} finished with the session", run_id);
                    break;
                }
                Ok(TickOutcome::Ignored) => {
                    debug!("Tick source {} superseded", run_id);
                    break;
                }
                Err(e) => {
                    error!("Tick source {} failed: {}", run_id, e);
                    break;
                }
            }
        }
    })
}
