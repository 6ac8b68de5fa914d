//! # Background Autosave
//!
//! A tokio task that drives an [`EditorController`] on a fixed tick:
//! resets expired status windows and performs due autosaves.
//!
//! The controller lock is only held to capture and to finish a save; the
//! store write itself runs unlocked, so editing continues while it is in
//! flight. Shutting the task down flushes unsaved changes.

use crate::controller::EditorController;
use crate::gateway::SaveOutcome;
use crate::store::ProjectStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Handle to a running autosave task
#[derive(Debug)]
pub struct AutosaveHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<Option<SaveOutcome>>,
}

impl AutosaveHandle {
    /// Stop the task, flushing pending changes; returns the flush outcome
    pub async fn shutdown(self) -> Option<SaveOutcome> {
        let _ = self.shutdown.send(true);
        self.task.await.ok().flatten()
    }
}

/// Start driving `controller` every `poll_interval`
pub fn spawn_autosave<S>(
    controller: Arc<Mutex<EditorController<S>>>,
    poll_interval: Duration,
) -> AutosaveHandle
where
    S: ProjectStore + 'static,
{
    let (shutdown, mut stop) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    run_once(&controller).await;
                }
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Autosave stopped; flushing");
        controller.lock().await.flush().await
    });

    AutosaveHandle { shutdown, task }
}

/// One tick: poll timers and, if due, save without holding the lock
/// across the store write
async fn run_once<S: ProjectStore>(controller: &Mutex<EditorController<S>>) -> Option<SaveOutcome> {
    let (ticket, store) = {
        let mut ctrl = controller.lock().await;
        if !ctrl.poll() {
            return None;
        }
        debug!(version = ctrl.session().version(), "Autosave fired");
        match ctrl.begin_save() {
            Ok(Some(ticket)) => (ticket, Arc::clone(ctrl.store())),
            Ok(None) => return Some(SaveOutcome::Skipped),
            Err(_) => return Some(SaveOutcome::Failed),
        }
    };

    let result = store.save(&ticket.owner, ticket.record).await;
    let outcome = controller.lock().await.finish_save(ticket.version, result);
    Some(outcome)
}
