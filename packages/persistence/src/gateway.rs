//! # Persistence Gateway
//!
//! Bridges an [`EditSession`] to the project store: decides when to save,
//! captures what to save, and folds the outcome back into the session and
//! the save status.
//!
//! ## Two-phase save
//!
//! ```text
//! begin_save ──▶ (store write, lock released) ──▶ finish_save
//!   captures project + version                      marks saved only if
//!   status = saving                                 version is still current
//! ```
//!
//! Edits may continue between the two phases. The session only becomes clean
//! when the version that was written is still its current version, so a
//! slow save can never hide a newer edit.
//!
//! At most one save is in flight. A save requested meanwhile is remembered
//! and becomes due as soon as the in-flight one finishes.

use crate::config::AutosaveConfig;
use crate::debounce::Debouncer;
use crate::errors::StoreError;
use crate::identity::Identity;
use crate::status::{SaveStatus, StatusTracker};
use crate::store::ProjectRecord;
use bookforge_editor::EditSession;
use chrono::Utc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// What a caller should write to the store
#[derive(Debug, Clone)]
pub struct SaveTicket {
    /// Document version captured in `record`
    pub version: u64,
    pub owner: Identity,
    pub record: ProjectRecord,
}

/// Result of a save attempt as seen by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The write succeeded; `clean` is false if edits arrived meanwhile
    Saved { version: u64, clean: bool },
    /// The write failed; the document stays dirty
    Failed,
    /// Nothing was written (no project, or another save in flight)
    Skipped,
}

#[derive(Debug)]
pub struct PersistenceGateway {
    debouncer: Debouncer,
    status: StatusTracker,
    in_flight: Option<u64>,
    resave_requested: bool,
}

impl PersistenceGateway {
    pub fn new(config: &AutosaveConfig) -> Self {
        Self {
            debouncer: Debouncer::new(config.autosave_delay),
            status: StatusTracker::new(config.saved_display, config.error_display),
            in_flight: None,
            resave_requested: false,
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.status.status()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SaveStatus> {
        self.status.subscribe()
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    /// An edit happened; restart the autosave quiet period
    pub fn note_edit(&mut self, now: Instant) {
        let deadline = self.debouncer.touch(now);
        debug!(in_ms = (deadline - now).as_millis() as u64, "Autosave scheduled");
    }

    /// Drop any pending autosave
    pub fn cancel_autosave(&mut self) -> bool {
        self.debouncer.cancel()
    }

    /// Expire `saved`/`error` display windows
    pub fn poll(&mut self, now: Instant) {
        self.status.poll(now);
    }

    /// True if the autosave timer fired and there is something to save.
    /// A fired timer is disarmed either way.
    pub fn take_autosave_due(&mut self, now: Instant, dirty: bool) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        self.debouncer.take_due(now) && dirty
    }

    /// Capture the session for writing. Cancels any pending autosave.
    pub fn begin_save(&mut self, session: &EditSession, owner: Identity) -> Option<SaveTicket> {
        if self.in_flight.is_some() {
            debug!("Save already in flight; queued another");
            self.resave_requested = true;
            return None;
        }

        let project = session.project()?;
        self.debouncer.cancel();

        let version = session.version();
        let record = ProjectRecord::from_project(project, &owner, Utc::now());
        self.in_flight = Some(version);
        self.status.begin();
        info!(project_id = %project.id, version, "Saving project");

        Some(SaveTicket {
            version,
            owner,
            record,
        })
    }

    /// A save could not even be attempted (e.g. no signed-in user)
    pub fn reject_save(&mut self, error: &StoreError, now: Instant) {
        warn!(error = %error, "Save rejected");
        self.status.begin();
        self.status.fail(now);
    }

    /// Fold a finished write back into the session
    pub fn finish_save(
        &mut self,
        session: &mut EditSession,
        version: u64,
        result: Result<ProjectRecord, StoreError>,
        now: Instant,
    ) -> SaveOutcome {
        if self.in_flight != Some(version) {
            debug!(version, "Ignoring completion of unknown save");
            return SaveOutcome::Skipped;
        }
        self.in_flight = None;

        let outcome = match result {
            Ok(record) => {
                let clean = session.mark_saved(version);
                self.status.succeed(now);
                info!(project_id = %record.id, version, clean, "Saved project");
                SaveOutcome::Saved { version, clean }
            }
            Err(e) => {
                self.status.fail(now);
                warn!(version, error = %e, "Save failed; changes kept for next attempt");
                SaveOutcome::Failed
            }
        };

        if std::mem::take(&mut self.resave_requested) && session.is_dirty() {
            self.debouncer.fire_at(now);
        }

        outcome
    }
}

impl Default for PersistenceGateway {
    fn default() -> Self {
        Self::new(&AutosaveConfig::default())
    }
}
