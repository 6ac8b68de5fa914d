//! # Save Status
//!
//! ```text
//! idle ──save──▶ saving ──ok──▶ saved ──(saved window)──▶ idle
//!                   │
//!                   └──err──▶ error ──(error window)──▶ idle
//! ```
//!
//! `saved` and `error` are display states; they fall back to `idle` on the
//! first poll after their window closes. Starting another save from either
//! of them goes straight to `saving`.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::debug;

pub const DEFAULT_SAVED_DISPLAY: Duration = Duration::from_secs(2);
pub const DEFAULT_ERROR_DISPLAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Error,
}

impl SaveStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SaveStatus::Idle => "Save",
            SaveStatus::Saving => "Saving...",
            SaveStatus::Saved => "Saved",
            SaveStatus::Error => "Error",
        }
    }
}

impl std::fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SaveStatus::Idle => "idle",
            SaveStatus::Saving => "saving",
            SaveStatus::Saved => "saved",
            SaveStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// Save status plus the deadline at which a display state resets
#[derive(Debug)]
pub struct StatusTracker {
    status: SaveStatus,
    reset_at: Option<Instant>,
    saved_display: Duration,
    error_display: Duration,
    tx: watch::Sender<SaveStatus>,
}

impl StatusTracker {
    pub fn new(saved_display: Duration, error_display: Duration) -> Self {
        let (tx, _) = watch::channel(SaveStatus::Idle);
        Self {
            status: SaveStatus::Idle,
            reset_at: None,
            saved_display,
            error_display,
            tx,
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    /// Observe every status change
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.tx.subscribe()
    }

    pub fn reset_at(&self) -> Option<Instant> {
        self.reset_at
    }

    pub fn begin(&mut self) {
        self.reset_at = None;
        self.set(SaveStatus::Saving);
    }

    pub fn succeed(&mut self, now: Instant) {
        self.reset_at = Some(now + self.saved_display);
        self.set(SaveStatus::Saved);
    }

    pub fn fail(&mut self, now: Instant) {
        self.reset_at = Some(now + self.error_display);
        self.set(SaveStatus::Error);
    }

    /// Close an expired display window; returns true if the status changed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.reset_at {
            Some(at) if now >= at => {
                self.reset_at = None;
                self.set(SaveStatus::Idle);
                true
            }
            _ => false,
        }
    }

    fn set(&mut self, status: SaveStatus) {
        if self.status != status {
            debug!(from = %self.status, to = %status, "Save status changed");
        }
        self.status = status;
        self.tx.send_replace(status);
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SAVED_DISPLAY, DEFAULT_ERROR_DISPLAY)
    }
}
