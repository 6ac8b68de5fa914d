//! Autosave timing.

use crate::status::{DEFAULT_ERROR_DISPLAY, DEFAULT_SAVED_DISPLAY};
use std::time::Duration;

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_secs(15);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveConfig {
    /// Quiet period after the last edit before an autosave
    pub autosave_delay: Duration,

    /// How long `saved` is shown before returning to `idle`
    pub saved_display: Duration,

    /// How long `error` is shown before returning to `idle`
    pub error_display: Duration,

    /// Tick of the background autosave task
    pub poll_interval: Duration,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
            saved_display: DEFAULT_SAVED_DISPLAY,
            error_display: DEFAULT_ERROR_DISPLAY,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
