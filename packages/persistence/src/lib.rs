//! # BookForge Persistence
//!
//! Keeps an open [`EditSession`](bookforge_editor::EditSession) in sync with
//! the hosted project store.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ EditorController                             │
//! │  - forwards editor commands                  │
//! │  - restarts the autosave debounce per edit   │
//! └──────────────────────────────────────────────┘
//!             ↓                       ↑
//! ┌───────────────────────┐  ┌───────────────────┐
//! │ PersistenceGateway    │  │ spawn_autosave    │
//! │  - Debouncer          │  │  tokio tick task  │
//! │  - StatusTracker      │  └───────────────────┘
//! │  - two-phase save     │
//! └───────────────────────┘
//!             ↓
//! ┌──────────────────────────────────────────────┐
//! │ ProjectStore: MemoryStore | DirectoryStore   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Every timer reads time from a [`Clock`], so debounce and status windows
//! can be tested with a [`ManualClock`].

mod autosave;
mod clock;
mod config;
mod controller;
mod debounce;
mod directory_store;
mod errors;
mod gateway;
mod identity;
mod memory_store;
mod status;
mod store;

pub use autosave::{spawn_autosave, AutosaveHandle};
pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use config::{AutosaveConfig, DEFAULT_AUTOSAVE_DELAY, DEFAULT_POLL_INTERVAL};
pub use controller::EditorController;
pub use debounce::Debouncer;
pub use directory_store::DirectoryStore;
pub use errors::{PersistenceError, StoreError};
pub use gateway::{PersistenceGateway, SaveOutcome, SaveTicket};
pub use identity::{Identity, SessionProvider, StaticSession};
pub use memory_store::MemoryStore;
pub use status::{SaveStatus, StatusTracker, DEFAULT_ERROR_DISPLAY, DEFAULT_SAVED_DISPLAY};
pub use store::{NewProject, ProjectRecord, ProjectStore, ProjectSummary};
