#![warn(clippy::all, rust_2018_idioms)]

//! Interaction core of the sketchboard canvas editor: action dispatch,
//! viewport fit math, local version history, and the collaboration-aware
//! scene teardown. Rendering and presentation live in the shell crate; this
//! crate consumes a scene plus a view-state record and produces updated
//! versions of both, along with side-effect signals routed through the host
//! capability interface.

pub mod action;
pub mod capabilities;
pub mod collab;
pub mod element;
pub mod error;
pub mod history;
pub mod keys;
pub mod scene;
pub mod scheduler;
pub mod snapshot;
pub mod storage;
pub mod util;
pub mod version_store;
pub mod view_state;
pub mod zoom;

pub use action::{
    ActionDescriptor, ActionDispatcher, ActionInput, ActionRegistry, DispatchContext,
    DispatchOutcome, PerformOutcome, StateDelta,
};
pub use capabilities::{
    AppCapabilities, CollaborationSession, CursorKind, NoopCapabilities, SaveOutcome, UiOptions,
};
pub use collab::{TeardownCoordinator, TeardownOutcome, TeardownPhase};
pub use element::{ElementId, ElementKind, SceneElement};
pub use error::{ActionError, CapabilityError, DispatchError, StorageError};
pub use history::{Checkpoint, UndoHistory};
pub use keys::KeyPress;
pub use scene::{FileBlob, FileMap, Scene};
pub use scheduler::{DeferredTask, TaskId, TaskScheduler};
pub use storage::{EframeStore, KeyValueStore, MemoryStore};
pub use version_store::{VersionHistoryStore, VersionRecord};
pub use view_state::{ActiveTool, Theme, Toast, ToolKind, ViewState};
