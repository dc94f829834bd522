//! Host capabilities consumed by the core.
//!
//! Everything the core needs from the surrounding application is injected
//! through `AppCapabilities`. Every method has a no-op/false default so call
//! sites never check for presence; a host implements only what it supports.

use crate::error::CapabilityError;

/// Result of the host's save-or-update hook (Ctrl/Cmd+S)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveOutcome {
    pub success: bool,
    /// True when an existing version was updated rather than a new one created
    pub updated: bool,
}

/// Which canvas actions the host's UI configuration enables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub clear_canvas: bool,
    pub change_background: bool,
    pub toggle_theme: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            clear_canvas: true,
            change_background: true,
            toggle_theme: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    Default,
    Grab,
}

/// A live collaboration session's lifecycle hooks. Transport is out of scope;
/// the core only asks whether a session is active and tells it to stop.
pub trait CollaborationSession {
    fn is_active(&self) -> bool;

    /// Terminate the session. `keep_remote_state = false` discards the scene
    /// on the remote end.
    fn stop(&mut self, keep_remote_state: bool);
}

/// The capability interface injected into predicates, perform functions, the
/// version store and the teardown coordinator.
pub trait AppCapabilities {
    /// Drop any cached decoded binary assets
    fn clear_asset_cache(&mut self) {}

    /// Record (or clear) which saved version the editor currently has open
    fn set_current_editing_version_id(&mut self, _id: Option<&str>) {}

    fn is_currently_editing_version(&self, _id: &str) -> bool {
        false
    }

    /// The version the editor had open was deleted from history; the host
    /// resets to an unsaved/blank editing state and closes dependent UI
    fn on_current_editing_version_deleted(&mut self) {}

    fn save_or_update_current_version(&mut self) -> SaveOutcome {
        SaveOutcome::default()
    }

    /// Snapshot the scene into version history. Returns success.
    fn save_version_to_history(&mut self) -> bool {
        false
    }

    /// Blocking confirmation prompt. Returns true when the user accepts.
    fn confirm_discard_session(&mut self, _prompt: &str) -> bool {
        false
    }

    /// Offer `contents` to the user as a local file download
    fn save_file_locally(
        &mut self,
        _filename: &str,
        _mime: &str,
        _contents: &str,
    ) -> Result<(), CapabilityError> {
        Ok(())
    }

    /// Remove the collaboration session identifier from the shareable
    /// location reference
    fn strip_session_from_share_link(&mut self) {}

    fn set_cursor(&mut self, _cursor: CursorKind) {}

    fn request_repaint(&mut self) {}

    fn ui_options(&self) -> UiOptions {
        UiOptions::default()
    }

    /// The collaboration session, when the host has one wired up. `None`
    /// means collaboration is unavailable; callers degrade gracefully.
    fn collaboration(&mut self) -> Option<&mut dyn CollaborationSession> {
        None
    }
}

/// Capabilities implementation that does nothing; useful for tests and
/// headless tooling
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCapabilities;

impl AppCapabilities for NoopCapabilities {}
