#![allow(dead_code)]

use egui::{Pos2, Rect};

use sketchboard_core::capabilities::{
    AppCapabilities, CollaborationSession, CursorKind, SaveOutcome, UiOptions,
};
use sketchboard_core::error::{CapabilityError, StorageError};
use sketchboard_core::storage::{KeyValueStore, MemoryStore};
use sketchboard_core::{ElementKind, SceneElement};

pub fn rect(x1: f32, y1: f32, x2: f32, y2: f32) -> Rect {
    Rect::from_min_max(Pos2::new(x1, y1), Pos2::new(x2, y2))
}

pub fn rectangle_at(x1: f32, y1: f32, x2: f32, y2: f32) -> SceneElement {
    SceneElement::new(ElementKind::Rectangle, rect(x1, y1, x2, y2))
}

/// Collaboration session mock recording stop calls
#[derive(Debug, Default)]
pub struct FakeCollabSession {
    pub active: bool,
    pub stop_calls: Vec<bool>,
}

impl CollaborationSession for FakeCollabSession {
    fn is_active(&self) -> bool {
        self.active
    }

    fn stop(&mut self, keep_remote_state: bool) {
        self.stop_calls.push(keep_remote_state);
        self.active = false;
    }
}

/// Capability mock recording every host interaction
#[derive(Default)]
pub struct RecordingCapabilities {
    pub asset_cache_clears: usize,
    pub current_version_id: Option<String>,
    pub set_current_calls: Vec<Option<String>>,
    pub current_deleted_callbacks: usize,
    pub confirm_response: bool,
    pub confirm_prompts: Vec<String>,
    pub saved_files: Vec<(String, String, String)>,
    pub fail_local_save: bool,
    pub strip_share_link_calls: usize,
    pub repaint_requests: usize,
    pub cursors: Vec<CursorKind>,
    pub save_outcome: SaveOutcome,
    pub snapshot_saves: bool,
    pub ui: UiOptions,
    pub collab: Option<FakeCollabSession>,
}

impl RecordingCapabilities {
    pub fn with_active_collab() -> Self {
        Self {
            collab: Some(FakeCollabSession {
                active: true,
                stop_calls: Vec::new(),
            }),
            ..Self::default()
        }
    }
}

impl AppCapabilities for RecordingCapabilities {
    fn clear_asset_cache(&mut self) {
        self.asset_cache_clears += 1;
    }

    fn set_current_editing_version_id(&mut self, id: Option<&str>) {
        self.set_current_calls.push(id.map(str::to_owned));
        self.current_version_id = id.map(str::to_owned);
    }

    fn is_currently_editing_version(&self, id: &str) -> bool {
        self.current_version_id.as_deref() == Some(id)
    }

    fn on_current_editing_version_deleted(&mut self) {
        self.current_deleted_callbacks += 1;
    }

    fn save_or_update_current_version(&mut self) -> SaveOutcome {
        self.save_outcome
    }

    fn save_version_to_history(&mut self) -> bool {
        self.snapshot_saves
    }

    fn confirm_discard_session(&mut self, prompt: &str) -> bool {
        self.confirm_prompts.push(prompt.to_owned());
        self.confirm_response
    }

    fn save_file_locally(
        &mut self,
        filename: &str,
        mime: &str,
        contents: &str,
    ) -> Result<(), CapabilityError> {
        if self.fail_local_save {
            return Err(CapabilityError::new("disk full"));
        }
        self.saved_files
            .push((filename.to_owned(), mime.to_owned(), contents.to_owned()));
        Ok(())
    }

    fn strip_session_from_share_link(&mut self) {
        self.strip_share_link_calls += 1;
    }

    fn set_cursor(&mut self, cursor: CursorKind) {
        self.cursors.push(cursor);
    }

    fn request_repaint(&mut self) {
        self.repaint_requests += 1;
    }

    fn ui_options(&self) -> UiOptions {
        self.ui
    }

    fn collaboration(&mut self) -> Option<&mut dyn CollaborationSession> {
        self.collab
            .as_mut()
            .map(|session| session as &mut dyn CollaborationSession)
    }
}

/// Store whose writes fail, for exercising the quota-exceeded path
#[derive(Debug, Default)]
pub struct QuotaExceededStore {
    pub inner: MemoryStore,
    pub fail_writes: bool,
}

impl KeyValueStore for QuotaExceededStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::QuotaExceeded);
        }
        self.inner.set(key, value)
    }
}
