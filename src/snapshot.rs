//! Portable scene snapshots.
//!
//! The teardown protocol and the local-save path serialize the whole working
//! state (elements, a view subset, file blobs) into a single JSON document the
//! host can write to disk or re-import later.

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::element::SceneElement;
use crate::scene::FileMap;
use crate::util::time;
use crate::view_state::{Theme, ViewState};

/// Export-source tag stamped into every snapshot produced by this process
pub const EXPORT_SOURCE_LOCAL: &str = "local";

/// MIME type of the exported snapshot document
pub const SNAPSHOT_MIME: &str = "application/json";

/// The view-state subset worth persisting in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotViewState {
    pub theme: Theme,
    pub view_background_color: Color32,
    pub grid_size: Option<f32>,
    pub zoom: f32,
    pub scroll_x: f32,
    pub scroll_y: f32,
    pub name: Option<String>,
}

impl From<&ViewState> for SnapshotViewState {
    fn from(view: &ViewState) -> Self {
        Self {
            theme: view.theme,
            view_background_color: view.view_background_color,
            grid_size: view.grid_size,
            zoom: view.zoom,
            scroll_x: view.scroll_x,
            scroll_y: view.scroll_y,
            name: view.name.clone(),
        }
    }
}

/// A complete portable scene document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub source: String,
    pub elements: Vec<SceneElement>,
    pub view: SnapshotViewState,
    pub files: FileMap,
}

/// Serialize the working state into the portable JSON document
pub fn serialize_scene(
    elements: &[SceneElement],
    view: &ViewState,
    files: &FileMap,
) -> Result<String, serde_json::Error> {
    let document = SceneDocument {
        source: EXPORT_SOURCE_LOCAL.to_owned(),
        elements: elements.to_vec(),
        view: SnapshotViewState::from(view),
        files: files.clone(),
    };
    serde_json::to_string(&document)
}

/// Filename offered when saving the scene while leaving a collaboration
/// session: `excalidraw-collab-<YYYY-MM-DD>.excalidraw`
pub fn collab_export_filename(timestamp_ms: u64) -> String {
    let (year, month, day) = time::utc_date(timestamp_ms);
    format!("excalidraw-collab-{year:04}-{month:02}-{day:02}.excalidraw")
}
