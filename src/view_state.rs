use std::collections::BTreeSet;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::element::ElementId;

/// Toast duration used by every built-in action
pub const DEFAULT_TOAST_DURATION_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Selection,
    Hand,
    Eraser,
    Freedraw,
    Text,
    Image,
}

/// The active tool, with an explicit snapshot of the tool to restore once a
/// transient tool (eraser, hand) is toggled off. The back-reference is
/// informational only and is cleared when the transient tool ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTool {
    pub kind: ToolKind,
    pub last_active_tool: Option<ToolKind>,
}

impl ActiveTool {
    pub fn new(kind: ToolKind) -> Self {
        Self {
            kind,
            last_active_tool: None,
        }
    }

    /// Switch to a transient tool, remembering the current one
    pub fn begin_transient(&self, kind: ToolKind) -> Self {
        Self {
            kind,
            last_active_tool: Some(self.kind),
        }
    }

    /// Leave a transient tool, restoring the remembered tool (selection when
    /// none was remembered) and clearing the back-reference
    pub fn end_transient(&self) -> Self {
        Self {
            kind: self.last_active_tool.unwrap_or(ToolKind::Selection),
            last_active_tool: None,
        }
    }
}

impl Default for ActiveTool {
    fn default() -> Self {
        Self::new(ToolKind::Selection)
    }
}

/// Transient UI notification surfaced by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
    pub duration_ms: u64,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration_ms: DEFAULT_TOAST_DURATION_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogKind {
    EditHistory,
}

/// An open side panel. The width feeds the fill-viewport scroll centering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SidebarState {
    pub width_px: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutDirection {
    LeftToRight,
    RightToLeft,
}

/// View and tool state of the editor.
///
/// Created once at init and patched by every dispatched action. Actions treat
/// it as read-only and return a complete next value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    // Viewport geometry, owned by the host window
    pub width: f32,
    pub height: f32,
    pub offset_left: f32,
    pub offset_top: f32,

    // Camera
    pub zoom: f32,
    pub scroll_x: f32,
    pub scroll_y: f32,

    pub active_tool: ActiveTool,
    pub selected_element_ids: BTreeSet<ElementId>,

    pub theme: Theme,
    pub view_mode_enabled: bool,
    pub view_background_color: Color32,
    pub open_dialog: Option<DialogKind>,
    pub open_sidebar: Option<SidebarState>,
    pub layout_direction: LayoutDirection,

    /// Scene name; `None` means untitled
    pub name: Option<String>,
    /// Identifier of the backing file the scene was loaded from, if any
    pub file_handle: Option<String>,

    // Session preferences that survive a scene reset
    pub pen_mode: bool,
    pub pen_detected: bool,
    pub export_background: bool,
    pub export_embed_scene: bool,
    pub grid_size: Option<f32>,
    pub show_stats: bool,
    pub paste_dialog_shown: bool,

    pub toast: Option<Toast>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            offset_left: 0.0,
            offset_top: 0.0,
            zoom: 1.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
            active_tool: ActiveTool::default(),
            selected_element_ids: BTreeSet::new(),
            theme: Theme::Light,
            view_mode_enabled: false,
            view_background_color: Color32::WHITE,
            open_dialog: None,
            open_sidebar: None,
            layout_direction: LayoutDirection::LeftToRight,
            name: None,
            file_handle: None,
            pen_mode: false,
            pen_detected: false,
            export_background: true,
            export_embed_scene: false,
            grid_size: None,
            show_stats: false,
            paste_dialog_shown: false,
            toast: None,
        }
    }
}

impl ViewState {
    /// Default view state with the session-pinned fields carried over.
    ///
    /// Used by scene resets (clear canvas, create new): everything returns to
    /// defaults except viewport geometry, theme, pen input mode/detection,
    /// export preferences, grid size, stats visibility, and paste-dialog
    /// state. An active image tool falls back to selection since the pending
    /// image insertion no longer exists.
    pub fn cleared(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            offset_left: self.offset_left,
            offset_top: self.offset_top,
            theme: self.theme,
            pen_mode: self.pen_mode,
            pen_detected: self.pen_detected,
            export_background: self.export_background,
            export_embed_scene: self.export_embed_scene,
            grid_size: self.grid_size,
            show_stats: self.show_stats,
            paste_dialog_shown: self.paste_dialog_shown,
            active_tool: if self.active_tool.kind == ToolKind::Image {
                ActiveTool {
                    kind: ToolKind::Selection,
                    ..self.active_tool
                }
            } else {
                self.active_tool
            },
            ..Self::default()
        }
    }

    /// Copy of this view state carrying a toast
    pub fn with_toast(&self, toast: Toast) -> Self {
        Self {
            toast: Some(toast),
            ..self.clone()
        }
    }
}
