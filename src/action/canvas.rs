//! The built-in canvas action set.
//!
//! Descriptors are plain `const` data with fn pointers so the registry stays
//! `'static` and copyable. Order in `default_actions` is the registration
//! order and therefore the keyboard tie-break order.

use egui::{Color32, Key};

use super::{ActionDescriptor, ActionInput, PerformOutcome, StateDelta};
use crate::capabilities::{AppCapabilities, CursorKind};
use crate::collab::{TeardownCoordinator, TeardownOutcome};
use crate::element::{self, SceneElement};
use crate::error::ActionError;
use crate::keys::KeyPress;
use crate::view_state::{Theme, Toast, ToolKind, ViewState};
use crate::zoom::{self, ZoomAnchor, DEFAULT_VIEWPORT_ZOOM_FACTOR, ZOOM_STEP};

/// The built-in actions, in registration order
pub fn default_actions() -> Vec<ActionDescriptor> {
    vec![
        CHANGE_VIEW_BACKGROUND_COLOR,
        CLEAR_CANVAS,
        CREATE_NEW,
        SAVE_TO_HISTORY,
        SAVE_SNAPSHOT,
        ZOOM_IN,
        ZOOM_OUT,
        RESET_ZOOM,
        ZOOM_TO_FIT,
        ZOOM_TO_FIT_SELECTION_IN_VIEWPORT,
        ZOOM_TO_FIT_SELECTION,
        TOGGLE_THEME,
        TOGGLE_ERASER_TOOL,
        TOGGLE_HAND_TOOL,
    ]
}

pub const CHANGE_VIEW_BACKGROUND_COLOR: ActionDescriptor = ActionDescriptor {
    id: "changeViewBackgroundColor",
    label: "Canvas background",
    icon: None,
    view_mode: false,
    predicate: Some(predicate_change_background),
    key_test: None,
    perform: perform_change_view_background_color,
};

pub const CLEAR_CANVAS: ActionDescriptor = ActionDescriptor {
    id: "clearCanvas",
    label: "Clear canvas",
    icon: Some("trash"),
    view_mode: false,
    predicate: Some(predicate_clear_canvas),
    key_test: None,
    perform: perform_clear_canvas,
};

pub const CREATE_NEW: ActionDescriptor = ActionDescriptor {
    id: "createNew",
    label: "Create new",
    icon: Some("plus"),
    view_mode: false,
    predicate: Some(predicate_clear_canvas),
    key_test: Some(key_create_new),
    perform: perform_create_new,
};

pub const SAVE_TO_HISTORY: ActionDescriptor = ActionDescriptor {
    id: "saveToHistory",
    label: "Save to history",
    icon: Some("save"),
    view_mode: false,
    predicate: Some(predicate_has_elements),
    key_test: Some(key_save_to_history),
    perform: perform_save_to_history,
};

pub const SAVE_SNAPSHOT: ActionDescriptor = ActionDescriptor {
    id: "saveSnapshot",
    label: "Save snapshot",
    icon: Some("save"),
    view_mode: false,
    predicate: Some(predicate_has_elements),
    key_test: None,
    perform: perform_save_snapshot,
};

pub const ZOOM_IN: ActionDescriptor = ActionDescriptor {
    id: "zoomIn",
    label: "Zoom in",
    icon: Some("zoom-in"),
    view_mode: true,
    predicate: None,
    key_test: Some(key_zoom_in),
    perform: perform_zoom_in,
};

pub const ZOOM_OUT: ActionDescriptor = ActionDescriptor {
    id: "zoomOut",
    label: "Zoom out",
    icon: Some("zoom-out"),
    view_mode: true,
    predicate: None,
    key_test: Some(key_zoom_out),
    perform: perform_zoom_out,
};

pub const RESET_ZOOM: ActionDescriptor = ActionDescriptor {
    id: "resetZoom",
    label: "Reset zoom",
    icon: Some("zoom-reset"),
    view_mode: true,
    predicate: None,
    key_test: Some(key_reset_zoom),
    perform: perform_reset_zoom,
};

pub const ZOOM_TO_FIT: ActionDescriptor = ActionDescriptor {
    id: "zoomToFit",
    label: "Zoom to fit",
    icon: Some("zoom-area"),
    view_mode: true,
    predicate: None,
    key_test: Some(key_zoom_to_fit),
    perform: perform_zoom_to_fit,
};

// Fits the selection without zooming beyond 100%: content smaller than the
// viewport is not magnified.
pub const ZOOM_TO_FIT_SELECTION_IN_VIEWPORT: ActionDescriptor = ActionDescriptor {
    id: "zoomToFitSelectionInViewport",
    label: "Zoom to fit selection in viewport",
    icon: Some("zoom-area"),
    view_mode: false,
    predicate: None,
    key_test: Some(key_zoom_to_fit_selection_in_viewport),
    perform: perform_zoom_to_fit_selection_in_viewport,
};

pub const ZOOM_TO_FIT_SELECTION: ActionDescriptor = ActionDescriptor {
    id: "zoomToFitSelection",
    label: "Zoom to selection",
    icon: Some("zoom-area"),
    view_mode: false,
    predicate: None,
    key_test: Some(key_zoom_to_fit_selection),
    perform: perform_zoom_to_fit_selection,
};

pub const TOGGLE_THEME: ActionDescriptor = ActionDescriptor {
    id: "toggleTheme",
    label: "Toggle theme",
    icon: None,
    view_mode: true,
    predicate: Some(predicate_toggle_theme),
    key_test: Some(key_toggle_theme),
    perform: perform_toggle_theme,
};

pub const TOGGLE_ERASER_TOOL: ActionDescriptor = ActionDescriptor {
    id: "toggleEraserTool",
    label: "Eraser",
    icon: None,
    view_mode: false,
    predicate: None,
    key_test: Some(key_toggle_eraser),
    perform: perform_toggle_eraser_tool,
};

pub const TOGGLE_HAND_TOOL: ActionDescriptor = ActionDescriptor {
    id: "toggleHandTool",
    label: "Hand",
    icon: Some("hand"),
    view_mode: false,
    predicate: None,
    key_test: Some(key_toggle_hand),
    perform: perform_toggle_hand_tool,
};

// --- predicates ---

fn predicate_clear_canvas(
    _elements: &[SceneElement],
    view: &ViewState,
    capabilities: &dyn AppCapabilities,
) -> bool {
    capabilities.ui_options().clear_canvas && !view.view_mode_enabled
}

fn predicate_change_background(
    _elements: &[SceneElement],
    view: &ViewState,
    capabilities: &dyn AppCapabilities,
) -> bool {
    capabilities.ui_options().change_background && !view.view_mode_enabled
}

fn predicate_toggle_theme(
    _elements: &[SceneElement],
    _view: &ViewState,
    capabilities: &dyn AppCapabilities,
) -> bool {
    capabilities.ui_options().toggle_theme
}

fn predicate_has_elements(
    elements: &[SceneElement],
    view: &ViewState,
    _capabilities: &dyn AppCapabilities,
) -> bool {
    !elements.is_empty() && !view.view_mode_enabled
}

// --- key tests ---

fn key_create_new(key: &KeyPress) -> bool {
    key.key == Key::N && key.modifiers.command && !key.modifiers.shift
}

fn key_save_to_history(key: &KeyPress) -> bool {
    key.key == Key::S && key.modifiers.command && !key.modifiers.shift
}

fn key_zoom_in(key: &KeyPress) -> bool {
    (key.key == Key::Plus || key.key == Key::Equals)
        && (key.modifiers.command || key.modifiers.shift)
}

fn key_zoom_out(key: &KeyPress) -> bool {
    key.key == Key::Minus && (key.modifiers.command || key.modifiers.shift)
}

fn key_reset_zoom(key: &KeyPress) -> bool {
    key.key == Key::Num0 && (key.modifiers.command || key.modifiers.shift)
}

fn key_zoom_to_fit(key: &KeyPress) -> bool {
    key.key == Key::Num1 && key.modifiers.shift && !key.modifiers.alt && !key.modifiers.command
}

fn key_zoom_to_fit_selection_in_viewport(key: &KeyPress) -> bool {
    key.key == Key::Num2 && key.modifiers.shift && !key.modifiers.alt && !key.modifiers.command
}

fn key_zoom_to_fit_selection(key: &KeyPress) -> bool {
    key.key == Key::Num3 && key.modifiers.shift && !key.modifiers.alt && !key.modifiers.command
}

fn key_toggle_theme(key: &KeyPress) -> bool {
    key.key == Key::D && key.modifiers.alt && key.modifiers.shift
}

fn key_toggle_eraser(key: &KeyPress) -> bool {
    key.key == Key::E && !key.modifiers.command && !key.modifiers.alt
}

fn key_toggle_hand(key: &KeyPress) -> bool {
    key.key == Key::H && !key.modifiers.command && !key.modifiers.alt
}

// --- perform functions ---

fn perform_change_view_background_color(
    input: ActionInput<'_>,
) -> Result<PerformOutcome, ActionError> {
    let color = input
        .value
        .and_then(|value| value.get("viewBackgroundColor"))
        .and_then(|value| value.as_str())
        .and_then(parse_hex_color);

    let mut view = input.view.clone();
    if let Some(color) = color {
        view.view_background_color = color;
    }
    Ok(PerformOutcome::Delta(StateDelta::view_only(
        view,
        color.is_some(),
    )))
}

fn perform_clear_canvas(input: ActionInput<'_>) -> Result<PerformOutcome, ActionError> {
    input.capabilities.clear_asset_cache();
    Ok(PerformOutcome::Delta(StateDelta {
        elements: Some(element::soft_delete_all(input.elements)),
        view: Some(input.view.cleared()),
        files: None,
        commit_to_history: true,
    }))
}

fn perform_create_new(input: ActionInput<'_>) -> Result<PerformOutcome, ActionError> {
    let mut coordinator = TeardownCoordinator::new();
    match coordinator.run(
        input.elements,
        input.view,
        input.files,
        input.capabilities,
        input.scheduler,
    )? {
        TeardownOutcome::Immediate(delta) => Ok(PerformOutcome::Delta(delta)),
        TeardownOutcome::Scheduled { .. } => Ok(PerformOutcome::Deferred),
    }
}

fn perform_save_to_history(input: ActionInput<'_>) -> Result<PerformOutcome, ActionError> {
    let outcome = input.capabilities.save_or_update_current_version();
    let message = if outcome.success {
        if outcome.updated {
            "Current version updated"
        } else {
            "Version saved"
        }
    } else {
        "Failed to save version"
    };
    Ok(PerformOutcome::Delta(StateDelta::view_only(
        input.view.with_toast(Toast::new(message)),
        false,
    )))
}

fn perform_save_snapshot(input: ActionInput<'_>) -> Result<PerformOutcome, ActionError> {
    let message = if input.capabilities.save_version_to_history() {
        "Snapshot saved to history"
    } else {
        "Failed to save snapshot"
    };
    Ok(PerformOutcome::Delta(StateDelta::view_only(
        input.view.with_toast(Toast::new(message)),
        false,
    )))
}

fn perform_zoom_in(input: ActionInput<'_>) -> Result<PerformOutcome, ActionError> {
    perform_anchored_zoom(input.view, input.view.zoom + ZOOM_STEP)
}

fn perform_zoom_out(input: ActionInput<'_>) -> Result<PerformOutcome, ActionError> {
    perform_anchored_zoom(input.view, input.view.zoom - ZOOM_STEP)
}

fn perform_reset_zoom(input: ActionInput<'_>) -> Result<PerformOutcome, ActionError> {
    perform_anchored_zoom(input.view, 1.0)
}

/// Zoom about the viewport center; never an undo checkpoint
fn perform_anchored_zoom(view: &ViewState, next_zoom: f32) -> Result<PerformOutcome, ActionError> {
    let camera = zoom::state_for_zoom(
        ZoomAnchor::viewport_center(view),
        zoom::normalized_zoom(next_zoom),
        view,
    );
    Ok(PerformOutcome::Delta(StateDelta::view_only(
        camera.applied_to(view),
        false,
    )))
}

fn perform_zoom_to_fit(input: ActionInput<'_>) -> Result<PerformOutcome, ActionError> {
    let camera = zoom::zoom_to_fit(input.elements, input.view, false, DEFAULT_VIEWPORT_ZOOM_FACTOR);
    Ok(PerformOutcome::Delta(StateDelta::view_only(
        camera.applied_to(input.view),
        false,
    )))
}

fn perform_zoom_to_fit_selection_in_viewport(
    input: ActionInput<'_>,
) -> Result<PerformOutcome, ActionError> {
    perform_fit_selection(input, false)
}

fn perform_zoom_to_fit_selection(input: ActionInput<'_>) -> Result<PerformOutcome, ActionError> {
    perform_fit_selection(input, true)
}

/// Frame the selected elements, or the whole scene when nothing is selected
fn perform_fit_selection(
    input: ActionInput<'_>,
    fit_to_viewport: bool,
) -> Result<PerformOutcome, ActionError> {
    let selected: Vec<SceneElement> = input
        .elements
        .iter()
        .filter(|element| input.view.selected_element_ids.contains(&element.id))
        .cloned()
        .collect();
    let targets: &[SceneElement] = if selected.is_empty() {
        input.elements
    } else {
        &selected
    };
    let camera = zoom::zoom_to_fit(
        targets,
        input.view,
        fit_to_viewport,
        DEFAULT_VIEWPORT_ZOOM_FACTOR,
    );
    Ok(PerformOutcome::Delta(StateDelta::view_only(
        camera.applied_to(input.view),
        false,
    )))
}

fn perform_toggle_theme(input: ActionInput<'_>) -> Result<PerformOutcome, ActionError> {
    let requested = input.value.and_then(|value| value.as_str()).and_then(|raw| {
        match raw {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    });

    let mut view = input.view.clone();
    view.theme = requested.unwrap_or(view.theme.toggled());
    Ok(PerformOutcome::Delta(StateDelta::view_only(view, false)))
}

fn perform_toggle_eraser_tool(input: ActionInput<'_>) -> Result<PerformOutcome, ActionError> {
    let mut view = input.view.clone();
    view.active_tool = if view.active_tool.kind == ToolKind::Eraser {
        view.active_tool.end_transient()
    } else {
        view.active_tool.begin_transient(ToolKind::Eraser)
    };
    view.selected_element_ids.clear();
    Ok(PerformOutcome::Delta(StateDelta::view_only(view, true)))
}

fn perform_toggle_hand_tool(input: ActionInput<'_>) -> Result<PerformOutcome, ActionError> {
    let mut view = input.view.clone();
    view.active_tool = if view.active_tool.kind == ToolKind::Hand {
        view.active_tool.end_transient()
    } else {
        input.capabilities.set_cursor(CursorKind::Grab);
        view.active_tool.begin_transient(ToolKind::Hand)
    };
    view.selected_element_ids.clear();
    Ok(PerformOutcome::Delta(StateDelta::view_only(view, true)))
}

/// Parse a `#rrggbb` color
fn parse_hex_color(raw: &str) -> Option<Color32> {
    let hex = raw.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    Some(Color32::from_rgb(
        (value >> 16) as u8,
        (value >> 8) as u8,
        value as u8,
    ))
}
