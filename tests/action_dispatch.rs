mod common;

use common::{rectangle_at, RecordingCapabilities};
use egui::{Key, Modifiers};
use serde_json::json;

use sketchboard_core::action::{
    ActionDescriptor, ActionDispatcher, ActionInput, ActionRegistry, DispatchContext,
    DispatchOutcome, PerformOutcome, StateDelta,
};
use sketchboard_core::capabilities::{SaveOutcome, UiOptions};
use sketchboard_core::error::{ActionError, CapabilityError, DispatchError};
use sketchboard_core::keys::KeyPress;
use sketchboard_core::scene::FileMap;
use sketchboard_core::view_state::{ActiveTool, Theme, ToolKind, ViewState};
use sketchboard_core::{Scene, TaskScheduler, UndoHistory};

const EPSILON: f32 = 1e-3;

struct Harness {
    dispatcher: ActionDispatcher,
    scene: Scene,
    view: ViewState,
    files: FileMap,
    history: UndoHistory,
    capabilities: RecordingCapabilities,
    scheduler: TaskScheduler,
}

impl Harness {
    fn new() -> Self {
        let mut scene = Scene::new();
        scene.push_element(rectangle_at(0.0, 0.0, 100.0, 50.0));
        scene.push_element(rectangle_at(200.0, 0.0, 300.0, 80.0));
        scene.push_element(rectangle_at(0.0, 200.0, 50.0, 260.0));

        Self {
            dispatcher: ActionDispatcher::with_defaults(),
            scene,
            view: ViewState {
                width: 800.0,
                height: 600.0,
                ..ViewState::default()
            },
            files: FileMap::new(),
            history: UndoHistory::new(),
            capabilities: RecordingCapabilities::default(),
            scheduler: TaskScheduler::new(),
        }
    }

    fn dispatch(
        &mut self,
        action_id: &str,
        value: Option<serde_json::Value>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let mut ctx = DispatchContext {
            scene: &mut self.scene,
            view: &mut self.view,
            files: &mut self.files,
            history: &mut self.history,
            capabilities: &mut self.capabilities,
            scheduler: &self.scheduler,
        };
        self.dispatcher.dispatch(action_id, value, &mut ctx)
    }

    fn dispatch_key(&mut self, key: KeyPress) -> Result<DispatchOutcome, DispatchError> {
        let mut ctx = DispatchContext {
            scene: &mut self.scene,
            view: &mut self.view,
            files: &mut self.files,
            history: &mut self.history,
            capabilities: &mut self.capabilities,
            scheduler: &self.scheduler,
        };
        self.dispatcher.dispatch_key(&key, &mut ctx)
    }
}

#[test]
fn clear_canvas_soft_deletes_and_resets_view() {
    let mut harness = Harness::new();
    harness.view.theme = Theme::Dark;
    harness.view.grid_size = Some(20.0);
    harness.view.zoom = 2.0;
    harness.view.name = Some("draft".to_owned());

    let outcome = harness.dispatch("clearCanvas", None).unwrap();

    assert_eq!(outcome, DispatchOutcome::Applied { committed: true });
    assert_eq!(harness.scene.elements().len(), 3);
    assert!(harness.scene.elements().iter().all(|e| e.is_deleted));
    assert_eq!(harness.scene.non_deleted_elements().count(), 0);

    // Pinned fields survive, the rest returns to defaults.
    assert_eq!(harness.view.theme, Theme::Dark);
    assert_eq!(harness.view.grid_size, Some(20.0));
    assert!((harness.view.zoom - 1.0).abs() < EPSILON);
    assert_eq!(harness.view.name, None);
    assert!((harness.view.width - 800.0).abs() < EPSILON);

    assert_eq!(harness.capabilities.asset_cache_clears, 1);
    assert_eq!(harness.history.checkpoint_count(), 1);
}

#[test]
fn rejected_predicate_is_a_silent_skip() {
    let mut harness = Harness::new();
    harness.view.view_mode_enabled = true;
    let before_view = harness.view.clone();

    let outcome = harness.dispatch("clearCanvas", None).unwrap();

    assert_eq!(outcome, DispatchOutcome::Skipped);
    assert!(harness.scene.elements().iter().all(|e| !e.is_deleted));
    assert_eq!(harness.view, before_view);
    assert_eq!(harness.history.checkpoint_count(), 0);
}

#[test]
fn host_ui_options_gate_clear_canvas() {
    let mut harness = Harness::new();
    harness.capabilities.ui = UiOptions {
        clear_canvas: false,
        ..UiOptions::default()
    };

    let outcome = harness.dispatch("clearCanvas", None).unwrap();
    assert_eq!(outcome, DispatchOutcome::Skipped);
}

#[test]
fn zoom_changes_are_not_undo_checkpoints() {
    let mut harness = Harness::new();

    let outcome = harness.dispatch("zoomIn", None).unwrap();

    assert_eq!(outcome, DispatchOutcome::Applied { committed: false });
    assert!((harness.view.zoom - 1.1).abs() < EPSILON);
    assert_eq!(harness.history.checkpoint_count(), 0);

    harness.dispatch("zoomOut", None).unwrap();
    assert!((harness.view.zoom - 1.0).abs() < EPSILON);
    assert_eq!(harness.history.checkpoint_count(), 0);
}

#[test]
fn zoom_actions_stay_available_in_view_mode() {
    let mut harness = Harness::new();
    harness.view.view_mode_enabled = true;

    let outcome = harness.dispatch("zoomIn", None).unwrap();
    assert_eq!(outcome, DispatchOutcome::Applied { committed: false });
}

#[test]
#[should_panic(expected = "unregistered")]
fn unknown_action_is_a_programmer_error() {
    let mut harness = Harness::new();
    let _ = harness.dispatch("definitelyNotRegistered", None);
}

#[test]
fn eraser_toggle_round_trips_through_the_previous_tool() {
    let mut harness = Harness::new();
    harness.view.active_tool = ActiveTool::new(ToolKind::Freedraw);
    harness
        .view
        .selected_element_ids
        .insert(harness.scene.elements()[0].id);

    let outcome = harness.dispatch_key(KeyPress::plain(Key::E)).unwrap();

    assert_eq!(outcome, DispatchOutcome::Applied { committed: true });
    assert_eq!(harness.view.active_tool.kind, ToolKind::Eraser);
    assert_eq!(
        harness.view.active_tool.last_active_tool,
        Some(ToolKind::Freedraw)
    );
    assert!(harness.view.selected_element_ids.is_empty());

    harness.dispatch_key(KeyPress::plain(Key::E)).unwrap();
    assert_eq!(harness.view.active_tool.kind, ToolKind::Freedraw);
    assert_eq!(harness.view.active_tool.last_active_tool, None);
}

#[test]
fn hand_toggle_sets_the_grab_cursor() {
    let mut harness = Harness::new();

    harness.dispatch_key(KeyPress::plain(Key::H)).unwrap();

    assert_eq!(harness.view.active_tool.kind, ToolKind::Hand);
    assert_eq!(
        harness.capabilities.cursors,
        vec![sketchboard_core::CursorKind::Grab]
    );
}

#[test]
fn unbound_key_is_skipped() {
    let mut harness = Harness::new();
    let outcome = harness.dispatch_key(KeyPress::plain(Key::Q)).unwrap();
    assert_eq!(outcome, DispatchOutcome::Skipped);
}

#[test]
fn keyboard_shortcuts_resolve_to_their_actions() {
    let mut harness = Harness::new();

    let plus = Modifiers {
        command: true,
        ..Modifiers::NONE
    };
    harness.dispatch_key(KeyPress::new(Key::Plus, plus)).unwrap();
    assert!((harness.view.zoom - 1.1).abs() < EPSILON);

    let theme = Modifiers {
        alt: true,
        shift: true,
        ..Modifiers::NONE
    };
    harness.dispatch_key(KeyPress::new(Key::D, theme)).unwrap();
    assert_eq!(harness.view.theme, Theme::Dark);
}

#[test]
fn toggle_theme_honors_an_explicit_value() {
    let mut harness = Harness::new();

    harness.dispatch("toggleTheme", Some(json!("dark"))).unwrap();
    assert_eq!(harness.view.theme, Theme::Dark);

    // Same value again: no flip, the value wins.
    harness.dispatch("toggleTheme", Some(json!("dark"))).unwrap();
    assert_eq!(harness.view.theme, Theme::Dark);

    harness.dispatch("toggleTheme", None).unwrap();
    assert_eq!(harness.view.theme, Theme::Light);
}

#[test]
fn change_background_commits_only_with_a_color() {
    let mut harness = Harness::new();

    let outcome = harness
        .dispatch(
            "changeViewBackgroundColor",
            Some(json!({ "viewBackgroundColor": "#336699" })),
        )
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Applied { committed: true });
    assert_eq!(
        harness.view.view_background_color,
        egui::Color32::from_rgb(0x33, 0x66, 0x99)
    );

    let outcome = harness
        .dispatch("changeViewBackgroundColor", None)
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Applied { committed: false });
}

#[test]
fn save_to_history_toasts_the_outcome() {
    let mut harness = Harness::new();
    harness.capabilities.save_outcome = SaveOutcome {
        success: true,
        updated: true,
    };

    let outcome = harness.dispatch("saveToHistory", None).unwrap();

    assert_eq!(outcome, DispatchOutcome::Applied { committed: false });
    assert_eq!(
        harness.view.toast.as_ref().unwrap().message,
        "Current version updated"
    );
    assert_eq!(harness.history.checkpoint_count(), 0);
}

#[test]
fn save_to_history_skips_an_empty_scene() {
    let mut harness = Harness::new();
    harness.scene.replace_all_elements(Vec::new());

    let outcome = harness.dispatch("saveToHistory", None).unwrap();
    assert_eq!(outcome, DispatchOutcome::Skipped);
}

#[test]
fn zoom_to_fit_selection_prefers_the_selection() {
    let mut harness = Harness::new();
    let first = harness.scene.elements()[0].id;
    harness.view.selected_element_ids.insert(first);

    harness.dispatch("zoomToFit", None).unwrap();
    let all_zoom = harness.view.zoom;
    let all_scroll = (harness.view.scroll_x, harness.view.scroll_y);

    harness
        .dispatch("zoomToFitSelectionInViewport", None)
        .unwrap();
    let selection_scroll = (harness.view.scroll_x, harness.view.scroll_y);

    // First element only: (0,0,100,50) centers differently than the full scene.
    assert!((harness.view.zoom - all_zoom).abs() < EPSILON); // both clamp to 1.0
    assert!(selection_scroll != all_scroll);
    assert!((harness.view.scroll_x - 350.0).abs() < EPSILON);
    assert!((harness.view.scroll_y - 275.0).abs() < EPSILON);
}

fn failing_perform(_input: ActionInput<'_>) -> Result<PerformOutcome, ActionError> {
    Err(ActionError::LocalSave(CapabilityError::new("boom")))
}

fn delta_perform(input: ActionInput<'_>) -> Result<PerformOutcome, ActionError> {
    Ok(PerformOutcome::Delta(StateDelta::view_only(
        input.view.clone(),
        true,
    )))
}

const FAILING_ACTION: ActionDescriptor = ActionDescriptor {
    id: "alwaysFails",
    label: "Always fails",
    icon: None,
    view_mode: false,
    predicate: None,
    key_test: None,
    perform: failing_perform,
};

#[test]
fn perform_errors_apply_nothing_but_a_toast() {
    let mut harness = Harness::new();
    harness.dispatcher.registry_mut().register(FAILING_ACTION);
    let elements_before = harness.scene.elements().to_vec();

    let result = harness.dispatch("alwaysFails", None);

    assert!(matches!(
        result,
        Err(DispatchError::ActionFailed { id: "alwaysFails", .. })
    ));
    assert_eq!(harness.scene.elements(), elements_before.as_slice());
    assert_eq!(harness.history.checkpoint_count(), 0);
    assert_eq!(
        harness.view.toast.as_ref().unwrap().message,
        "Always fails failed"
    );
}

fn key_test_q(key: &KeyPress) -> bool {
    key.key == Key::Q
}

#[test]
fn key_lookup_returns_the_first_registration_order_match() {
    let first = ActionDescriptor {
        id: "first",
        label: "First",
        icon: None,
        view_mode: false,
        predicate: None,
        key_test: Some(key_test_q),
        perform: delta_perform,
    };
    let second = ActionDescriptor {
        id: "second",
        label: "Second",
        key_test: Some(key_test_q),
        ..first
    };

    let mut registry = ActionRegistry::new();
    registry.register(first);
    registry.register(second);

    let resolved = registry.lookup_by_key(&KeyPress::plain(Key::Q)).unwrap();
    assert_eq!(resolved.id, "first");
}

#[test]
fn re_registration_replaces_in_place() {
    let mut registry = ActionRegistry::new();
    let original = ActionDescriptor {
        id: "repeated",
        label: "Original",
        icon: None,
        view_mode: false,
        predicate: None,
        key_test: None,
        perform: delta_perform,
    };
    registry.register(original);
    registry.register(ActionDescriptor {
        label: "Replacement",
        ..original
    });

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.lookup("repeated").unwrap().label, "Replacement");
}
