//! Action registry and dispatcher.
//!
//! An action is a named, predicate-gated command bundling an optional
//! keyboard trigger and a state-transition function. The registry is filled
//! once at startup; the dispatcher resolves a trigger, gates it, runs it
//! against read-only state and applies the resulting delta atomically.

mod canvas;

pub use canvas::default_actions;

use std::collections::HashMap;

use crate::capabilities::AppCapabilities;
use crate::element::SceneElement;
use crate::error::{ActionError, DispatchError};
use crate::history::{Checkpoint, UndoHistory};
use crate::keys::KeyPress;
use crate::scene::{FileMap, Scene};
use crate::scheduler::TaskScheduler;
use crate::view_state::{Toast, ViewState};

/// Gate deciding whether an action is currently applicable
pub type Predicate = fn(&[SceneElement], &ViewState, &dyn AppCapabilities) -> bool;

/// Keyboard trigger test
pub type KeyTest = fn(&KeyPress) -> bool;

/// State-transition function of an action
pub type Perform = fn(ActionInput<'_>) -> Result<PerformOutcome, ActionError>;

/// Read-only state handed to a perform function. Perform returns new values;
/// it never mutates what it was given.
pub struct ActionInput<'a> {
    pub elements: &'a [SceneElement],
    pub view: &'a ViewState,
    pub files: &'a FileMap,
    /// Action-specific payload (e.g. a color for the background action)
    pub value: Option<&'a serde_json::Value>,
    pub capabilities: &'a mut dyn AppCapabilities,
    pub scheduler: &'a TaskScheduler,
}

/// The partial update produced by an action.
///
/// Each field carries the complete next value: the element list replaces the
/// whole working set, the view state replaces the current one, the file map
/// replaces the current map. `None` leaves that part untouched.
#[derive(Debug, Clone, Default)]
pub struct StateDelta {
    pub elements: Option<Vec<SceneElement>>,
    pub view: Option<ViewState>,
    pub files: Option<FileMap>,
    /// Whether the merged state becomes an undo checkpoint
    pub commit_to_history: bool,
}

impl StateDelta {
    /// Delta touching only the view state
    pub fn view_only(view: ViewState, commit_to_history: bool) -> Self {
        Self {
            view: Some(view),
            commit_to_history,
            ..Self::default()
        }
    }
}

/// What a perform function did
pub enum PerformOutcome {
    /// An immediate delta to merge
    Delta(StateDelta),
    /// No immediate delta; the action runs its own out-of-band protocol and
    /// state will be applied later (see the collab teardown)
    Deferred,
}

/// A registered action
#[derive(Clone, Copy)]
pub struct ActionDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: Option<&'static str>,
    /// Whether the action stays available in view-only mode
    pub view_mode: bool,
    pub predicate: Option<Predicate>,
    pub key_test: Option<KeyTest>,
    pub perform: Perform,
}

impl std::fmt::Debug for ActionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("view_mode", &self.view_mode)
            .field("has_predicate", &self.predicate.is_some())
            .field("has_key_test", &self.key_test.is_some())
            .finish()
    }
}

/// Mapping from action ids and key events to descriptors.
///
/// Registration happens once at process start; there is no runtime removal.
/// Key lookup walks descriptors in registration order and returns the first
/// match, so a later-registered conflicting shortcut is unreachable — that
/// tie-break is part of the contract.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    descriptors: Vec<ActionDescriptor>,
    index: HashMap<&'static str, usize>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in canvas action set
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for descriptor in default_actions() {
            registry.register(descriptor);
        }
        registry
    }

    /// Register a descriptor. Idempotent per id: a re-registration replaces
    /// the existing descriptor in place, keeping its key-lookup position.
    pub fn register(&mut self, descriptor: ActionDescriptor) {
        match self.index.get(descriptor.id) {
            Some(&slot) => self.descriptors[slot] = descriptor,
            None => {
                self.index.insert(descriptor.id, self.descriptors.len());
                self.descriptors.push(descriptor);
            }
        }
    }

    pub fn lookup(&self, id: &str) -> Option<&ActionDescriptor> {
        self.index.get(id).map(|&slot| &self.descriptors[slot])
    }

    /// First descriptor (in registration order) whose key test matches
    pub fn lookup_by_key(&self, key: &KeyPress) -> Option<&ActionDescriptor> {
        self.descriptors
            .iter()
            .find(|descriptor| descriptor.key_test.is_some_and(|test| test(key)))
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// What a dispatch did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A delta was merged into the working state
    Applied {
        /// Whether an undo checkpoint was recorded
        committed: bool,
    },
    /// Predicate or view-only gate rejected the action, or no key binding
    /// matched. Normal, silent.
    Skipped,
    /// The action took over and will apply state out-of-band
    Deferred,
}

/// The mutable working state a dispatch merges into
pub struct DispatchContext<'a> {
    pub scene: &'a mut Scene,
    pub view: &'a mut ViewState,
    pub files: &'a mut FileMap,
    pub history: &'a mut UndoHistory,
    pub capabilities: &'a mut dyn AppCapabilities,
    pub scheduler: &'a TaskScheduler,
}

/// Resolves triggered actions and applies their deltas
#[derive(Debug, Default)]
pub struct ActionDispatcher {
    registry: ActionRegistry,
}

impl ActionDispatcher {
    pub fn new(registry: ActionRegistry) -> Self {
        Self { registry }
    }

    /// Dispatcher over the built-in action set
    pub fn with_defaults() -> Self {
        Self::new(ActionRegistry::with_defaults())
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ActionRegistry {
        &mut self.registry
    }

    /// Dispatch an action by id.
    ///
    /// A rejected predicate is a silent `Skipped`, not an error. A perform
    /// failure leaves scene, view, files and history untouched apart from a
    /// failure toast, and is reported as `DispatchError::ActionFailed`.
    pub fn dispatch(
        &self,
        action_id: &str,
        value: Option<serde_json::Value>,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(descriptor) = self.registry.lookup(action_id) else {
            debug_assert!(false, "dispatched unregistered action `{}`", action_id);
            log::error!("dispatched unregistered action `{}`", action_id);
            return Err(DispatchError::UnknownAction(action_id.to_owned()));
        };
        self.run(descriptor, value, ctx)
    }

    /// Dispatch whatever action the key event resolves to; `Skipped` when no
    /// binding matches
    pub fn dispatch_key(
        &self,
        key: &KeyPress,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<DispatchOutcome, DispatchError> {
        match self.registry.lookup_by_key(key) {
            Some(descriptor) => self.run(descriptor, None, ctx),
            None => Ok(DispatchOutcome::Skipped),
        }
    }

    fn run(
        &self,
        descriptor: &ActionDescriptor,
        value: Option<serde_json::Value>,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<DispatchOutcome, DispatchError> {
        if ctx.view.view_mode_enabled && !descriptor.view_mode {
            return Ok(DispatchOutcome::Skipped);
        }
        if let Some(predicate) = descriptor.predicate {
            if !predicate(ctx.scene.elements(), ctx.view, &*ctx.capabilities) {
                log::debug!("action `{}` skipped by predicate", descriptor.id);
                return Ok(DispatchOutcome::Skipped);
            }
        }

        let input = ActionInput {
            elements: ctx.scene.elements(),
            view: &*ctx.view,
            files: &*ctx.files,
            value: value.as_ref(),
            capabilities: &mut *ctx.capabilities,
            scheduler: ctx.scheduler,
        };
        match (descriptor.perform)(input) {
            Ok(PerformOutcome::Deferred) => Ok(DispatchOutcome::Deferred),
            Ok(PerformOutcome::Delta(delta)) => {
                let committed = delta.commit_to_history;
                if let Some(elements) = delta.elements {
                    ctx.scene.replace_all_elements(elements);
                }
                if let Some(view) = delta.view {
                    *ctx.view = view;
                }
                if let Some(files) = delta.files {
                    *ctx.files = files;
                }
                if committed {
                    ctx.history.record(Checkpoint {
                        elements: ctx.scene.elements().to_vec(),
                        view: ctx.view.clone(),
                    });
                }
                Ok(DispatchOutcome::Applied { committed })
            }
            Err(err) => {
                log::error!("action `{}` failed: {}", descriptor.id, err);
                ctx.view.toast = Some(Toast::new(format!("{} failed", descriptor.label)));
                Err(DispatchError::ActionFailed {
                    id: descriptor.id,
                    source: err,
                })
            }
        }
    }
}
