//! Collaboration-aware scene teardown.
//!
//! "Create new scene" behaves differently depending on whether a remote
//! session is live. Without one, the reset is an ordinary, undoable delta.
//! With one, resetting synchronously would sync an empty scene to the other
//! participants, so the teardown runs a multi-step protocol instead: confirm
//! with the user, optionally save the scene to a local file, stop the
//! session, and only then reset — deferred, so the termination can settle
//! first.
//!
//! Once the deferred reset is scheduled it always fires; the coordinator
//! keeps no cancellation token for it (last-action-wins — the reset reads
//! fire-time state, so it folds any interleaved edits into the clear).

use crate::capabilities::AppCapabilities;
use crate::element::{self, SceneElement};
use crate::error::ActionError;
use crate::scene::{FileMap, Scene};
use crate::scheduler::{DeferredTask, TaskId, TaskScheduler};
use crate::snapshot;
use crate::util::time;
use crate::view_state::{Toast, ViewState};

/// Settle delay between stopping the session and clearing local state
pub const RESET_DELAY_MS: u64 = 100;

/// Prompt shown before tearing down a live session
pub const CONFIRM_DISCARD_SESSION_PROMPT: &str = "Do you want to save the current scene to your \
     local files before creating a new one? This will also exit collaboration.";

/// Protocol steps of a collaborating teardown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TeardownPhase {
    #[default]
    Idle,
    ConfirmPending,
    SavingLocal,
    StoppingSession,
    ScheduledReset,
}

/// How a teardown run concluded
#[derive(Debug)]
pub enum TeardownOutcome {
    /// No session was active: an ordinary delta to apply right away
    Immediate(crate::action::StateDelta),
    /// Session teardown ran; the reset fires out-of-band
    Scheduled {
        task: TaskId,
        saved_locally: bool,
    },
}

/// Runs the teardown protocol for one trigger
#[derive(Debug, Default)]
pub struct TeardownCoordinator {
    phase: TeardownPhase,
}

impl TeardownCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TeardownPhase {
        self.phase
    }

    fn transition(&mut self, next: TeardownPhase) {
        log::debug!("teardown {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    /// Run the protocol against the current working state.
    ///
    /// Not collaborating: returns the synchronous reset delta. Collaborating:
    /// confirms, optionally saves locally (failure logged, never aborts),
    /// stops the session when the capability resolves one (warning + skip
    /// otherwise), strips the session id from the share link, and schedules
    /// the deferred reset.
    pub fn run(
        &mut self,
        elements: &[SceneElement],
        view: &ViewState,
        files: &FileMap,
        capabilities: &mut dyn AppCapabilities,
        scheduler: &TaskScheduler,
    ) -> Result<TeardownOutcome, ActionError> {
        let collaborating = capabilities
            .collaboration()
            .is_some_and(|session| session.is_active());
        if !collaborating {
            return Ok(TeardownOutcome::Immediate(reset_delta(
                elements,
                view,
                capabilities,
            )));
        }

        self.transition(TeardownPhase::ConfirmPending);
        let save_requested = capabilities.confirm_discard_session(CONFIRM_DISCARD_SESSION_PROMPT);

        let mut saved_locally = false;
        if save_requested {
            self.transition(TeardownPhase::SavingLocal);
            saved_locally = save_scene_locally(elements, view, files, capabilities);
        }

        self.transition(TeardownPhase::StoppingSession);
        match capabilities.collaboration() {
            Some(session) => {
                session.stop(false);
                capabilities.strip_session_from_share_link();
            }
            None => {
                log::warn!("collaboration session unavailable; skipping termination");
            }
        }

        self.transition(TeardownPhase::ScheduledReset);
        let task = scheduler.schedule_in(RESET_DELAY_MS, DeferredTask::ResetScene { saved_locally });
        self.transition(TeardownPhase::Idle);
        Ok(TeardownOutcome::Scheduled {
            task,
            saved_locally,
        })
    }
}

/// Serialize the scene and offer it as a local download. Failures are logged
/// and reported as `false`; teardown continues regardless.
fn save_scene_locally(
    elements: &[SceneElement],
    view: &ViewState,
    files: &FileMap,
    capabilities: &mut dyn AppCapabilities,
) -> bool {
    let serialized = match snapshot::serialize_scene(elements, view, files) {
        Ok(serialized) => serialized,
        Err(err) => {
            log::warn!("failed to serialize scene before teardown: {}", err);
            return false;
        }
    };
    let filename = snapshot::collab_export_filename(time::timestamp_ms());
    match capabilities.save_file_locally(&filename, snapshot::SNAPSHOT_MIME, &serialized) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("failed to save scene before teardown: {}", err);
            false
        }
    }
}

/// The synchronous reset: soft-delete every element, default view state with
/// pinned fields preserved, empty file map, current-version marker cleared.
/// Undoable (committed to history) because nothing external depends on it.
pub fn reset_delta(
    elements: &[SceneElement],
    view: &ViewState,
    capabilities: &mut dyn AppCapabilities,
) -> crate::action::StateDelta {
    capabilities.clear_asset_cache();
    capabilities.set_current_editing_version_id(None);
    crate::action::StateDelta {
        elements: Some(element::soft_delete_all(elements)),
        view: Some(view.cleared()),
        files: Some(FileMap::new()),
        commit_to_history: true,
    }
}

/// Apply a matured deferred reset against the state current *now*.
///
/// Everything is re-read at fire time: elements appended since scheduling are
/// cleared too, and the current-version marker is re-cleared regardless of
/// what it pointed to when the reset was scheduled.
pub fn apply_deferred_reset(
    saved_locally: bool,
    scene: &mut Scene,
    view: &mut ViewState,
    files: &mut FileMap,
    capabilities: &mut dyn AppCapabilities,
) {
    capabilities.clear_asset_cache();
    capabilities.set_current_editing_version_id(None);

    scene.replace_all_elements(Vec::new());
    files.clear();

    let mut next = view.cleared();
    next.toast = Some(Toast::new(if saved_locally {
        "Scene saved and left collaboration"
    } else {
        "Left collaboration"
    }));
    *view = next;

    capabilities.request_repaint();
}

/// Drain and apply every matured deferred task. Hosts call this from their
/// frame loop with the current time.
pub fn process_due_tasks(
    scheduler: &TaskScheduler,
    now_ms: u64,
    scene: &mut Scene,
    view: &mut ViewState,
    files: &mut FileMap,
    capabilities: &mut dyn AppCapabilities,
) {
    for task in scheduler.due(now_ms) {
        match task {
            DeferredTask::ResetScene { saved_locally } => {
                apply_deferred_reset(saved_locally, scene, view, files, capabilities);
            }
        }
    }
}
