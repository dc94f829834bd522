use thiserror::Error;

/// Errors raised by the persisted key-value area
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage read failed: {0}")]
    Read(String),

    #[error("storage write failed: {0}")]
    Write(String),

    #[error("storage quota exceeded")]
    QuotaExceeded,
}

/// A failure reported by a host capability (e.g. the local file save hook)
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CapabilityError {
    pub message: String,
}

impl CapabilityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that an action's perform function can produce.
///
/// None of these are fatal: the dispatcher converts them into a toast and a log
/// line, leaving scene and view state untouched.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("local save failed: {0}")]
    LocalSave(#[from] CapabilityError),
}

/// Errors surfaced by `ActionDispatcher::dispatch`
#[derive(Debug, Error)]
pub enum DispatchError {
    /// An unregistered action id was dispatched. Programmer error: asserts in
    /// debug builds, logged and ignored by hosts in release builds.
    #[error("unknown action `{0}`")]
    UnknownAction(String),

    #[error("action `{id}` failed: {source}")]
    ActionFailed {
        id: &'static str,
        #[source]
        source: ActionError,
    },
}
