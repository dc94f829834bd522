use egui::{Event, Key, Modifiers};

/// A pressed key with its modifier state, as fed to action key tests.
///
/// `modifiers.command` is the Ctrl-or-Cmd abstraction: Cmd on macOS, Ctrl
/// elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A key press with no modifiers held
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    /// Extract a key press from an egui input event. Returns `None` for
    /// releases, repeats-only data and non-keyboard events.
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } => Some(Self::new(*key, *modifiers)),
            _ => None,
        }
    }
}
