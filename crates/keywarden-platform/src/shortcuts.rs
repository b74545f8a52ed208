use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Portable key identifier for global shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A printable Latin-1 character; letter case is ignored.
    Char(char),
    /// Function key F1..=F35.
    F(u8),
    Escape,
    Tab,
    Backspace,
    Return,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Left,
    Up,
    Right,
    Down,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// A key plus modifier set, as configured by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shortcut {
    pub key: Key,
    pub mods: Modifiers,
}

impl Shortcut {
    pub fn new(key: Key, mods: Modifiers) -> Self {
        Self { key, mods }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortcutError {
    /// The exact key+modifier combination is held by another shortcut.
    #[error("global shortcut already registered to {owner}")]
    AlreadyRegistered { owner: String },

    /// The window system refused the reservation.
    #[error("could not register global shortcut")]
    GrabFailed,

    /// No key on the current keyboard layout produces this key.
    #[error("no native key mapping for this shortcut")]
    UnmappedKey,
}
