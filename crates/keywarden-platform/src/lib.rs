//! Cross-platform desktop-integration surface for KeyWarden.
//!
//! The GUI layer talks to the operating system through [`DesktopServices`];
//! each platform crate supplies the implementation and pushes notifications
//! back through the event channel given at construction.

pub mod appearance;
pub mod autostart;
pub mod events;
pub mod shortcuts;

use thiserror::Error;

use crate::shortcuts::{Shortcut, ShortcutError};

#[derive(Debug, Error)]
pub enum PlatformError {
    /// The capability exists in the API surface but not on this platform or
    /// session type. Distinct from "queried and found off".
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),

    #[error("display server error: {0}")]
    Display(String),
}

/// Operating-system services consumed by the GUI layer.
pub trait DesktopServices {
    /// Whether the desktop environment prefers a dark interface.
    fn is_dark_mode(&self) -> bool;

    /// Current caps-lock indicator state.
    fn is_capslock_enabled(&self) -> Result<bool, PlatformError>;

    /// Whether an autostart entry for the application exists.
    fn is_launch_at_startup_enabled(&self) -> bool;

    /// Create or remove the autostart entry. Failures are logged rather than
    /// returned; the worst outcome is a missing entry.
    fn set_launch_at_startup(&self, enable: bool);

    /// Reserve a key+modifier combination system-wide under `name`.
    ///
    /// Re-registering an existing name replaces its binding. A combination
    /// held by a different name is rejected.
    fn register_global_shortcut(
        &mut self,
        name: &str,
        shortcut: Shortcut,
    ) -> Result<(), ShortcutError>;

    /// Release the binding held by `name`. Returns false for an unknown name.
    fn unregister_global_shortcut(&mut self, name: &str) -> bool;
}
