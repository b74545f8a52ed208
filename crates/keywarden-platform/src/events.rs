use crate::appearance::ColorScheme;

/// Notifications pushed from the platform layer to the GUI event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesktopEvent {
    /// A registered global shortcut was pressed; carries the shortcut name.
    GlobalShortcutTriggered(String),
    /// The desktop-wide color-scheme preference changed.
    ColorSchemeChanged(ColorScheme),
}
