//! Owned desktop-integration context for X11 sessions.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use tracing::{info, warn};
use xcb::x;

use keywarden_platform::appearance::{self, Rgb};
use keywarden_platform::autostart::AppInfo;
use keywarden_platform::events::DesktopEvent;
use keywarden_platform::shortcuts::{Shortcut, ShortcutError};
use keywarden_platform::{DesktopServices, PlatformError};

use crate::autostart::Autostart;
use crate::capslock;
use crate::settings_portal::{self, ColorSchemeCell};
use crate::shortcuts_x11::X11Shortcuts;

/// Whether this session runs a Wayland compositor (possibly with XWayland).
pub fn is_wayland_session() -> bool {
    let session_type = std::env::var("XDG_SESSION_TYPE").unwrap_or_default();
    let wayland_display = std::env::var("WAYLAND_DISPLAY").unwrap_or_default();
    session_type == "wayland" || !wayland_display.is_empty()
}

/// Whether an X display (native or XWayland) is reachable.
pub fn has_x11_display() -> bool {
    std::env::var("DISPLAY")
        .ok()
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false)
}

/// Linux/X11 implementation of the desktop services consumed by the GUI.
///
/// One instance is created at application startup and dropped at shutdown;
/// it owns the X connection, the global-shortcut grabs, and the settings
/// portal listener.
pub struct LinuxDesktop {
    conn: xcb::Connection,
    root: x::Window,
    xkb_available: bool,
    shortcuts: X11Shortcuts,
    autostart: Autostart,
    color_scheme: Arc<ColorSchemeCell>,
    style_window_color: Option<Rgb>,
    events: Sender<DesktopEvent>,
    settings_listener: Option<thread::JoinHandle<()>>,
}

impl LinuxDesktop {
    /// Connect to the X server and build the integration context.
    pub fn connect(app: AppInfo, events: Sender<DesktopEvent>) -> Result<Self> {
        let (conn, screen_num) =
            xcb::Connection::connect_with_extensions(None, &[], &[xcb::Extension::Xkb])
                .context("failed to connect to X11 display")?;

        let setup = conn.get_setup();
        let screen = setup
            .roots()
            .nth(screen_num as usize)
            .context("no X11 screen found")?;
        let root = screen.root();

        let xkb_available = match capslock::use_extension(&conn) {
            Ok(supported) => supported,
            Err(e) => {
                warn!("xkb handshake failed: {:#}", e);
                false
            }
        };

        let autostart = Autostart::new(app)?;

        info!("desktop integration connected (screen {})", screen_num);

        Ok(Self {
            conn,
            root,
            xkb_available,
            shortcuts: X11Shortcuts::new(),
            autostart,
            color_scheme: Arc::new(ColorSchemeCell::new()),
            style_window_color: None,
            events,
            settings_listener: None,
        })
    }

    /// Start the D-Bus listener delivering color-scheme updates. Later calls
    /// are no-ops.
    pub fn start_settings_listener(&mut self) {
        if self.settings_listener.is_some() {
            return;
        }
        match settings_portal::spawn_listener(self.color_scheme.clone(), self.events.clone()) {
            Ok(handle) => self.settings_listener = Some(handle),
            Err(e) => warn!("failed to spawn settings portal listener: {}", e),
        }
    }

    /// Record the GUI style's window-background color, the dark-mode
    /// fallback when the desktop reports no explicit preference.
    pub fn set_style_window_color(&mut self, color: Rgb) {
        self.style_window_color = Some(color);
    }

    /// Native event filter: feed every raw X event through here and skip
    /// further processing when it returns true.
    pub fn handle_event(&self, event: &xcb::Event) -> bool {
        let xcb::Event::X(x::Event::KeyPress(key_press)) = event else {
            return false;
        };
        let Some(name) = self
            .shortcuts
            .dispatch(key_press.detail(), key_press.state())
        else {
            return false;
        };
        let _ = self
            .events
            .send(DesktopEvent::GlobalShortcutTriggered(name.to_string()));
        true
    }

    /// Connection accessor for callers driving their own event loop.
    pub fn connection(&self) -> &xcb::Connection {
        &self.conn
    }
}

impl DesktopServices for LinuxDesktop {
    fn is_dark_mode(&self) -> bool {
        appearance::effective_dark_mode(self.color_scheme.load(), self.style_window_color)
    }

    fn is_capslock_enabled(&self) -> Result<bool, PlatformError> {
        if is_wayland_session() {
            return Err(PlatformError::Unsupported("caps lock state on wayland"));
        }
        if !self.xkb_available {
            return Err(PlatformError::Unsupported("caps lock state without xkb"));
        }
        capslock::is_capslock_enabled(&self.conn)
    }

    fn is_launch_at_startup_enabled(&self) -> bool {
        self.autostart.is_enabled()
    }

    fn set_launch_at_startup(&self, enable: bool) {
        self.autostart.set_enabled(enable);
    }

    fn register_global_shortcut(
        &mut self,
        name: &str,
        shortcut: Shortcut,
    ) -> Result<(), ShortcutError> {
        self.shortcuts.register(&self.conn, self.root, name, shortcut)
    }

    fn unregister_global_shortcut(&mut self, name: &str) -> bool {
        self.shortcuts.unregister(&self.conn, self.root, name)
    }
}
