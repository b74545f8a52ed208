// Linux platform implementations

#[cfg(target_os = "linux")]
pub mod desktop;

#[cfg(target_os = "linux")]
pub mod shortcuts_x11;

#[cfg(target_os = "linux")]
pub mod keysyms;

#[cfg(target_os = "linux")]
pub mod capslock;

#[cfg(target_os = "linux")]
pub mod autostart;

#[cfg(target_os = "linux")]
pub mod settings_portal;
