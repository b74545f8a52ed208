//! Registers a demo global shortcut and prints triggered events.
//!
//! Run inside an X11 session:
//!
//! ```text
//! cargo run -p keywarden-linux --example global_shortcuts
//! ```

#[cfg(target_os = "linux")]
fn main() -> anyhow::Result<()> {
    use std::sync::mpsc;

    use keywarden_linux::desktop::LinuxDesktop;
    use keywarden_platform::autostart::AppInfo;
    use keywarden_platform::events::DesktopEvent;
    use keywarden_platform::shortcuts::{Key, Modifiers, Shortcut};
    use keywarden_platform::DesktopServices;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let app = AppInfo {
        name: "keywarden".to_string(),
        display_name: "KeyWarden".to_string(),
        qualified_name: "org.keywarden.KeyWarden".to_string(),
        generic_name: "Password Manager".to_string(),
        wm_class: "keywarden".to_string(),
        categories: "Utility;Security;".to_string(),
        mime_types: "application/x-keywarden;".to_string(),
    };

    let (tx, rx) = mpsc::channel();
    let mut desktop = LinuxDesktop::connect(app, tx)?;
    desktop.start_settings_listener();

    let shortcut = Shortcut::new(
        Key::Char('k'),
        Modifiers {
            ctrl: true,
            shift: true,
            ..Modifiers::default()
        },
    );
    desktop.register_global_shortcut("show-entries", shortcut)?;

    println!("dark mode: {}", desktop.is_dark_mode());
    match desktop.is_capslock_enabled() {
        Ok(on) => println!("caps lock: {}", on),
        Err(e) => println!("caps lock: {}", e),
    }
    println!("press Ctrl+Shift+K anywhere (Ctrl+C here to quit)");

    loop {
        let event = desktop.connection().wait_for_event()?;
        desktop.handle_event(&event);
        while let Ok(notification) = rx.try_recv() {
            match notification {
                DesktopEvent::GlobalShortcutTriggered(name) => {
                    println!("shortcut triggered: {}", name);
                }
                DesktopEvent::ColorSchemeChanged(scheme) => {
                    println!("color scheme changed: {:?}", scheme);
                }
            }
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn main() {
    eprintln!("this example only runs on Linux/X11");
}
