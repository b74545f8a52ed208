//! Color-scheme preference from the freedesktop settings portal.
//!
//! A dedicated thread subscribes to
//! `org.freedesktop.portal.Settings.SettingChanged` and keeps the last
//! delivered `color-scheme` value in a cell the GUI thread reads
//! synchronously.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use futures_util::StreamExt;
use tracing::{debug, warn};
use zbus::zvariant::{OwnedValue, Value};

use keywarden_platform::appearance::ColorScheme;
use keywarden_platform::events::DesktopEvent;

const PORTAL_SERVICE: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const PORTAL_SETTINGS: &str = "org.freedesktop.portal.Settings";
const APPEARANCE_NAMESPACE: &str = "org.freedesktop.appearance";
const COLOR_SCHEME_KEY: &str = "color-scheme";

/// Last color-scheme preference delivered by the portal, shared between the
/// listener thread and the GUI thread.
#[derive(Debug, Default)]
pub struct ColorSchemeCell(AtomicU8);

impl ColorSchemeCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, scheme: ColorScheme) {
        self.0.store(scheme as u8, Ordering::Relaxed);
    }

    pub fn load(&self) -> ColorScheme {
        ColorScheme::from_portal(self.0.load(Ordering::Relaxed) as u32)
    }
}

/// Spawn the listener thread. It runs until the session-bus connection drops
/// or the process exits; a missing bus or portal only disables updates.
pub(crate) fn spawn_listener(
    cell: Arc<ColorSchemeCell>,
    events: Sender<DesktopEvent>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("settings-portal".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    warn!("failed to start settings portal runtime: {}", e);
                    return;
                }
            };
            if let Err(e) = runtime.block_on(listen(&cell, &events)) {
                warn!("settings portal listener stopped: {}", e);
            }
        })
}

async fn listen(cell: &ColorSchemeCell, events: &Sender<DesktopEvent>) -> zbus::Result<()> {
    let connection = zbus::Connection::session().await?;

    match read_color_scheme(&connection).await {
        Ok(Some(initial)) => {
            debug!("initial color-scheme preference: {:?}", initial);
            cell.store(initial);
        }
        Ok(None) => {}
        Err(e) => debug!("settings portal read failed: {}", e),
    }

    let rule = zbus::MatchRule::builder()
        .msg_type(zbus::message::Type::Signal)
        .interface(PORTAL_SETTINGS)?
        .member("SettingChanged")?
        .build();

    let mut stream = zbus::MessageStream::for_match_rule(rule, &connection, None).await?;

    while let Some(msg) = stream.next().await {
        let Ok(msg) = msg else { continue };
        // signal body: (s namespace, s key, v value)
        let body = msg.body();
        let Ok((namespace, key, value)) = body.deserialize::<(String, String, OwnedValue)>()
        else {
            continue;
        };
        if namespace != APPEARANCE_NAMESPACE || key != COLOR_SCHEME_KEY {
            continue;
        }
        if let Ok(Value::U32(raw)) = value.downcast_ref::<Value>() {
            let scheme = ColorScheme::from_portal(raw);
            debug!("color-scheme preference changed: {:?}", scheme);
            cell.store(scheme);
            let _ = events.send(DesktopEvent::ColorSchemeChanged(scheme));
        }
    }

    Ok(())
}

/// One-shot read of the current preference; `None` when the portal does not
/// expose the key.
async fn read_color_scheme(connection: &zbus::Connection) -> zbus::Result<Option<ColorScheme>> {
    let reply = connection
        .call_method(
            Some(PORTAL_SERVICE),
            PORTAL_PATH,
            Some(PORTAL_SETTINGS),
            "Read",
            &(APPEARANCE_NAMESPACE, COLOR_SCHEME_KEY),
        )
        .await?;

    // the payload is a variant wrapping a variant wrapping a u32
    let body = reply.body();
    if let Ok(outer) = body.deserialize::<OwnedValue>() {
        if let Ok(Value::U32(raw)) = outer.downcast_ref::<Value>() {
            return Ok(Some(ColorScheme::from_portal(raw)));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_defaults_to_no_preference() {
        assert_eq!(ColorSchemeCell::new().load(), ColorScheme::NoPreference);
    }

    #[test]
    fn test_cell_keeps_last_stored_value() {
        let cell = ColorSchemeCell::new();
        cell.store(ColorScheme::PreferDark);
        assert_eq!(cell.load(), ColorScheme::PreferDark);
        cell.store(ColorScheme::PreferLight);
        assert_eq!(cell.load(), ColorScheme::PreferLight);
        cell.store(ColorScheme::NoPreference);
        assert_eq!(cell.load(), ColorScheme::NoPreference);
    }
}
