//! Caps-lock indicator state via the XKB extension.

use anyhow::{Context, Result};
use xcb::xkb;

use keywarden_platform::PlatformError;

/// Caps-lock bit in the XKB indicator state word.
const CAPS_LOCK_INDICATOR: u32 = 1;

/// Negotiate the XKB extension. Returns false when the server lacks it.
pub(crate) fn use_extension(conn: &xcb::Connection) -> Result<bool> {
    let cookie = conn.send_request(&xkb::UseExtension {
        wanted_major: 1,
        wanted_minor: 0,
    });
    let reply = conn
        .wait_for_reply(cookie)
        .context("xkb UseExtension request failed")?;
    Ok(reply.supported())
}

/// Query the caps-lock indicator on the core keyboard.
pub(crate) fn is_capslock_enabled(conn: &xcb::Connection) -> Result<bool, PlatformError> {
    let cookie = conn.send_request(&xkb::GetIndicatorState {
        device_spec: xkb::Id::UseCoreKbd as xkb::DeviceSpec,
    });
    match conn.wait_for_reply(cookie) {
        Ok(reply) => Ok(reply.state() & CAPS_LOCK_INDICATOR != 0),
        Err(e) => Err(PlatformError::Display(e.to_string())),
    }
}
