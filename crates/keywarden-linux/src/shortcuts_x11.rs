//! Global shortcut registry backed by X11 key grabs.
//!
//! A grab only fires for the exact modifier state it names, and the lock
//! keys (CapsLock is the Lock mask, NumLock conventionally Mod2) can be in
//! any state when a shortcut is pressed. Each binding is therefore grabbed
//! and ungrabbed as the same fixed set of four modifier-mask variants.

use std::collections::HashMap;

use tracing::{debug, warn};
use xcb::x;

use keywarden_platform::shortcuts::{Shortcut, ShortcutError};

use crate::keysyms;

/// The four grab variants for a modifier mask.
fn grab_variants(mods: x::ModMask) -> [x::ModMask; 4] {
    [
        mods,
        mods | x::ModMask::N2,
        mods | x::ModMask::LOCK,
        mods | x::ModMask::N2 | x::ModMask::LOCK,
    ]
}

/// Event-state bits considered when matching key presses: everything except
/// the lock keys and mouse buttons.
fn relevant_state(state: x::KeyButMask) -> u32 {
    let relevant = x::KeyButMask::SHIFT
        | x::KeyButMask::CONTROL
        | x::KeyButMask::MOD1
        | x::KeyButMask::MOD4;
    (state & relevant).bits()
}

/// A resolved shortcut as the X server sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeShortcut {
    pub keycode: x::Keycode,
    pub modifiers: x::ModMask,
}

/// Name -> native binding table. Pure bookkeeping; the X11 calls live in
/// [`X11Shortcuts`].
#[derive(Debug, Default)]
struct ShortcutTable {
    entries: HashMap<String, NativeShortcut>,
}

impl ShortcutTable {
    /// Name of a different entry already occupying this binding.
    fn owner_of(&self, native: NativeShortcut, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(entry_name, entry)| **entry == native && entry_name.as_str() != name)
            .map(|(entry_name, _)| entry_name.as_str())
    }

    fn insert(&mut self, name: &str, native: NativeShortcut) {
        self.entries.insert(name.to_string(), native);
    }

    fn remove(&mut self, name: &str) -> Option<NativeShortcut> {
        self.entries.remove(name)
    }

    /// Entry matching a key press, after masking the event state down to the
    /// relevant modifier bits.
    fn matching(&self, keycode: x::Keycode, state: x::KeyButMask) -> Option<&str> {
        let masked = relevant_state(state);
        self.entries
            .iter()
            .find(|(_, entry)| entry.keycode == keycode && entry.modifiers.bits() == masked)
            .map(|(entry_name, _)| entry_name.as_str())
    }
}

/// Global shortcut registry holding the active X11 key grabs.
#[derive(Debug, Default)]
pub struct X11Shortcuts {
    table: ShortcutTable,
}

impl X11Shortcuts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` for `shortcut`, grabbing the key on the root window.
    ///
    /// Fails without side effect if another name owns the same binding or
    /// the server refuses any grab variant.
    pub fn register(
        &mut self,
        conn: &xcb::Connection,
        root: x::Window,
        name: &str,
        shortcut: Shortcut,
    ) -> Result<(), ShortcutError> {
        let sym = keysyms::keysym(shortcut.key).ok_or(ShortcutError::UnmappedKey)?;
        let keycode = match keysyms::keycode_for_keysym(conn, sym) {
            Ok(Some(keycode)) => keycode,
            Ok(None) => return Err(ShortcutError::UnmappedKey),
            Err(e) => {
                warn!("keyboard mapping lookup failed: {:#}", e);
                return Err(ShortcutError::GrabFailed);
            }
        };
        let native = NativeShortcut {
            keycode,
            modifiers: keysyms::modifier_mask(shortcut.mods),
        };

        if let Some(owner) = self.table.owner_of(native, name) {
            return Err(ShortcutError::AlreadyRegistered {
                owner: owner.to_string(),
            });
        }

        // Re-registering a name replaces its previous binding.
        self.unregister(conn, root, name);

        let cookies = grab_variants(native.modifiers).map(|modifiers| {
            conn.send_request_checked(&x::GrabKey {
                owner_events: true,
                grab_window: root,
                modifiers,
                key: native.keycode,
                pointer_mode: x::GrabMode::Async,
                keyboard_mode: x::GrabMode::Async,
            })
        });

        let mut failed = false;
        for cookie in cookies {
            if let Err(e) = conn.check_request(cookie) {
                debug!("key grab refused: {}", e);
                failed = true;
            }
        }

        if failed {
            // Release whichever variants did succeed.
            ungrab(conn, root, native);
            let _ = conn.flush();
            return Err(ShortcutError::GrabFailed);
        }

        self.table.insert(name, native);
        debug!(
            "registered global shortcut {} (keycode {})",
            name, native.keycode
        );
        Ok(())
    }

    /// Drop `name`'s grab. Returns false if the name was never registered.
    pub fn unregister(&mut self, conn: &xcb::Connection, root: x::Window, name: &str) -> bool {
        let Some(native) = self.table.remove(name) else {
            return false;
        };
        ungrab(conn, root, native);
        let _ = conn.flush();
        debug!("unregistered global shortcut {}", name);
        true
    }

    /// Match a raw key press against the table, returning the owning name.
    pub fn dispatch(&self, keycode: x::Keycode, state: x::KeyButMask) -> Option<&str> {
        self.table.matching(keycode, state)
    }
}

fn ungrab(conn: &xcb::Connection, root: x::Window, native: NativeShortcut) {
    for modifiers in grab_variants(native.modifiers) {
        conn.send_request(&x::UngrabKey {
            key: native.keycode,
            grab_window: root,
            modifiers,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl_shift_k() -> NativeShortcut {
        NativeShortcut {
            keycode: 45,
            modifiers: x::ModMask::CONTROL | x::ModMask::SHIFT,
        }
    }

    #[test]
    fn test_collision_held_by_other_name() {
        let mut table = ShortcutTable::default();
        table.insert("show-entries", ctrl_shift_k());

        assert_eq!(
            table.owner_of(ctrl_shift_k(), "autotype"),
            Some("show-entries")
        );
        // the first registration is untouched by the rejected attempt
        assert_eq!(
            table.matching(45, x::KeyButMask::CONTROL | x::KeyButMask::SHIFT),
            Some("show-entries")
        );
    }

    #[test]
    fn test_same_name_may_rebind() {
        let mut table = ShortcutTable::default();
        table.insert("show-entries", ctrl_shift_k());

        assert_eq!(table.owner_of(ctrl_shift_k(), "show-entries"), None);

        let replacement = NativeShortcut {
            keycode: 46,
            modifiers: x::ModMask::CONTROL,
        };
        table.insert("show-entries", replacement);

        assert_eq!(table.entries.len(), 1);
        assert_eq!(
            table.matching(45, x::KeyButMask::CONTROL | x::KeyButMask::SHIFT),
            None
        );
        assert_eq!(table.matching(46, x::KeyButMask::CONTROL), Some("show-entries"));
    }

    #[test]
    fn test_remove_unknown_name() {
        let mut table = ShortcutTable::default();
        table.insert("show-entries", ctrl_shift_k());

        assert_eq!(table.remove("autotype"), None);
        assert_eq!(table.entries.len(), 1);
    }

    #[test]
    fn test_dispatch_ignores_lock_key_state() {
        let mut table = ShortcutTable::default();
        table.insert("show-entries", ctrl_shift_k());

        // CapsLock and NumLock held down must not prevent the match
        let state = x::KeyButMask::CONTROL
            | x::KeyButMask::SHIFT
            | x::KeyButMask::LOCK
            | x::KeyButMask::MOD2;
        assert_eq!(table.matching(45, state), Some("show-entries"));

        // a further real modifier does prevent it
        let state = x::KeyButMask::CONTROL | x::KeyButMask::SHIFT | x::KeyButMask::MOD4;
        assert_eq!(table.matching(45, state), None);

        // wrong keycode never matches
        assert_eq!(
            table.matching(44, x::KeyButMask::CONTROL | x::KeyButMask::SHIFT),
            None
        );
    }

    #[test]
    fn test_grab_variants_cover_lock_combinations() {
        let base = x::ModMask::CONTROL | x::ModMask::SHIFT;
        let variants = grab_variants(base);

        assert_eq!(variants[0], base);
        assert_eq!(variants[1], base | x::ModMask::N2);
        assert_eq!(variants[2], base | x::ModMask::LOCK);
        assert_eq!(variants[3], base | x::ModMask::N2 | x::ModMask::LOCK);

        // all four are distinct
        for (i, a) in variants.iter().enumerate() {
            for b in &variants[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
