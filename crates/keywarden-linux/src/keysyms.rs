//! Portable key to X11 keysym and keycode resolution.

use anyhow::{Context, Result};
use xcb::x;

use keywarden_platform::shortcuts::{Key, Modifiers};

// Keysym values from X11/keysymdef.h. Latin-1 keysyms equal their character
// codes, so only the function and editing keys need constants.
const XK_BACKSPACE: x::Keysym = 0xff08;
const XK_TAB: x::Keysym = 0xff09;
const XK_RETURN: x::Keysym = 0xff0d;
const XK_ESCAPE: x::Keysym = 0xff1b;
const XK_HOME: x::Keysym = 0xff50;
const XK_LEFT: x::Keysym = 0xff51;
const XK_UP: x::Keysym = 0xff52;
const XK_RIGHT: x::Keysym = 0xff53;
const XK_DOWN: x::Keysym = 0xff54;
const XK_PAGE_UP: x::Keysym = 0xff55;
const XK_PAGE_DOWN: x::Keysym = 0xff56;
const XK_END: x::Keysym = 0xff57;
const XK_INSERT: x::Keysym = 0xff63;
const XK_DELETE: x::Keysym = 0xffff;
const XK_F1: x::Keysym = 0xffbe;

/// Resolve a portable key to an X11 keysym.
///
/// Letters fold to their lowercase keysym; shortcut configurations name keys
/// independent of shift state.
pub fn keysym(key: Key) -> Option<x::Keysym> {
    match key {
        Key::Char(c) => {
            let code = c.to_ascii_lowercase() as u32;
            // printable Latin-1 range only
            (0x20..=0xff).contains(&code).then_some(code)
        }
        Key::F(n) if (1..=35).contains(&n) => Some(XK_F1 + (n as u32 - 1)),
        Key::F(_) => None,
        Key::Escape => Some(XK_ESCAPE),
        Key::Tab => Some(XK_TAB),
        Key::Backspace => Some(XK_BACKSPACE),
        Key::Return => Some(XK_RETURN),
        Key::Insert => Some(XK_INSERT),
        Key::Delete => Some(XK_DELETE),
        Key::Home => Some(XK_HOME),
        Key::End => Some(XK_END),
        Key::PageUp => Some(XK_PAGE_UP),
        Key::PageDown => Some(XK_PAGE_DOWN),
        Key::Left => Some(XK_LEFT),
        Key::Up => Some(XK_UP),
        Key::Right => Some(XK_RIGHT),
        Key::Down => Some(XK_DOWN),
    }
}

/// Find the keycode producing `keysym` in the server's current keyboard
/// mapping. Returns `None` when no key on the layout produces it.
pub fn keycode_for_keysym(
    conn: &xcb::Connection,
    keysym: x::Keysym,
) -> Result<Option<x::Keycode>> {
    let setup = conn.get_setup();
    let min = setup.min_keycode();
    let max = setup.max_keycode();

    let cookie = conn.send_request(&x::GetKeyboardMapping {
        first_keycode: min,
        count: max - min + 1,
    });
    let reply = conn
        .wait_for_reply(cookie)
        .context("keyboard mapping query failed")?;

    let per_keycode = reply.keysyms_per_keycode() as usize;
    if per_keycode == 0 {
        return Ok(None);
    }

    for (i, syms) in reply.keysyms().chunks(per_keycode).enumerate() {
        if syms.contains(&keysym) {
            return Ok(Some(min + i as u8));
        }
    }
    Ok(None)
}

/// Native modifier mask for a portable modifier set. Alt is Mod1 and the
/// Super/meta key Mod4, per the conventional X11 modifier layout.
pub fn modifier_mask(mods: Modifiers) -> x::ModMask {
    let mut mask = x::ModMask::empty();
    if mods.shift {
        mask = mask | x::ModMask::SHIFT;
    }
    if mods.ctrl {
        mask = mask | x::ModMask::CONTROL;
    }
    if mods.alt {
        mask = mask | x::ModMask::N1;
    }
    if mods.meta {
        mask = mask | x::ModMask::N4;
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_fold_to_lowercase_keysym() {
        assert_eq!(keysym(Key::Char('k')), Some(0x006b));
        assert_eq!(keysym(Key::Char('K')), Some(0x006b));
        assert_eq!(keysym(Key::Char('7')), Some(0x0037));
    }

    #[test]
    fn test_function_keys() {
        assert_eq!(keysym(Key::F(1)), Some(0xffbe));
        assert_eq!(keysym(Key::F(12)), Some(0xffc9));
        assert_eq!(keysym(Key::F(0)), None);
        assert_eq!(keysym(Key::F(36)), None);
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(keysym(Key::Escape), Some(0xff1b));
        assert_eq!(keysym(Key::PageDown), Some(0xff56));
        assert_eq!(keysym(Key::Delete), Some(0xffff));
    }

    #[test]
    fn test_control_characters_have_no_keysym() {
        assert_eq!(keysym(Key::Char('\n')), None);
        assert_eq!(keysym(Key::Char('\u{7f}')), None);
    }

    #[test]
    fn test_modifier_mask_bits() {
        let mods = Modifiers {
            ctrl: true,
            shift: true,
            ..Modifiers::default()
        };
        assert_eq!(
            modifier_mask(mods).bits(),
            (x::ModMask::CONTROL | x::ModMask::SHIFT).bits()
        );

        let meta_alt = Modifiers {
            alt: true,
            meta: true,
            ..Modifiers::default()
        };
        assert_eq!(
            modifier_mask(meta_alt).bits(),
            (x::ModMask::N1 | x::ModMask::N4).bits()
        );

        assert_eq!(modifier_mask(Modifiers::default()).bits(), 0);
    }
}
