use serde::{Deserialize, Serialize};

/// Window-background lightness below which a widget style counts as dark.
pub const DARK_WINDOW_LIGHTNESS: u8 = 110;

/// Desktop-wide light/dark preference.
///
/// The discriminants mirror the `org.freedesktop.appearance` `color-scheme`
/// payload: 0 no preference, 1 prefer dark, 2 prefer light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorScheme {
    #[default]
    NoPreference = 0,
    PreferDark = 1,
    PreferLight = 2,
}

impl ColorScheme {
    /// Map a raw portal payload; out-of-range values mean no preference.
    pub fn from_portal(value: u32) -> Self {
        match value {
            1 => ColorScheme::PreferDark,
            2 => ColorScheme::PreferLight,
            _ => ColorScheme::NoPreference,
        }
    }
}

/// An sRGB color sample, typically the style's window background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// HSL lightness scaled to 0..=255.
    pub fn lightness(self) -> u8 {
        let max = self.r.max(self.g).max(self.b) as u16;
        let min = self.r.min(self.g).min(self.b) as u16;
        ((max + min) / 2) as u8
    }

    /// Whether a window background of this color reads as a dark style.
    pub fn is_dark(self) -> bool {
        self.lightness() < DARK_WINDOW_LIGHTNESS
    }
}

/// Resolution rule for the dark-mode query: an explicit desktop preference
/// wins; otherwise the style's window background decides; with neither,
/// assume a light interface.
pub fn effective_dark_mode(pref: ColorScheme, style_window: Option<Rgb>) -> bool {
    match pref {
        ColorScheme::NoPreference => style_window.map(Rgb::is_dark).unwrap_or(false),
        pref => pref == ColorScheme::PreferDark,
    }
}
