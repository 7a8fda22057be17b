//! Theme system for mood-driven page styling
//!
//! Each mood maps to exactly one theme. Themes control:
//! - Page, text and accent colors
//! - Typography (font family) for the generated stylesheet

mod color;

pub use color::{Color, ColorError};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of supported moods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Chill,
    Focus,
    Energetic,
    Vintage,
}

/// Every marker class a themed page can carry on its body
pub const MARKER_CLASSES: [&str; 4] = [
    "moodify-chill",
    "moodify-focus",
    "moodify-energetic",
    "moodify-vintage",
];

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Chill, Mood::Focus, Mood::Energetic, Mood::Vintage];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Chill => "chill",
            Mood::Focus => "focus",
            Mood::Energetic => "energetic",
            Mood::Vintage => "vintage",
        }
    }

    /// Class added to the page body while this mood is active
    pub fn marker_class(&self) -> &'static str {
        MARKER_CLASSES[*self as usize]
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Returned when a string names no supported mood
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mood: {0}")]
pub struct UnknownMood(pub String);

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}

/// A color/typography theme
///
/// Immutable once built. `contrast` is derived from `text` at construction
/// and is what button, nav and footer text is painted with: black when the
/// text is white, white for any other text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ThemeRecord", into = "ThemeRecord")]
pub struct Theme {
    background: Color,
    text: Color,
    accent: Color,
    font: String,
    display_name: String,
    contrast: Color,
}

impl Theme {
    pub fn new(
        background: Color,
        text: Color,
        accent: Color,
        font: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            background,
            text,
            accent,
            font: font.into(),
            display_name: display_name.into(),
            contrast: if text.channels() == Color::WHITE.channels() {
                Color::BLACK
            } else {
                Color::WHITE
            },
        }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn text(&self) -> Color {
        self.text
    }

    pub fn accent(&self) -> Color {
        self.accent
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Text color for surfaces painted in the accent or text color
    pub fn contrast(&self) -> Color {
        self.contrast
    }

    /// True when the theme uses white text (and therefore a dark code-block palette)
    pub fn is_light_text(&self) -> bool {
        self.contrast == Color::BLACK
    }

    /// Chill theme (soft blues)
    pub fn chill() -> Self {
        Self::new(
            Color::rgb(0xA7, 0xC7, 0xE7),
            Color::rgb(0x1A, 0x1A, 0x1A),
            Color::rgb(0x6B, 0x9B, 0xD2),
            "Poppins",
            "Chill",
        )
    }

    /// Focus theme (neutral greys, monospace)
    pub fn focus() -> Self {
        Self::new(
            Color::rgb(0xE0, 0xE0, 0xE0),
            Color::rgb(0x11, 0x11, 0x11),
            Color::rgb(0x4A, 0x4A, 0x4A),
            "Roboto Mono",
            "Focus",
        )
    }

    /// Energetic theme (coral with white text)
    pub fn energetic() -> Self {
        Self::new(
            Color::rgb(0xFF, 0x6F, 0x61),
            Color::WHITE,
            Color::rgb(0xFF, 0x47, 0x57),
            "Bebas Neue",
            "Energetic",
        )
    }

    /// Vintage theme (parchment and saddle brown)
    pub fn vintage() -> Self {
        Self::new(
            Color::rgb(0xF4, 0xE1, 0xD2),
            Color::rgb(0x3B, 0x2F, 0x2F),
            Color::rgb(0x8B, 0x45, 0x13),
            "Playfair Display",
            "Vintage",
        )
    }
}

/// Flat wire/storage form of a theme
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeRecord {
    background: Color,
    text: Color,
    accent: Color,
    font: String,
    display_name: String,
}

impl From<ThemeRecord> for Theme {
    fn from(r: ThemeRecord) -> Self {
        Theme::new(r.background, r.text, r.accent, r.font, r.display_name)
    }
}

impl From<Theme> for ThemeRecord {
    fn from(t: Theme) -> Self {
        Self {
            background: t.background,
            text: t.text,
            accent: t.accent,
            font: t.font,
            display_name: t.display_name,
        }
    }
}

/// The theme currently active on a page, with the mood it was requested under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedTheme {
    pub theme: Theme,
    pub mood: String,
}

impl AppliedTheme {
    /// The requested mood, if it names a supported one
    pub fn known_mood(&self) -> Option<Mood> {
        self.mood.parse().ok()
    }
}

/// Registry of the built-in mood themes
pub struct ThemeRegistry {
    themes: [Theme; 4],
}

impl ThemeRegistry {
    /// Create a new registry with built-in themes
    pub fn new() -> Self {
        Self {
            themes: [
                Theme::chill(),
                Theme::focus(),
                Theme::energetic(),
                Theme::vintage(),
            ],
        }
    }

    /// Theme for a mood; total over the closed set
    pub fn lookup(&self, mood: Mood) -> &Theme {
        &self.themes[mood as usize]
    }

    /// Look up by mood name, for untrusted input
    pub fn get(&self, name: &str) -> Option<&Theme> {
        name.parse().ok().map(|mood| self.lookup(mood))
    }

    /// List all themes in mood order
    pub fn list(&self) -> impl Iterator<Item = (Mood, &Theme)> {
        Mood::ALL.into_iter().map(move |m| (m, self.lookup(m)))
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
