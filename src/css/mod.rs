//! Stylesheet generation
//!
//! Builds the injected stylesheet for a theme: a fixed set of base rules
//! with the theme's colors substituted, followed by the mood's own blocks.

use std::fmt::{self, Write};

use crate::moods;
use crate::theme::{Color, Mood, Theme};

/// Monospace family forced onto code blocks regardless of theme font
const CODE_FONT: &str = "'Roboto Mono', monospace";

const CODE_BG_DARK: Color = Color::rgb(0x2C, 0x2C, 0x2C);
const CODE_BG_LIGHT: Color = Color::rgb(0xF5, 0xF5, 0xF5);

/// A single selector block; every declaration is emitted as `!important`
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selectors: String,
    pub declarations: Vec<(String, String)>,
}

impl Rule {
    pub fn new(selectors: &str) -> Self {
        Self {
            selectors: selectors.to_string(),
            declarations: Vec::new(),
        }
    }

    /// Add a declaration
    pub fn decl(mut self, property: &str, value: impl fmt::Display) -> Self {
        self.declarations
            .push((property.to_string(), value.to_string()));
        self
    }
}

/// A stylesheet block
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Comment(String),
    Rule(Rule),
    /// `@keyframes name { stop { prop: value; } ... }`
    Keyframes {
        name: String,
        frames: Vec<(String, Vec<(String, String)>)>,
    },
}

impl From<Rule> for Block {
    fn from(rule: Rule) -> Self {
        Block::Rule(rule)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::Comment(text) => writeln!(f, "/* {} */", text),
            Block::Rule(rule) => {
                writeln!(f, "{} {{", rule.selectors)?;
                for (property, value) in &rule.declarations {
                    writeln!(f, "  {}: {} !important;", property, value)?;
                }
                writeln!(f, "}}")
            }
            Block::Keyframes { name, frames } => {
                writeln!(f, "@keyframes {} {{", name)?;
                for (stop, declarations) in frames {
                    write!(f, "  {} {{", stop)?;
                    for (property, value) in declarations {
                        write!(f, " {}: {};", property, value)?;
                    }
                    writeln!(f, " }}")?;
                }
                writeln!(f, "}}")
            }
        }
    }
}

fn font_stack(theme: &Theme) -> String {
    format!("{}, sans-serif", theme.font())
}

/// Base rules shared by every mood
fn base_rules(theme: &Theme) -> Vec<Block> {
    let bg = theme.background();
    let text = theme.text();
    let accent = theme.accent();
    let contrast = theme.contrast();
    let font = font_stack(theme);
    let border = format!("1px solid {}", accent);
    let (code_bg, code_fg) = if theme.is_light_text() {
        (CODE_BG_DARK, Color::WHITE)
    } else {
        (CODE_BG_LIGHT, Color::BLACK)
    };

    vec![
        Rule::new("body, html")
            .decl("background-color", bg)
            .decl("color", text)
            .decl("font-family", &font)
            .decl("transition", "all 0.3s ease")
            .into(),
        Rule::new("main, .main, #main, .content, .container, .wrapper")
            .decl("background-color", bg)
            .decl("color", text)
            .into(),
        Rule::new("h1, h2, h3, h4, h5, h6, .h1, .h2, .h3, .h4, .h5, .h6")
            .decl("color", text)
            .decl("font-family", &font)
            .into(),
        Rule::new("a, .link").decl("color", accent).into(),
        Rule::new("a:hover, .link:hover")
            .decl("color", text)
            .decl("opacity", "0.8")
            .into(),
        Rule::new(r#"button, .btn, input[type="button"], input[type="submit"]"#)
            .decl("background-color", accent)
            .decl("color", contrast)
            .decl("border", &border)
            .decl("font-family", &font)
            .into(),
        Rule::new("button:hover, .btn:hover")
            .decl("background-color", text)
            .decl("color", bg)
            .into(),
        Rule::new("input, textarea, select")
            .decl("background-color", bg)
            .decl("color", text)
            .decl("border", &border)
            .decl("font-family", &font)
            .into(),
        Rule::new(".card, .panel, .box, .container, .section")
            .decl("background-color", bg)
            .decl("color", text)
            .decl("border", &border)
            .into(),
        Rule::new("nav, .nav, .navbar, .navigation")
            .decl("background-color", accent)
            .decl("color", contrast)
            .into(),
        Rule::new("nav a, .nav a, .navbar a")
            .decl("color", contrast)
            .into(),
        Rule::new(".sidebar, .aside, aside")
            .decl("background-color", bg)
            .decl("color", text)
            .decl("border-right", &border)
            .into(),
        Rule::new("footer, .footer")
            .decl("background-color", accent)
            .decl("color", contrast)
            .into(),
        Rule::new("table")
            .decl("background-color", bg)
            .decl("color", text)
            .into(),
        Rule::new("th, td")
            .decl("background-color", bg)
            .decl("color", text)
            .decl("border", &border)
            .into(),
        Rule::new("code, pre, .code")
            .decl("background-color", code_bg)
            .decl("color", code_fg)
            .decl("font-family", CODE_FONT)
            .into(),
        // scrollbar rules carry !important like every other base rule
        Rule::new("::-webkit-scrollbar").decl("width", "8px").into(),
        Rule::new("::-webkit-scrollbar-track")
            .decl("background", bg)
            .into(),
        Rule::new("::-webkit-scrollbar-thumb")
            .decl("background", accent)
            .decl("border-radius", "4px")
            .into(),
        Rule::new("::-webkit-scrollbar-thumb:hover")
            .decl("background", text)
            .into(),
    ]
}

/// Generate the stylesheet for `theme`.
///
/// `mood` selects the supplemental blocks; `None` (a mood outside the
/// supported set) yields the base rules only.
pub fn generate(theme: &Theme, mood: Option<Mood>) -> String {
    let mut blocks = vec![Block::Comment(format!(
        "Moodify Theme: {}",
        theme.display_name()
    ))];
    blocks.extend(base_rules(theme));

    if let Some(mood) = mood {
        blocks.push(Block::Comment(format!("Mood: {}", mood)));
        blocks.extend((moods::profile(mood).supplement)(theme));
    }

    let mut css = String::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            css.push('\n');
        }
        // Writing into a String cannot fail
        let _ = write!(css, "{}", block);
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeRegistry;

    #[test]
    fn test_generation_is_deterministic() {
        let registry = ThemeRegistry::new();
        for mood in Mood::ALL {
            let theme = registry.lookup(mood);
            assert_eq!(generate(theme, Some(mood)), generate(theme, Some(mood)));
        }
    }

    #[test]
    fn test_focus_scenario() {
        let theme = Theme::new(
            "#E0E0E0".parse().unwrap(),
            "#111111".parse().unwrap(),
            "#4A4A4A".parse().unwrap(),
            "Roboto Mono",
            "Focus",
        );
        let css = generate(&theme, Some(Mood::Focus));

        assert!(css.starts_with("/* Moodify Theme: Focus */\n"));
        assert!(css.contains(
            "body, html {\n  background-color: #E0E0E0 !important;\n  color: #111111 !important;\n  font-family: Roboto Mono, sans-serif !important;"
        ));
        assert!(css.contains("body {\n  filter: contrast(1.1) !important;\n}"));
        assert!(css.contains("border-bottom: 2px solid #4A4A4A !important;"));
    }

    #[test]
    fn test_colors_are_substituted_as_written() {
        let theme: Theme = serde_json::from_value(serde_json::json!({
            "background": "#e0e0e0",
            "text": "#111",
            "accent": {"r": 74, "g": 74, "b": 74},
            "font": "Roboto Mono",
            "displayName": "Focus",
        }))
        .unwrap();
        let css = generate(&theme, Some(Mood::Focus));

        assert!(css.contains("background-color: #e0e0e0 !important;"));
        assert!(css.contains("color: #111 !important;"));
        assert!(css.contains("border: 1px solid rgb(74, 74, 74) !important;"));
        assert!(css.contains("border-bottom: 2px solid rgb(74, 74, 74) !important;"));
        assert!(!css.contains("#E0E0E0"));
    }

    #[test]
    fn test_contrast_color_on_accent_surfaces() {
        let css = generate(&Theme::energetic(), None);
        assert!(css.contains(
            "nav, .nav, .navbar, .navigation {\n  background-color: #FF4757 !important;\n  color: #000000 !important;\n}"
        ));
        // dark code palette for white text
        assert!(css.contains(
            "code, pre, .code {\n  background-color: #2C2C2C !important;\n  color: #FFFFFF !important;"
        ));

        let css = generate(&Theme::vintage(), None);
        assert!(css.contains(
            "footer, .footer {\n  background-color: #8B4513 !important;\n  color: #FFFFFF !important;\n}"
        ));
        assert!(css.contains(
            "background-color: #F5F5F5 !important;\n  color: #000000 !important;"
        ));
    }

    #[test]
    fn test_unknown_mood_has_no_supplement() {
        let theme = Theme::chill();
        let base = generate(&theme, None);
        let full = generate(&theme, Some(Mood::Chill));

        assert!(!base.contains("/* Mood:"));
        assert!(!base.contains("brightness"));
        assert!(full.starts_with(&base));
        assert!(full.contains("filter: brightness(1.1) !important;"));
    }

    #[test]
    fn test_energetic_keyframes() {
        let css = generate(&Theme::energetic(), Some(Mood::Energetic));
        assert!(css.contains("animation: subtlePulse 3s ease-in-out infinite !important;"));
        assert!(css.contains(
            "@keyframes subtlePulse {\n  0%, 100% { transform: scale(1); }\n  50% { transform: scale(1.001); }\n}"
        ));
    }

    #[test]
    fn test_every_rule_is_important() {
        let css = generate(&Theme::vintage(), Some(Mood::Vintage));
        for line in css.lines().filter(|l| l.starts_with("  ") && l.ends_with(';')) {
            assert!(line.ends_with(" !important;"), "{line}");
        }
    }
}
