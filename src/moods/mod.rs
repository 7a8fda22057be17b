//! Mood profiles
//!
//! One table entry per mood pairing the supplemental CSS with the DOM
//! behavior run when the theme is applied, so the two cannot drift apart.

use crate::css::{Block, Rule};
use crate::theme::{Mood, Theme};

/// Inline-style toggle driven by hover events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverToggle {
    pub property: &'static str,
    pub enter: &'static str,
    pub leave: &'static str,
}

/// Per-element mutations performed on apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomBehavior {
    pub selector: &'static str,
    pub inline: &'static [(&'static str, &'static str)],
    pub hover: Option<HoverToggle>,
}

/// Everything a mood contributes beyond its theme colors
pub struct MoodProfile {
    pub mood: Mood,
    pub supplement: fn(&Theme) -> Vec<Block>,
    pub behavior: DomBehavior,
}

static PROFILES: [MoodProfile; 4] = [
    MoodProfile {
        mood: Mood::Chill,
        supplement: chill_css,
        behavior: DomBehavior {
            selector: "img, .card, .panel",
            inline: &[("transition", "transform 0.3s ease")],
            hover: Some(HoverToggle {
                property: "transform",
                enter: "scale(1.02)",
                leave: "scale(1)",
            }),
        },
    },
    MoodProfile {
        mood: Mood::Focus,
        supplement: focus_css,
        behavior: DomBehavior {
            selector: "h1, h2, h3",
            inline: &[("position", "relative"), ("padding-left", "10px")],
            hover: None,
        },
    },
    MoodProfile {
        mood: Mood::Energetic,
        supplement: energetic_css,
        behavior: DomBehavior {
            selector: "button, .btn, a",
            inline: &[("transition", "all 0.2s ease")],
            hover: Some(HoverToggle {
                property: "transform",
                enter: "translateY(-2px)",
                leave: "translateY(0)",
            }),
        },
    },
    MoodProfile {
        mood: Mood::Vintage,
        supplement: vintage_css,
        behavior: DomBehavior {
            selector: "img",
            inline: &[("filter", "sepia(0.2) contrast(1.1)")],
            hover: None,
        },
    },
];

/// Profile for a mood
pub fn profile(mood: Mood) -> &'static MoodProfile {
    &PROFILES[mood as usize]
}

const CARDS: &str = ".card, .panel, .box";

fn chill_css(_theme: &Theme) -> Vec<Block> {
    vec![
        Rule::new("*").decl("transition", "all 0.3s ease").into(),
        Rule::new("body").decl("filter", "brightness(1.1)").into(),
        Rule::new(CARDS)
            .decl("box-shadow", "0 4px 15px rgba(167, 199, 231, 0.3)")
            .decl("border-radius", "12px")
            .into(),
    ]
}

fn focus_css(theme: &Theme) -> Vec<Block> {
    vec![
        Rule::new("body").decl("filter", "contrast(1.1)").into(),
        Rule::new(CARDS)
            .decl("border-radius", "4px")
            .decl("box-shadow", "0 2px 8px rgba(0, 0, 0, 0.1)")
            .into(),
        Rule::new("h1, h2, h3")
            .decl("border-bottom", format!("2px solid {}", theme.accent()))
            .decl("padding-bottom", "5px")
            .into(),
    ]
}

fn energetic_css(_theme: &Theme) -> Vec<Block> {
    let frame = |transform: &str| vec![("transform".to_string(), transform.to_string())];
    vec![
        Rule::new("body")
            .decl("animation", "subtlePulse 3s ease-in-out infinite")
            .into(),
        Block::Keyframes {
            name: "subtlePulse".to_string(),
            frames: vec![
                ("0%, 100%".to_string(), frame("scale(1)")),
                ("50%".to_string(), frame("scale(1.001)")),
            ],
        },
        Rule::new(CARDS)
            .decl("box-shadow", "0 6px 20px rgba(255, 111, 97, 0.4)")
            .decl("border-radius", "8px")
            .into(),
        Rule::new("button:hover, .btn:hover")
            .decl("transform", "translateY(-2px)")
            .decl("box-shadow", "0 4px 12px rgba(255, 111, 97, 0.6)")
            .into(),
    ]
}

fn vintage_css(theme: &Theme) -> Vec<Block> {
    let border = format!("2px solid {}", theme.accent());
    vec![
        Rule::new("body")
            .decl("filter", "sepia(0.1) contrast(1.05)")
            .into(),
        Rule::new(CARDS)
            .decl("box-shadow", "0 4px 20px rgba(139, 69, 19, 0.2)")
            .decl("border-radius", "0")
            .decl("border", border)
            .into(),
        Rule::new("img")
            .decl("border", format!("3px solid {}", theme.accent()))
            .decl("border-radius", "0")
            .into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_mood() {
        for mood in Mood::ALL {
            assert_eq!(profile(mood).mood, mood);
        }
    }

    #[test]
    fn test_every_mood_has_a_body_rule() {
        for mood in Mood::ALL {
            let blocks = (profile(mood).supplement)(&Theme::focus());
            let has_body = blocks
                .iter()
                .any(|b| matches!(b, Block::Rule(r) if r.selectors == "body"));
            assert!(has_body, "{mood}");
        }
    }

    #[test]
    fn test_hover_behaviors() {
        assert!(profile(Mood::Chill).behavior.hover.is_some());
        assert!(profile(Mood::Energetic).behavior.hover.is_some());
        assert!(profile(Mood::Focus).behavior.hover.is_none());
        assert_eq!(
            profile(Mood::Vintage).behavior.inline,
            &[("filter", "sepia(0.2) contrast(1.1)")]
        );
    }
}
