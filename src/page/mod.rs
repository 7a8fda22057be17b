//! Page-resident theme application
//!
//! A `PageThemeApplier` owns the injected stylesheet of one document and a
//! record of every other mutation it made there, so `reset` can put the
//! page back exactly as it found it.

mod disposal;

use tracing::{debug, info};

use crate::css;
use crate::dom::{Document, EventKind, NodeId, StyleSetter};
use crate::moods;
use crate::theme::{AppliedTheme, Mood, Theme, MARKER_CLASSES};

use disposal::{DisposalList, Undo};

/// Reserved id of the injected style element
pub const STYLE_ELEMENT_ID: &str = "moodify-theme-styles";

/// Theme state for one page context
#[derive(Debug, Default)]
pub struct PageThemeApplier {
    current: Option<AppliedTheme>,
    style_node: Option<NodeId>,
    disposals: DisposalList,
}

impl PageThemeApplier {
    pub fn new() -> Self {
        Self::default()
    }

    /// The theme currently applied, if any
    pub fn current(&self) -> Option<&AppliedTheme> {
        self.current.as_ref()
    }

    /// Apply `theme` under `mood`, replacing whatever was applied before.
    ///
    /// Moods outside the supported set still get the base stylesheet but no
    /// marker class and no element behaviors.
    pub fn apply(&mut self, doc: &mut Document, theme: Theme, mood: &str) {
        let known: Option<Mood> = mood.parse().ok();
        info!(theme = %theme.display_name(), mood, "Applying theme");

        self.disposals.run(doc);

        let style = self.style_element(doc);
        doc.set_text(style, &css::generate(&theme, known));

        if let Some(mood) = known {
            let body = doc.body();
            if doc.add_class(body, mood.marker_class()) {
                self.disposals
                    .push(Undo::RemoveClass(body, mood.marker_class()));
            }
            self.run_behavior(doc, mood);
        }

        self.current = Some(AppliedTheme {
            theme,
            mood: mood.to_string(),
        });
    }

    /// Remove every trace of the applied theme. Safe to call when nothing is applied.
    pub fn reset(&mut self, doc: &mut Document) {
        info!("Resetting page theme");

        self.disposals.run(doc);
        self.remove_style_nodes(doc);

        let body = doc.body();
        for class in MARKER_CLASSES {
            doc.remove_class(body, class);
        }

        self.current = None;
    }

    /// The one style element this page keeps: the tracked node when it is
    /// still attached, else a new one in `<head>`. Strays are removed.
    fn style_element(&mut self, doc: &mut Document) -> NodeId {
        let kept = self.style_node.filter(|&node| doc.is_attached(node));
        if kept.is_none() {
            self.remove_style_nodes(doc);
        }

        let strays: Vec<NodeId> = doc
            .elements_by_id(STYLE_ELEMENT_ID)
            .into_iter()
            .filter(|&node| Some(node) != kept)
            .collect();
        if !strays.is_empty() {
            debug!(count = strays.len(), "Removing stray theme style nodes");
        }
        for node in strays {
            doc.remove(node);
        }

        let style = kept.unwrap_or_else(|| {
            let style = doc.create_element("style");
            doc.append_child(doc.head(), style);
            style
        });
        doc.set_id(style, STYLE_ELEMENT_ID);
        doc.set_attribute(style, "type", "text/css");
        self.style_node = Some(style);
        style
    }

    /// Remove the tracked style node and any stray element carrying the reserved id
    fn remove_style_nodes(&mut self, doc: &mut Document) {
        if let Some(node) = self.style_node.take() {
            doc.remove(node);
        }
        let strays = doc.elements_by_id(STYLE_ELEMENT_ID);
        if !strays.is_empty() {
            debug!(count = strays.len(), "Removing stray theme style nodes");
        }
        for node in strays {
            doc.remove(node);
        }
    }

    fn run_behavior(&mut self, doc: &mut Document, mood: Mood) {
        let behavior = &moods::profile(mood).behavior;
        let targets = doc.query_selector_all(behavior.selector);

        for &node in &targets {
            for &(property, value) in behavior.inline {
                let previous = doc.set_style(node, property, value);
                self.disposals.push(Undo::RestoreStyle {
                    node,
                    property,
                    previous,
                });
            }

            if let Some(hover) = behavior.hover {
                // hovering leaves inline transform behind; restore it on teardown
                let previous = doc.style(node, hover.property).map(str::to_string);
                self.disposals.push(Undo::RestoreStyle {
                    node,
                    property: hover.property,
                    previous,
                });

                for (event, value) in [
                    (EventKind::MouseEnter, hover.enter),
                    (EventKind::MouseLeave, hover.leave),
                ] {
                    let id = doc.add_listener(
                        node,
                        event,
                        StyleSetter {
                            property: hover.property.to_string(),
                            value: value.to_string(),
                        },
                    );
                    self.disposals.push(Undo::RemoveListener(node, id));
                }
            }
        }

        debug!(
            %mood,
            elements = targets.len(),
            mutations = self.disposals.len(),
            "Ran mood behavior"
        );
    }
}
