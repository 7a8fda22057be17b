//! Undo log for document mutations made while applying a theme

use crate::dom::{Document, ListenerId, NodeId};

/// One reversible mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Undo {
    RemoveClass(NodeId, &'static str),
    RestoreStyle {
        node: NodeId,
        property: &'static str,
        previous: Option<String>,
    },
    RemoveListener(NodeId, ListenerId),
}

impl Undo {
    fn revert(self, doc: &mut Document) {
        match self {
            Undo::RemoveClass(node, class) => {
                doc.remove_class(node, class);
            }
            Undo::RestoreStyle {
                node,
                property,
                previous: Some(value),
            } => {
                doc.set_style(node, property, &value);
            }
            Undo::RestoreStyle {
                node,
                property,
                previous: None,
            } => {
                doc.remove_style(node, property);
            }
            Undo::RemoveListener(node, id) => {
                doc.remove_listener(node, id);
            }
        }
    }
}

/// Mutations recorded in the order they were made
#[derive(Debug, Default)]
pub(super) struct DisposalList {
    entries: Vec<Undo>,
}

impl DisposalList {
    pub(super) fn push(&mut self, undo: Undo) {
        self.entries.push(undo);
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Revert everything, newest first, leaving the list empty
    pub(super) fn run(&mut self, doc: &mut Document) {
        while let Some(undo) = self.entries.pop() {
            undo.revert(doc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_order_restores_original_value() {
        let mut doc = Document::new("https://example.com");
        let body = doc.body();
        doc.set_style(body, "filter", "none");

        let mut list = DisposalList::default();
        let first = doc.set_style(body, "filter", "a");
        list.push(Undo::RestoreStyle {
            node: body,
            property: "filter",
            previous: first,
        });
        let second = doc.set_style(body, "filter", "b");
        list.push(Undo::RestoreStyle {
            node: body,
            property: "filter",
            previous: second,
        });

        list.run(&mut doc);
        assert_eq!(doc.style(body, "filter"), Some("none"));
        assert_eq!(list.len(), 0);
    }
}
