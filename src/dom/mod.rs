//! In-memory document model
//!
//! A small arena DOM holding just what page theming touches: tags, ids,
//! classes, attributes, inline styles, text and style-setting listeners.

mod sample;

pub use sample::sample_page;

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// A document shared between a page context and its observers
pub type SharedDocument = Arc<Mutex<Document>>;

/// Handle to an element in a [`Document`]
///
/// Handles to removed elements go stale and never alias a later element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

/// Handle to a registered event listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    MouseEnter,
    MouseLeave,
}

/// Listener action: set one inline style property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSetter {
    pub property: String,
    pub value: String,
}

#[derive(Debug, Clone)]
struct Listener {
    id: ListenerId,
    event: EventKind,
    action: StyleSetter,
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: Vec<Listener>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
            listeners: Vec::new(),
        }
    }
}

/// Arena slot; `generation` is bumped each time the slot is freed
#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// A page document rooted at `<html>` with `<head>` and `<body>`
#[derive(Debug, Clone)]
pub struct Document {
    url: String,
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    next_listener: u64,
}

impl Document {
    /// Create an empty document for `url`
    pub fn new(url: &str) -> Self {
        let root = NodeId {
            index: 0,
            generation: 0,
        };
        let mut doc = Self {
            url: url.to_string(),
            slots: vec![Slot {
                generation: 0,
                element: Some(Element::new("html")),
            }],
            free: Vec::new(),
            root,
            head: root,
            body: root,
            next_listener: 0,
        };
        doc.head = doc.create_element("head");
        doc.body = doc.create_element("body");
        doc.append_child(doc.root, doc.head);
        doc.append_child(doc.root, doc.body);
        doc
    }

    /// Wrap for sharing with a page task
    pub fn shared(self) -> SharedDocument {
        Arc::new(Mutex::new(self))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Live elements, attached or not
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Arena slots allocated so far, live or free
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        self.slots
            .get(node.index)
            .filter(|s| s.generation == node.generation)
            .and_then(|s| s.element.as_ref())
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.slots
            .get_mut(node.index)
            .filter(|s| s.generation == node.generation)
            .and_then(|s| s.element.as_mut())
    }

    /// Create a detached element, reusing a freed slot when one exists
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.element = Some(Element::new(tag));
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            element: Some(Element::new(tag)),
        });
        NodeId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Append `child` to `parent`, detaching it from any previous parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.element(parent).is_none() || self.element(child).is_none() {
            return;
        }
        self.detach(child);
        if let Some(el) = self.element_mut(child) {
            el.parent = Some(parent);
        }
        if let Some(el) = self.element_mut(parent) {
            el.children.push(child);
        }
    }

    /// Remove an element and its subtree from the document and free them.
    /// Handles into the removed subtree go stale.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.root || self.element(node).is_none() {
            return;
        }
        self.detach(node);

        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            let slot = &mut self.slots[n.index];
            if let Some(el) = slot.element.take() {
                stack.extend(el.children);
            }
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(n.index);
        }
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.element(node).and_then(|e| e.parent) else {
            return;
        };
        if let Some(el) = self.element_mut(parent) {
            el.children.retain(|c| *c != node);
        }
        if let Some(el) = self.element_mut(node) {
            el.parent = None;
        }
    }

    /// Whether the element is reachable from the root
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == self.root {
                return true;
            }
            current = self.element(n).and_then(|e| e.parent);
        }
        false
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.element(node)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) {
        if let Some(el) = self.element_mut(node) {
            el.id = Some(id.to_string());
        }
    }

    pub fn element_id(&self, node: NodeId) -> Option<&str> {
        self.element(node).and_then(|e| e.id.as_deref())
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(el) = self.element_mut(node) {
            el.text = text.to_string();
        }
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.text.as_str())
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|e| e.attributes.get(name))
            .map(String::as_str)
    }

    /// Add a class; returns false if it was already present
    pub fn add_class(&mut self, node: NodeId, class: &str) -> bool {
        match self.element_mut(node) {
            Some(el) if !el.classes.iter().any(|c| c == class) => {
                el.classes.push(class.to_string());
                true
            }
            _ => false,
        }
    }

    /// Remove a class; returns false if it was absent
    pub fn remove_class(&mut self, node: NodeId, class: &str) -> bool {
        match self.element_mut(node) {
            Some(el) => {
                let before = el.classes.len();
                el.classes.retain(|c| c != class);
                el.classes.len() != before
            }
            None => false,
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        self.element(node)
            .map(|e| e.classes.as_slice())
            .unwrap_or(&[])
    }

    /// Set an inline style property, returning the previous value
    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Option<String> {
        self.element_mut(node)
            .and_then(|el| el.style.insert(property.to_string(), value.to_string()))
    }

    pub fn remove_style(&mut self, node: NodeId, property: &str) -> Option<String> {
        self.element_mut(node)
            .and_then(|el| el.style.remove(property))
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node)
            .and_then(|e| e.style.get(property))
            .map(String::as_str)
    }

    /// Register a listener; listeners are never deduplicated
    pub fn add_listener(
        &mut self,
        node: NodeId,
        event: EventKind,
        action: StyleSetter,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        if let Some(el) = self.element_mut(node) {
            el.listeners.push(Listener { id, event, action });
        }
        id
    }

    pub fn remove_listener(&mut self, node: NodeId, id: ListenerId) -> bool {
        match self.element_mut(node) {
            Some(el) => {
                let before = el.listeners.len();
                el.listeners.retain(|l| l.id != id);
                el.listeners.len() != before
            }
            None => false,
        }
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.element(node).map_or(0, |e| e.listeners.len())
    }

    /// Fire an event at an element, running its listeners in registration order
    pub fn dispatch(&mut self, node: NodeId, event: EventKind) {
        let Some(el) = self.element_mut(node) else {
            return;
        };
        let actions: Vec<StyleSetter> = el
            .listeners
            .iter()
            .filter(|l| l.event == event)
            .map(|l| l.action.clone())
            .collect();
        for action in actions {
            el.style.insert(action.property, action.value);
        }
    }

    /// Every attached element carrying `id`, duplicates included
    pub fn elements_by_id(&self, id: &str) -> Vec<NodeId> {
        self.attached()
            .filter(|(_, el)| el.id.as_deref() == Some(id))
            .map(|(n, _)| n)
            .collect()
    }

    /// Attached elements matching a selector list, in document order.
    ///
    /// Supports comma-separated compound selectors built from a tag or `*`,
    /// `.class`, `#id` and `[attr="value"]`. Selectors with combinators match nothing.
    pub fn query_selector_all(&self, selectors: &str) -> Vec<NodeId> {
        let compiled: Vec<Compound> = selectors
            .split(',')
            .filter_map(|s| Compound::parse(s.trim()))
            .collect();
        if compiled.is_empty() {
            return Vec::new();
        }
        self.attached()
            .filter(|(_, el)| compiled.iter().any(|c| c.matches(el)))
            .map(|(n, _)| n)
            .collect()
    }

    /// Pre-order walk from the root, root included
    fn attached(&self) -> impl Iterator<Item = (NodeId, &Element)> + '_ {
        let mut stack = vec![self.root];
        std::iter::from_fn(move || {
            while let Some(node) = stack.pop() {
                if let Some(el) = self.element(node) {
                    stack.extend(el.children.iter().rev());
                    return Some((node, el));
                }
            }
            None
        })
    }
}

/// One compound selector, e.g. `input[type="submit"]` or `div.card#main`
#[derive(Debug, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
}

impl Compound {
    fn parse(s: &str) -> Option<Self> {
        if s.is_empty() || s.contains(|c: char| c.is_whitespace() || "> +~:".contains(c)) {
            return None;
        }

        let mut compound = Compound::default();
        let mut rest = s;

        let tag_end = rest.find(['.', '#', '[']).unwrap_or(rest.len());
        let tag = &rest[..tag_end];
        if !tag.is_empty() && tag != "*" {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        rest = &rest[tag_end..];

        while let Some(first) = rest.chars().next() {
            rest = &rest[first.len_utf8()..];
            match first {
                '.' | '#' => {
                    let end = rest.find(['.', '#', '[']).unwrap_or(rest.len());
                    let name = &rest[..end];
                    if name.is_empty() {
                        return None;
                    }
                    if first == '.' {
                        compound.classes.push(name.to_string());
                    } else {
                        compound.id = Some(name.to_string());
                    }
                    rest = &rest[end..];
                }
                '[' => {
                    let end = rest.find(']')?;
                    let (name, value) = rest[..end].split_once('=')?;
                    let value = value.trim_matches(|c| c == '"' || c == '\'');
                    compound
                        .attributes
                        .push((name.to_string(), value.to_string()));
                    rest = &rest[end + 1..];
                }
                _ => return None,
            }
        }

        Some(compound)
    }

    fn matches(&self, el: &Element) -> bool {
        self.tag.as_ref().is_none_or(|t| *t == el.tag)
            && self.id.as_ref().is_none_or(|id| el.id.as_ref() == Some(id))
            && self.classes.iter().all(|c| el.classes.contains(c))
            && self
                .attributes
                .iter()
                .all(|(k, v)| el.attributes.get(k) == Some(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new("https://example.com");
        let card = doc.create_element("div");
        doc.add_class(card, "card");
        let img = doc.create_element("img");
        let submit = doc.create_element("input");
        doc.set_attribute(submit, "type", "submit");
        doc.append_child(doc.body(), card);
        doc.append_child(card, img);
        doc.append_child(doc.body(), submit);
        (doc, card, img, submit)
    }

    #[test]
    fn test_skeleton() {
        let doc = Document::new("https://example.com");
        assert_eq!(doc.tag(doc.root()), Some("html"));
        assert_eq!(doc.children(doc.root()), &[doc.head(), doc.body()]);
        assert_eq!(doc.url(), "https://example.com");
    }

    #[test]
    fn test_query_selector_all() {
        let (doc, card, img, submit) = page();
        assert_eq!(doc.query_selector_all("img, .card"), vec![card, img]);
        assert_eq!(doc.query_selector_all("div.card"), vec![card]);
        assert_eq!(doc.query_selector_all(r#"input[type="submit"]"#), vec![submit]);
        assert!(doc.query_selector_all("nav a").is_empty());
        assert!(doc.query_selector_all("span").is_empty());
    }

    #[test]
    fn test_detached_elements_do_not_match() {
        let (mut doc, card, img, _) = page();
        doc.remove(card);
        assert!(!doc.is_attached(img));
        assert!(doc.query_selector_all("img").is_empty());
    }

    #[test]
    fn test_removed_slots_are_reused() {
        let (mut doc, card, img, _) = page();
        let live = doc.node_count();
        let capacity = doc.capacity();

        doc.remove(card);
        assert_eq!(doc.node_count(), live - 2);
        assert_eq!(doc.tag(img), None);

        for _ in 0..50 {
            let style = doc.create_element("style");
            doc.set_text(style, "body { color: red; }");
            doc.append_child(doc.head(), style);
            doc.remove(style);
        }
        assert_eq!(doc.capacity(), capacity);

        // a reused slot does not answer to the old handle
        let fresh = doc.create_element("span");
        assert_ne!(fresh, card);
        assert!(!doc.add_class(card, "card"));
        assert_eq!(doc.tag(fresh), Some("span"));
    }

    #[test]
    fn test_elements_by_id_returns_duplicates() {
        let mut doc = Document::new("https://example.com");
        for _ in 0..2 {
            let style = doc.create_element("style");
            doc.set_id(style, "dup");
            doc.append_child(doc.head(), style);
        }
        assert_eq!(doc.elements_by_id("dup").len(), 2);
    }

    #[test]
    fn test_classes_and_styles() {
        let (mut doc, card, _, _) = page();
        assert!(!doc.add_class(card, "card"));
        assert!(doc.add_class(card, "hot"));
        assert!(doc.remove_class(card, "hot"));
        assert!(!doc.has_class(card, "hot"));

        assert_eq!(doc.set_style(card, "color", "red"), None);
        assert_eq!(doc.set_style(card, "color", "blue"), Some("red".to_string()));
        assert_eq!(doc.remove_style(card, "color"), Some("blue".to_string()));
        assert_eq!(doc.style(card, "color"), None);
    }

    #[test]
    fn test_listeners_dispatch_and_remove() {
        let (mut doc, card, _, _) = page();
        let enter = doc.add_listener(
            card,
            EventKind::MouseEnter,
            StyleSetter {
                property: "transform".to_string(),
                value: "scale(1.02)".to_string(),
            },
        );
        doc.dispatch(card, EventKind::MouseLeave);
        assert_eq!(doc.style(card, "transform"), None);
        doc.dispatch(card, EventKind::MouseEnter);
        assert_eq!(doc.style(card, "transform"), Some("scale(1.02)"));

        assert!(doc.remove_listener(card, enter));
        assert!(!doc.remove_listener(card, enter));
        assert_eq!(doc.listener_count(card), 0);
    }
}
