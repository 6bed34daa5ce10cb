//! Flattened arena representation of a snapshot.
//!
//! Prepare annotates nodes in place; Walk reads them. Index-based ids keep
//! parent/child navigation cheap and borrowable.

use super::{RawChild, RawNode};
use indexmap::IndexMap;

/// Identifier of a node within a [`DomArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A child slot: a text node or a nested element.
#[derive(Debug, Clone)]
pub enum DomChild {
    Text(String),
    Node(NodeId),
}

/// Role assigned by switchable-group detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRole {
    /// Visible member of a mixed sibling group; forced visible.
    Active,
    /// Hidden member; emitted with `hidden` state.
    Inactive,
}

/// One element with its snapshot facts and prepare annotations.
#[derive(Debug, Clone)]
pub struct DomNode {
    pub tag: String,
    pub attrs: IndexMap<String, String>,
    pub parent: Option<NodeId>,
    pub children: Vec<DomChild>,

    // snapshot facts
    pub css_hidden: bool,
    pub rect: Option<(f64, f64)>,
    pub cursor_pointer: bool,
    pub click_listener: bool,
    pub value: Option<String>,
    pub checked: Option<bool>,
    pub text_color: Option<String>,

    // prepare annotations
    pub bid: u32,
    pub hidden: bool,
    pub group: Option<GroupRole>,
    pub icon: Option<String>,
    pub propagated_click: bool,
}

/// The flattened page: all elements of the captured `body` subtree.
pub struct DomArena {
    nodes: Vec<DomNode>,
    root: NodeId,
}

impl DomArena {
    /// Flatten a snapshot root into an arena.
    pub fn build(root: &RawNode) -> Self {
        let mut arena = Self { nodes: Vec::new(), root: NodeId(0) };
        let root_id = arena.insert(root, None);
        arena.root = root_id;
        arena
    }

    fn insert(&mut self, raw: &RawNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut attrs = IndexMap::with_capacity(raw.attrs.len());
        for (k, v) in &raw.attrs {
            attrs.insert(k.to_ascii_lowercase(), v.clone());
        }
        self.nodes.push(DomNode {
            tag: raw.tag.to_ascii_lowercase(),
            attrs,
            parent,
            children: Vec::with_capacity(raw.children.len()),
            css_hidden: raw.css_hidden,
            rect: raw.rect.map(|[w, h]| (w, h)),
            cursor_pointer: raw.cursor_pointer,
            click_listener: raw.click_listener,
            value: raw.value.clone(),
            checked: raw.checked,
            text_color: raw.text_color.clone(),
            bid: 0,
            hidden: false,
            group: None,
            icon: None,
            propagated_click: false,
        });
        for child in &raw.children {
            let slot = match child {
                RawChild::Text { text } => DomChild::Text(text.clone()),
                RawChild::Element(el) => {
                    let child_id = self.insert(el, Some(id));
                    DomChild::Node(child_id)
                }
            };
            self.nodes[id.0].children.push(slot);
        }
        id
    }

    /// The `body` node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of elements in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the arena holds no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &DomNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut DomNode {
        &mut self.nodes[id.0]
    }

    /// All node ids in document (pre-order) position.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Element children of a node, in order.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes[id.0]
            .children
            .iter()
            .filter_map(|c| match c {
                DomChild::Node(child) => Some(*child),
                DomChild::Text(_) => None,
            })
            .collect()
    }

    /// True when the node has at least one element child.
    pub fn has_element_children(&self, id: NodeId) -> bool {
        self.nodes[id.0]
            .children
            .iter()
            .any(|c| matches!(c, DomChild::Node(_)))
    }

    /// Attribute lookup (keys are lowercase).
    pub fn attr<'a>(&'a self, id: NodeId, name: &str) -> Option<&'a str> {
        self.nodes[id.0].attrs.get(name).map(|s| s.as_str())
    }

    /// The class attribute, or the empty string.
    pub fn class<'a>(&'a self, id: NodeId) -> &'a str {
        self.attr(id, "class").unwrap_or("")
    }

    /// Raw subtree text (`textContent`): every text node, hidden or not.
    pub fn raw_text(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        self.collect_raw_text(id, &mut parts);
        parts.join(" ")
    }

    fn collect_raw_text(&self, id: NodeId, parts: &mut Vec<String>) {
        for child in &self.nodes[id.0].children {
            match child {
                DomChild::Text(t) => {
                    let t = t.trim();
                    if !t.is_empty() {
                        parts.push(t.to_string());
                    }
                }
                DomChild::Node(c) => self.collect_raw_text(*c, parts),
            }
        }
    }

    /// Visible subtree text (`innerText` approximation): text nodes under
    /// non-hidden descendants only. `skip` filters tags never rendered.
    pub fn visible_text(&self, id: NodeId, skip: &dyn Fn(&str) -> bool) -> String {
        let mut parts = Vec::new();
        self.collect_visible_text(id, skip, &mut parts);
        parts.join(" ")
    }

    fn collect_visible_text(&self, id: NodeId, skip: &dyn Fn(&str) -> bool, parts: &mut Vec<String>) {
        for child in &self.nodes[id.0].children {
            match child {
                DomChild::Text(t) => {
                    let t = t.trim();
                    if !t.is_empty() {
                        parts.push(t.to_string());
                    }
                }
                DomChild::Node(c) => {
                    let node = &self.nodes[c.0];
                    if node.hidden || skip(&node.tag) {
                        continue;
                    }
                    self.collect_visible_text(*c, skip, parts);
                }
            }
        }
    }

    /// First descendant matching a tag, searched pre-order.
    pub fn find_descendant(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        for child in self.element_children(id) {
            if self.nodes[child.0].tag == tag {
                return Some(child);
            }
            if let Some(found) = self.find_descendant(child, tag) {
                return Some(found);
            }
        }
        None
    }

    /// Position of `id` among same-tag element siblings (1-based), plus the
    /// total number of same-tag siblings.
    pub fn nth_of_type(&self, id: NodeId) -> (usize, usize) {
        let tag = &self.nodes[id.0].tag;
        match self.nodes[id.0].parent {
            Some(parent) => {
                let siblings: Vec<NodeId> = self
                    .element_children(parent)
                    .into_iter()
                    .filter(|s| &self.nodes[s.0].tag == tag)
                    .collect();
                let pos = siblings.iter().position(|s| s == &id).map_or(1, |i| i + 1);
                (pos, siblings.len())
            }
            None => (1, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::RawNode;

    fn sample() -> DomArena {
        let root = RawNode::new("body")
            .with_child(
                RawNode::new("div")
                    .with_attr("CLASS", "Outer")
                    .with_text("first")
                    .with_child(RawNode::new("span").with_text("inner")),
            )
            .with_child(RawNode::new("p").with_text("second"));
        DomArena::build(&root)
    }

    #[test]
    fn test_build_and_navigate() {
        let arena = sample();
        assert_eq!(arena.len(), 4);
        let body = arena.root();
        let kids = arena.element_children(body);
        assert_eq!(kids.len(), 2);
        assert_eq!(arena.node(kids[0]).tag, "div");
        assert_eq!(arena.node(kids[1]).tag, "p");
        assert_eq!(arena.node(kids[0]).parent, Some(body));
    }

    #[test]
    fn test_attrs_lowercased() {
        let arena = sample();
        let div = arena.element_children(arena.root())[0];
        assert_eq!(arena.class(div), "Outer");
        assert_eq!(arena.attr(div, "class"), Some("Outer"));
    }

    #[test]
    fn test_raw_text() {
        let arena = sample();
        let div = arena.element_children(arena.root())[0];
        assert_eq!(arena.raw_text(div), "first inner");
    }

    #[test]
    fn test_visible_text_skips_hidden() {
        let root = RawNode::new("body")
            .with_child(RawNode::new("div").with_text("shown"))
            .with_child(RawNode::new("div").css_hidden().with_text("gone"));
        let mut arena = DomArena::build(&root);
        for id in arena.ids().collect::<Vec<_>>() {
            let hidden = arena.node(id).css_hidden;
            arena.node_mut(id).hidden = hidden;
        }
        let text = arena.visible_text(arena.root(), &|_| false);
        assert_eq!(text, "shown");
    }

    #[test]
    fn test_nth_of_type() {
        let root = RawNode::new("body")
            .with_child(RawNode::new("p"))
            .with_child(RawNode::new("div"))
            .with_child(RawNode::new("p"));
        let arena = DomArena::build(&root);
        let kids = arena.element_children(arena.root());
        assert_eq!(arena.nth_of_type(kids[0]), (1, 2));
        assert_eq!(arena.nth_of_type(kids[1]), (1, 1));
        assert_eq!(arena.nth_of_type(kids[2]), (2, 2));
    }

    #[test]
    fn test_find_descendant() {
        let root = RawNode::new("body")
            .with_child(RawNode::new("div").with_child(RawNode::new("svg").with_child(RawNode::new("title"))));
        let arena = DomArena::build(&root);
        let svg = arena.find_descendant(arena.root(), "svg").unwrap();
        assert_eq!(arena.node(svg).tag, "svg");
        assert!(arena.find_descendant(svg, "title").is_some());
        assert!(arena.find_descendant(arena.root(), "table").is_none());
    }
}
