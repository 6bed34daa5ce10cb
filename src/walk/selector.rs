//! Selector generation.
//!
//! Every record carries a stable back-reference selector (preferring the
//! `data-bid` attribute the capture script stamps into the live DOM) and a
//! structural xpath fallback.

use crate::snapshot::{DomArena, NodeId};

/// Best CSS selector for an element.
pub fn css_selector(arena: &DomArena, id: NodeId) -> String {
    if let Some(bid) = arena.attr(id, "data-bid") {
        return format!("[data-bid=\"{}\"]", bid);
    }
    if let Some(el_id) = arena.attr(id, "id").filter(|v| !v.is_empty()) {
        return format!("#{}", el_id);
    }
    if let Some(aria) = arena.attr(id, "aria-label").filter(|v| !v.is_empty()) {
        let safe = aria.replace('\\', "\\\\").replace('"', "\\\"");
        return format!("{}[aria-label=\"{}\"]", arena.node(id).tag, safe);
    }
    if let Some(name) = arena.attr(id, "name").filter(|v| !v.is_empty()) {
        return format!("{}[name=\"{}\"]", arena.node(id).tag, name);
    }
    structural_path(arena, id)
}

/// `body > div:nth-of-type(2) > p`, anchored at the nearest `#id` ancestor.
fn structural_path(arena: &DomArena, id: NodeId) -> String {
    let mut parts = Vec::new();
    let mut current = Some(id);
    while let Some(el) = current {
        let node = arena.node(el);
        if node.parent.is_none() {
            parts.push(node.tag.clone());
            break;
        }
        if let Some(el_id) = arena.attr(el, "id").filter(|v| !v.is_empty()) {
            parts.push(format!("#{}", el_id));
            break;
        }
        let (pos, total) = arena.nth_of_type(el);
        if total == 1 {
            parts.push(node.tag.clone());
        } else {
            parts.push(format!("{}:nth-of-type({})", node.tag, pos));
        }
        current = node.parent;
    }
    parts.reverse();
    parts.join(" > ")
}

/// Structural xpath: `/body/div[2]/p`.
pub fn xpath_selector(arena: &DomArena, id: NodeId) -> String {
    let mut parts = Vec::new();
    let mut current = Some(id);
    while let Some(el) = current {
        let node = arena.node(el);
        let (pos, total) = arena.nth_of_type(el);
        if total == 1 {
            parts.push(node.tag.clone());
        } else {
            parts.push(format!("{}[{}]", node.tag, pos));
        }
        current = node.parent;
    }
    parts.reverse();
    format!("/{}", parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::RawNode;

    fn arena() -> DomArena {
        DomArena::build(
            &RawNode::new("body")
                .with_child(RawNode::new("div").with_attr("data-bid", "12"))
                .with_child(RawNode::new("div").with_attr("id", "main"))
                .with_child(RawNode::new("button").with_attr("aria-label", "Close \"x\""))
                .with_child(RawNode::new("input").with_attr("name", "q"))
                .with_child(RawNode::new("div").with_child(RawNode::new("p")).with_child(RawNode::new("p"))),
        )
    }

    #[test]
    fn test_bid_preferred() {
        let a = arena();
        let kids = a.element_children(a.root());
        assert_eq!(css_selector(&a, kids[0]), "[data-bid=\"12\"]");
    }

    #[test]
    fn test_id_selector() {
        let a = arena();
        let kids = a.element_children(a.root());
        assert_eq!(css_selector(&a, kids[1]), "#main");
    }

    #[test]
    fn test_aria_label_escaped() {
        let a = arena();
        let kids = a.element_children(a.root());
        assert_eq!(css_selector(&a, kids[2]), "button[aria-label=\"Close \\\"x\\\"\"]");
    }

    #[test]
    fn test_name_selector() {
        let a = arena();
        let kids = a.element_children(a.root());
        assert_eq!(css_selector(&a, kids[3]), "input[name=\"q\"]");
    }

    #[test]
    fn test_structural_path() {
        let a = arena();
        let kids = a.element_children(a.root());
        let ps = a.element_children(kids[4]);
        assert_eq!(css_selector(&a, ps[1]), "body > div:nth-of-type(3) > p:nth-of-type(2)");
    }

    #[test]
    fn test_xpath() {
        let a = arena();
        let kids = a.element_children(a.root());
        let ps = a.element_children(kids[4]);
        assert_eq!(xpath_selector(&a, ps[1]), "/body/div[3]/p[2]");
    }
}
