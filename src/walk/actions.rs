//! Action detection.
//!
//! Classifies what the agent can do with an element: `click`, `type` or
//! `select`. Tag/role/type classification comes first; the live-page signals
//! (pointer cursor, recorded click listeners, propagated container flags)
//! catch the div-soup the classification misses.

use crate::config::CompiledHints;
use crate::snapshot::{DomArena, NodeId};
use serde::{Deserialize, Serialize};

/// An interaction the agent can perform on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Click,
    Type,
    Select,
}

impl Action {
    /// Marker text used in the rendered tree.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Click => "click",
            Action::Type => "type",
            Action::Select => "select",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const CLICK_ROLES: [&str; 7] = ["checkbox", "radio", "switch", "tab", "menuitem", "option", "treeitem"];

/// Detect the action set of an element.
pub fn detect_actions(arena: &DomArena, id: NodeId, hints: &CompiledHints) -> Vec<Action> {
    let node = arena.node(id);
    let tag = node.tag.as_str();
    let role = arena.attr(id, "role").unwrap_or("");
    let immutable = node.attrs.contains_key("readonly") || node.attrs.contains_key("disabled");

    if tag == "a" || role == "link" {
        return vec![Action::Click];
    }
    if tag == "button" || role == "button" {
        return vec![Action::Click];
    }
    if tag == "input" {
        let ty = arena.attr(id, "type").unwrap_or("text").to_ascii_lowercase();
        if ty == "hidden" {
            return Vec::new();
        }
        if hints.typeable_input_types.contains(&ty) {
            // readonly/disabled text inputs still open pickers on click
            return if immutable { vec![Action::Click] } else { vec![Action::Type] };
        }
        return vec![Action::Click];
    }
    if tag == "textarea" || role == "combobox" {
        return if immutable { vec![Action::Click] } else { vec![Action::Type] };
    }
    if tag == "select" {
        return vec![Action::Select];
    }
    if arena
        .attr(id, "contenteditable")
        .is_some_and(|v| v.is_empty() || v.eq_ignore_ascii_case("true"))
    {
        return vec![Action::Type];
    }
    if CLICK_ROLES.contains(&role) {
        return vec![Action::Click];
    }
    if node.attrs.contains_key("onclick") {
        return vec![Action::Click];
    }
    if node.cursor_pointer {
        return vec![Action::Click];
    }
    if node.click_listener || node.propagated_click {
        return vec![Action::Click];
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WalkerConfig;
    use crate::snapshot::RawNode;

    fn first_actions(root: RawNode) -> Vec<Action> {
        let config = WalkerConfig::default();
        let hints = config.compile();
        let arena = DomArena::build(&root);
        let child = arena.element_children(arena.root())[0];
        detect_actions(&arena, child, &hints)
    }

    fn body_with(child: RawNode) -> RawNode {
        RawNode::new("body").with_child(child)
    }

    #[test]
    fn test_tag_classification() {
        assert_eq!(first_actions(body_with(RawNode::new("a"))), vec![Action::Click]);
        assert_eq!(first_actions(body_with(RawNode::new("button"))), vec![Action::Click]);
        assert_eq!(first_actions(body_with(RawNode::new("select"))), vec![Action::Select]);
        assert_eq!(first_actions(body_with(RawNode::new("textarea"))), vec![Action::Type]);
        assert_eq!(first_actions(body_with(RawNode::new("div"))), Vec::<Action>::new());
    }

    #[test]
    fn test_input_types() {
        let typeable = RawNode::new("input").with_attr("type", "search");
        assert_eq!(first_actions(body_with(typeable)), vec![Action::Type]);

        // missing type defaults to text
        assert_eq!(first_actions(body_with(RawNode::new("input"))), vec![Action::Type]);

        let submit = RawNode::new("input").with_attr("type", "submit");
        assert_eq!(first_actions(body_with(submit)), vec![Action::Click]);

        let checkbox = RawNode::new("input").with_attr("type", "checkbox");
        assert_eq!(first_actions(body_with(checkbox)), vec![Action::Click]);

        let hidden = RawNode::new("input").with_attr("type", "hidden");
        assert_eq!(first_actions(body_with(hidden)), Vec::<Action>::new());
    }

    #[test]
    fn test_readonly_degrades_to_click() {
        let datepicker = RawNode::new("input").with_attr("type", "text").with_attr("readonly", "");
        assert_eq!(first_actions(body_with(datepicker)), vec![Action::Click]);

        let disabled_area = RawNode::new("textarea").with_attr("disabled", "");
        assert_eq!(first_actions(body_with(disabled_area)), vec![Action::Click]);
    }

    #[test]
    fn test_roles() {
        let tab = RawNode::new("div").with_attr("role", "tab");
        assert_eq!(first_actions(body_with(tab)), vec![Action::Click]);

        let combobox = RawNode::new("div").with_attr("role", "combobox");
        assert_eq!(first_actions(body_with(combobox)), vec![Action::Type]);

        let presentation = RawNode::new("div").with_attr("role", "presentation");
        assert_eq!(first_actions(body_with(presentation)), Vec::<Action>::new());
    }

    #[test]
    fn test_live_signals() {
        let onclick = RawNode::new("div").with_attr("onclick", "go()");
        assert_eq!(first_actions(body_with(onclick)), vec![Action::Click]);

        let mut pointer = RawNode::new("div");
        pointer.cursor_pointer = true;
        assert_eq!(first_actions(body_with(pointer)), vec![Action::Click]);

        let listener = RawNode::new("div").with_click_listener();
        assert_eq!(first_actions(body_with(listener)), vec![Action::Click]);
    }

    #[test]
    fn test_contenteditable() {
        let editor = RawNode::new("div").with_attr("contenteditable", "");
        assert_eq!(first_actions(body_with(editor)), vec![Action::Type]);

        let editor_true = RawNode::new("div").with_attr("contenteditable", "true");
        assert_eq!(first_actions(body_with(editor_true)), vec![Action::Type]);

        let editor_false = RawNode::new("div").with_attr("contenteditable", "false");
        assert_eq!(first_actions(body_with(editor_false)), Vec::<Action>::new());
    }
}
