//! Switchable-group detection.
//!
//! Tab panels and dropdown menus render as sibling sets where one member is
//! visible and the rest are CSS-hidden. Bucketing the children of any parent
//! that has a hidden child by `(tag, class-minus-state-classes)` finds those
//! sets: mixed buckets get their visible members marked `active` and their
//! hidden members `inactive`. The walker emits active members as `selected`
//! and inactive ones as `hidden` state instead of dropping them, so the agent
//! can see and switch to the other panels.

use crate::config::CompiledHints;
use crate::snapshot::{DomArena, GroupRole, NodeId};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Detect switchable sibling groups and mark their members.
pub fn detect(arena: &mut DomArena, hints: &CompiledHints) {
    let Some(state_re) = hints.state_class_re.as_ref() else {
        return;
    };

    // parents of hidden elements, deduplicated, in document order
    let mut seen = HashSet::new();
    let mut parents = Vec::new();
    for id in arena.ids() {
        if !arena.node(id).hidden {
            continue;
        }
        if let Some(parent) = arena.node(id).parent {
            if seen.insert(parent) {
                parents.push(parent);
            }
        }
    }

    for parent in parents {
        let children = arena.element_children(parent);
        if children.len() < 2 {
            continue;
        }

        let mut buckets: IndexMap<(String, String), Vec<NodeId>> = IndexMap::new();
        for child in children {
            let normalized = state_re.replace_all(arena.class(child), "");
            let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
            let key = (arena.node(child).tag.clone(), normalized);
            buckets.entry(key).or_default().push(child);
        }

        for ((_, class_key), members) in buckets {
            // classless buckets are too generic to be tab panels
            if members.len() < 2 || class_key.is_empty() {
                continue;
            }
            let (hidden, visible): (Vec<NodeId>, Vec<NodeId>) =
                members.into_iter().partition(|&m| arena.node(m).hidden);
            if hidden.is_empty() || visible.is_empty() {
                continue;
            }
            for m in visible {
                arena.node_mut(m).group = Some(GroupRole::Active);
                arena.node_mut(m).hidden = false;
            }
            for m in hidden {
                arena.node_mut(m).group = Some(GroupRole::Inactive);
                arena.node_mut(m).hidden = false;
                unhide_subtree(arena, m);
            }
        }
    }
}

/// An inactive panel's content inherits the panel's hidden styling; clear the
/// flags so its structure still walks.
fn unhide_subtree(arena: &mut DomArena, id: NodeId) {
    for child in arena.element_children(id) {
        arena.node_mut(child).hidden = false;
        unhide_subtree(arena, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WalkerConfig;
    use crate::snapshot::RawNode;

    fn detect_on(root: RawNode) -> DomArena {
        let config = WalkerConfig::default();
        let hints = config.compile();
        let mut arena = DomArena::build(&root);
        super::super::prepare(&mut arena, &config, &hints);
        arena
    }

    fn tab_list() -> RawNode {
        RawNode::new("body").with_child(
            RawNode::new("ul")
                .with_child(RawNode::new("li").with_attr("class", "pane active").with_text("One"))
                .with_child(
                    RawNode::new("li")
                        .with_attr("class", "pane")
                        .with_attr("style", "display:none")
                        .with_text("Two"),
                )
                .with_child(
                    RawNode::new("li")
                        .with_attr("class", "pane")
                        .with_attr("style", "display:none")
                        .with_text("Three"),
                ),
        )
    }

    #[test]
    fn test_mixed_bucket_marked() {
        let arena = detect_on(tab_list());
        let ul = arena.element_children(arena.root())[0];
        let lis = arena.element_children(ul);
        assert_eq!(arena.node(lis[0]).group, Some(GroupRole::Active));
        assert_eq!(arena.node(lis[1]).group, Some(GroupRole::Inactive));
        assert_eq!(arena.node(lis[2]).group, Some(GroupRole::Inactive));
        // inactive members are unhidden so the walker emits them with state
        assert!(!arena.node(lis[1]).hidden);
        assert!(!arena.node(lis[2]).hidden);
    }

    #[test]
    fn test_at_most_one_active_per_bucket() {
        let arena = detect_on(tab_list());
        let ul = arena.element_children(arena.root())[0];
        let active = arena
            .element_children(ul)
            .into_iter()
            .filter(|&id| arena.node(id).group == Some(GroupRole::Active))
            .count();
        assert_eq!(active, 1);
    }

    #[test]
    fn test_classless_bucket_ignored() {
        let root = RawNode::new("body").with_child(
            RawNode::new("div")
                .with_child(RawNode::new("p").with_text("a"))
                .with_child(RawNode::new("p").with_attr("style", "display:none").with_text("b")),
        );
        let arena = detect_on(root);
        let div = arena.element_children(arena.root())[0];
        let ps = arena.element_children(div);
        assert_eq!(arena.node(ps[0]).group, None);
        assert_eq!(arena.node(ps[1]).group, None);
        assert!(arena.node(ps[1]).hidden);
    }

    #[test]
    fn test_all_hidden_bucket_ignored() {
        let root = RawNode::new("body").with_child(
            RawNode::new("div")
                .with_child(RawNode::new("p").with_attr("class", "x").with_attr("style", "display:none"))
                .with_child(RawNode::new("p").with_attr("class", "x").with_attr("style", "display:none")),
        );
        let arena = detect_on(root);
        let div = arena.element_children(arena.root())[0];
        for p in arena.element_children(div) {
            assert_eq!(arena.node(p).group, None);
            assert!(arena.node(p).hidden);
        }
    }

    #[test]
    fn test_inactive_subtree_unhidden() {
        let root = RawNode::new("body").with_child(
            RawNode::new("div")
                .with_child(RawNode::new("section").with_attr("class", "panel shown").with_text("visible"))
                .with_child(
                    RawNode::new("section")
                        .with_attr("class", "panel")
                        .with_attr("style", "display:none")
                        .with_child(RawNode::new("p").css_hidden().with_text("inner")),
                ),
        );
        let arena = detect_on(root);
        let div = arena.element_children(arena.root())[0];
        let inactive = arena.element_children(div)[1];
        let p = arena.element_children(inactive)[0];
        assert!(!arena.node(p).hidden);
    }
}
