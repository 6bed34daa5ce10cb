//! Click-listener propagation.
//!
//! Frameworks often bind a single listener on a list container and dispatch
//! by event target; the rows are the real click targets. When a container
//! carries a recorded listener and has two or more plain, visible, non-empty
//! block children, the flag is propagated to those children.

use crate::config::CompiledHints;
use crate::snapshot::DomArena;

const SEMANTIC_TAGS: [&str; 5] = ["a", "button", "input", "select", "textarea"];

/// Propagate container click flags to row children.
pub fn propagate(arena: &mut DomArena, hints: &CompiledHints) {
    let containers: Vec<_> = arena
        .ids()
        .filter(|&id| arena.node(id).click_listener)
        .collect();

    for container in containers {
        let eligible: Vec<_> = arena
            .element_children(container)
            .into_iter()
            .filter(|&child| {
                let node = arena.node(child);
                if node.hidden {
                    return false;
                }
                let tag = node.tag.as_str();
                if SEMANTIC_TAGS.contains(&tag)
                    || hints.is_skip_tag(tag)
                    || hints.is_inline_tag(tag)
                {
                    return false;
                }
                !arena.visible_text(child, &|t| hints.is_skip_tag(t)).is_empty()
            })
            .collect();

        if eligible.len() >= 2 {
            for child in eligible {
                arena.node_mut(child).propagated_click = true;
            }
        }
    }
}
