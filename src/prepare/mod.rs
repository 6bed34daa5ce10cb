//! Prepare stage.
//!
//! Runs once over a freshly built arena before walking: assigns back-reference
//! identifiers, resolves per-element hidden state, classifies icons, detects
//! switchable sibling groups and propagates container click listeners to
//! their row children.
//!
//! The probes that need the live page (computed style, bounding rects,
//! recorded listeners, hover-rule matches) arrive pre-answered on the
//! snapshot; everything here is a pure function of that data.

mod clickable;
mod groups;
mod icons;

use crate::config::{CompiledHints, WalkerConfig};
use crate::snapshot::{DomArena, NodeId};

/// Run all prepare passes over the arena.
pub fn prepare(arena: &mut DomArena, config: &WalkerConfig, hints: &CompiledHints) {
    assign_bids(arena);
    resolve_hidden(arena);
    icons::classify(arena, config, hints);
    groups::detect(arena, hints);
    clickable::propagate(arena, hints);
    log::debug!("prepare: {} elements annotated", arena.len());
}

/// Attach a monotonically increasing back-reference id to every element.
///
/// Elements that already carry a `data-bid` attribute (stamped by the capture
/// script into the live DOM) keep it, so selectors stay resolvable on the
/// page; fixture elements get sequential ids in document order.
fn assign_bids(arena: &mut DomArena) {
    let mut counter: u32 = 0;
    for id in arena.ids().collect::<Vec<_>>() {
        let existing = arena.attr(id, "data-bid").and_then(|v| v.parse::<u32>().ok());
        match existing {
            Some(bid) => {
                arena.node_mut(id).bid = bid;
                counter = counter.max(bid);
            }
            None => {
                counter += 1;
                arena.node_mut(id).bid = counter;
            }
        }
    }
}

/// Resolve the base hidden flag of every element.
fn resolve_hidden(arena: &mut DomArena) {
    for id in arena.ids().collect::<Vec<_>>() {
        let hidden = is_base_hidden(arena, id);
        arena.node_mut(id).hidden = hidden;
    }
}

fn is_base_hidden(arena: &DomArena, id: NodeId) -> bool {
    let node = arena.node(id);
    if node.css_hidden {
        return true;
    }
    if node.attrs.contains_key("hidden") {
        return true;
    }
    if arena.attr(id, "aria-hidden").is_some_and(|v| v.eq_ignore_ascii_case("true")) {
        return true;
    }
    // carousel clones get this attribute stamped by the capture script
    if arena.attr(id, "data-bhidden") == Some("1") {
        return true;
    }
    if node.tag == "input"
        && arena.attr(id, "type").is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
    {
        return true;
    }
    if node.tag == "dialog" && !node.attrs.contains_key("open") {
        return true;
    }
    if let Some(style) = arena.attr(id, "style") {
        if crate::snapshot::style_property(style, "display").is_some_and(|v| v == "none") {
            return true;
        }
        if crate::snapshot::style_property(style, "visibility").is_some_and(|v| v == "hidden") {
            return true;
        }
        if crate::snapshot::style_property(style, "opacity")
            .and_then(|v| v.parse::<f64>().ok())
            .is_some_and(|v| v == 0.0)
        {
            return true;
        }
    }
    if node.rect == Some((0.0, 0.0)) && !arena.has_element_children(id) {
        return true;
    }
    false
}
