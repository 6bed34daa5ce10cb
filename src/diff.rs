//! Extraction diffing.
//!
//! Compares the interactive node lists of two extractions so an action's
//! effect can be reported without re-reading the whole tree. Identity is the
//! back-reference selector: hierarchical identifiers shift when nodes are
//! inserted or removed, but `data-bid` is stamped once per element and
//! survives across walks while the element exists.

use crate::pipeline::InteractiveNode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Short description of an added or removed node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeBrief {
    pub hid: String,
    pub tag: String,
    pub label: String,
    pub actions: Vec<crate::walk::Action>,
}

/// One changed field on a surviving node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub hid: String,
    pub tag: String,
    pub label: String,
    pub field: String,
    pub before: String,
    pub after: String,
}

/// Change summary between two extractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomDiff {
    pub has_changes: bool,
    pub summary: String,
    pub added: Vec<NodeBrief>,
    pub removed: Vec<NodeBrief>,
    pub changed: Vec<FieldChange>,
}

const LABEL_MAX: usize = 120;

/// Diff two interactive node lists, reporting at most `max_items` entries
/// per category.
pub fn diff_interactive(
    before: &[InteractiveNode],
    after: &[InteractiveNode],
    max_items: usize,
) -> DomDiff {
    let bmap = by_selector(before);
    let amap = by_selector(after);

    let mut added = Vec::new();
    for (selector, node) in &amap {
        if !bmap.contains_key(selector) {
            added.push(brief(node));
        }
    }

    let mut removed = Vec::new();
    for (selector, node) in &bmap {
        if !amap.contains_key(selector) {
            removed.push(brief(node));
        }
    }

    let mut changed = Vec::new();
    for (selector, bn) in &bmap {
        let Some(an) = amap.get(selector) else { continue };

        if bn.hid != an.hid {
            changed.push(change(an, "hid", &bn.hid, &an.hid));
        }
        if bn.label != an.label {
            changed.push(change(an, "label", &bn.label, &an.label));
        }
        for key in bn.state.keys().chain(an.state.keys().filter(|k| !bn.state.contains_key(*k))) {
            let bv = bn.state.get(key).map(String::as_str).unwrap_or("");
            let av = an.state.get(key).map(String::as_str).unwrap_or("");
            if bv != av {
                changed.push(change(an, &format!("state.{}", key), bv, av));
            }
        }
        if bn.actions != an.actions {
            changed.push(change(an, "actions", &join_actions(bn), &join_actions(an)));
        }
    }

    let mut parts = Vec::new();
    if !added.is_empty() {
        parts.push(format!("{} added", added.len()));
    }
    if !removed.is_empty() {
        parts.push(format!("{} removed", removed.len()));
    }
    if !changed.is_empty() {
        parts.push(format!("{} changed", changed.len()));
    }
    let has_changes = !parts.is_empty();
    let summary = if has_changes { parts.join(", ") } else { "no changes".to_string() };

    added.truncate(max_items);
    removed.truncate(max_items);
    changed.truncate(max_items);

    DomDiff { has_changes, summary, added, removed, changed }
}

fn by_selector(nodes: &[InteractiveNode]) -> IndexMap<&str, &InteractiveNode> {
    let mut map = IndexMap::new();
    for node in nodes {
        if !node.selector.is_empty() {
            map.entry(node.selector.as_str()).or_insert(node);
        }
    }
    map
}

fn brief(node: &InteractiveNode) -> NodeBrief {
    NodeBrief {
        hid: node.hid.clone(),
        tag: node.tag.clone(),
        label: crate::walk::truncate_chars(&node.label, LABEL_MAX),
        actions: node.actions.clone(),
    }
}

fn change(node: &InteractiveNode, field: &str, before: &str, after: &str) -> FieldChange {
    FieldChange {
        hid: node.hid.clone(),
        tag: node.tag.clone(),
        label: crate::walk::truncate_chars(&node.label, LABEL_MAX),
        field: field.to_string(),
        before: crate::walk::truncate_chars(before, 80),
        after: crate::walk::truncate_chars(after, 80),
    }
}

fn join_actions(node: &InteractiveNode) -> String {
    node.actions.iter().map(|a| a.as_str()).collect::<Vec<_>>().join("/")
}
