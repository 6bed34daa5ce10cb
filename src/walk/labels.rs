//! Form-label association.
//!
//! Resolves the human-readable label of a form control: an explicit
//! `<label for=id>`, a wrapping `<label>`, or `aria-labelledby` references.

use crate::config::CompiledHints;
use crate::snapshot::{DomArena, NodeId};
use std::collections::HashMap;

pub struct LabelIndex {
    /// element id -> node
    by_id: HashMap<String, NodeId>,
    /// label `for` target id -> label text
    label_for: HashMap<String, String>,
}

impl LabelIndex {
    pub fn build(arena: &DomArena, hints: &CompiledHints) -> Self {
        let mut by_id = HashMap::new();
        let mut label_for = HashMap::new();
        for id in arena.ids() {
            if let Some(el_id) = arena.attr(id, "id") {
                by_id.entry(el_id.to_string()).or_insert(id);
            }
            if arena.node(id).tag == "label" {
                if let Some(target) = arena.attr(id, "for") {
                    let text = arena.visible_text(id, &|t| hints.is_skip_tag(t));
                    if !text.is_empty() {
                        label_for.entry(target.to_string()).or_insert(text);
                    }
                }
            }
        }
        Self { by_id, label_for }
    }

    /// Best label text for a form control, or empty.
    pub fn form_label(&self, arena: &DomArena, id: NodeId, hints: &CompiledHints) -> String {
        if let Some(el_id) = arena.attr(id, "id") {
            if let Some(text) = self.label_for.get(el_id) {
                return text.clone();
            }
        }

        // wrapping <label>
        let mut current = arena.node(id).parent;
        while let Some(ancestor) = current {
            if arena.node(ancestor).tag == "label" {
                let text = arena.visible_text(ancestor, &|t| hints.is_skip_tag(t));
                if !text.is_empty() {
                    return text;
                }
                break;
            }
            current = arena.node(ancestor).parent;
        }

        if let Some(refs) = arena.attr(id, "aria-labelledby") {
            let parts: Vec<String> = refs
                .split_whitespace()
                .filter_map(|r| self.by_id.get(r))
                .map(|&n| arena.visible_text(n, &|t| hints.is_skip_tag(t)))
                .filter(|t| !t.is_empty())
                .collect();
            if !parts.is_empty() {
                return parts.join(" ");
            }
        }

        String::new()
    }
}
