//! Text collection.
//!
//! Gathers the text an emitted element displays on its own line: direct text
//! nodes plus the inner text of pure inline-wrapper children, with inline
//! interactive fragments bracketed `⟨…⟩` so the clickable phrase stays
//! readable in context. Joining is CJK-aware: no space is inserted between
//! two fullwidth/CJK boundary characters.

use super::actions::detect_actions;
use super::truncate_chars;
use crate::config::{CompiledHints, WalkerConfig};
use crate::snapshot::{DomArena, DomChild, NodeId};

/// Collect the display text of an element.
pub fn collect_text(
    arena: &DomArena,
    id: NodeId,
    config: &WalkerConfig,
    hints: &CompiledHints,
) -> String {
    let mut parts: Vec<String> = Vec::new();
    for child in &arena.node(id).children {
        match child {
            DomChild::Text(t) => {
                let t = t.trim();
                if !t.is_empty() {
                    parts.push(t.to_string());
                }
            }
            DomChild::Node(c) => {
                let node = arena.node(*c);
                if node.hidden || hints.is_skip_tag(&node.tag) {
                    continue;
                }
                if !hints.is_inline_tag(&node.tag) {
                    continue;
                }
                // inline children with element children of their own are
                // emitted as separate records; only pure wrappers fold here
                let has_block = arena
                    .element_children(*c)
                    .iter()
                    .any(|&g| !hints.is_skip_tag(&arena.node(g).tag));
                if has_block {
                    continue;
                }
                let inner = arena.visible_text(*c, &|t| hints.is_skip_tag(t));
                if inner.is_empty() {
                    continue;
                }
                if detect_actions(arena, *c, hints).is_empty() {
                    parts.push(inner);
                } else {
                    parts.push(format!("\u{27e8}{}\u{27e9}", inner));
                }
            }
        }
    }
    let text = join_cjk_aware(&parts);
    if config.max_text_len > 0 {
        truncate_chars(&text, config.max_text_len)
    } else {
        text
    }
}

/// Join parts with a single space except across CJK/fullwidth boundaries.
pub fn join_cjk_aware(parts: &[String]) -> String {
    let mut out = String::new();
    for part in parts {
        if part.is_empty() {
            continue;
        }
        if !out.is_empty() {
            let last = out.chars().next_back();
            let first = part.chars().next();
            let seamless = matches!((last, first), (Some(a), Some(b)) if is_cjk(a) && is_cjk(b));
            if !seamless {
                out.push(' ');
            }
        }
        out.push_str(part);
    }
    out
}

/// CJK ideographs, kana, CJK punctuation and fullwidth forms.
fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3000}'..='\u{303F}'   // CJK punctuation
        | '\u{3040}'..='\u{30FF}' // hiragana, katakana
        | '\u{3400}'..='\u{4DBF}' // CJK extension A
        | '\u{4E00}'..='\u{9FFF}' // CJK unified
        | '\u{F900}'..='\u{FAFF}' // CJK compatibility
        | '\u{FF00}'..='\u{FFEF}' // fullwidth forms
    )
}
