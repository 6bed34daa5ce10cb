//! Render stage.
//!
//! Serializes the compressed node list into the one-line-per-node textual
//! grammar consumed by the agent:
//!
//! ```text
//! [1.2] button(type="submit") [click] [disabled]: Pay now
//! ```
//!
//! Indentation is two spaces per identifier component. Inline interactive
//! fragments keep their `⟨…⟩` brackets inside the parent's text and emit no
//! line of their own. Lite mode truncates non-interactive text only; labels
//! of interactive nodes are never cut.

use crate::config::WalkerConfig;
use crate::node_map::NodeMap;
use crate::walk::WalkerNode;
use serde::{Deserialize, Serialize};

/// Full-mode cap on non-interactive display text.
const FULL_TEXT_MAX: usize = 120;

/// Rendering options.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub lite: bool,
    pub lite_text_max: usize,
    pub lite_text_head: usize,
}

impl RenderOptions {
    /// Full rendering.
    pub fn full() -> Self {
        Self { lite: false, lite_text_max: 0, lite_text_head: 0 }
    }

    /// Lite rendering with the configured truncation bounds.
    pub fn lite(config: &WalkerConfig) -> Self {
        Self { lite: true, lite_text_max: config.lite_text_max, lite_text_head: config.lite_text_head }
    }
}

/// Serialize the node list as the agent-readable tree.
pub fn render_tree(nodes: &[WalkerNode], options: &RenderOptions) -> String {
    let mut lines = Vec::new();
    for node in nodes {
        if node.inlined {
            continue;
        }
        lines.push(render_line(node, options));
    }
    lines.join("\n")
}

fn render_line(node: &WalkerNode, options: &RenderOptions) -> String {
    let mut line = String::new();
    for _ in 0..node.depth {
        line.push_str("  ");
    }
    line.push('[');
    line.push_str(&node.hid);
    line.push_str("] ");
    line.push_str(&node.tag);

    if !node.attrs.is_empty() {
        line.push('(');
        line.push_str(&node.attrs);
        line.push(')');
    }
    for action in &node.actions {
        line.push_str(" [");
        line.push_str(action.as_str());
        line.push(']');
    }
    for (key, value) in &node.state {
        if value == "true" {
            line.push_str(&format!(" [{}]", key));
        } else {
            line.push_str(&format!(" [{}=\"{}\"]", key, value));
        }
    }

    let text = display_text(node, options);
    if !text.is_empty() {
        line.push_str(": ");
        line.push_str(&text);
    }
    line
}

fn display_text(node: &WalkerNode, options: &RenderOptions) -> String {
    let text = collapse_whitespace(&node.text);
    if node.is_interactive() {
        return text;
    }
    let len = text.chars().count();
    if options.lite && len > options.lite_text_max {
        let head: String = text.chars().take(options.lite_text_head).collect();
        return format!("{}\u{2026}({} chars omitted)", head, len - options.lite_text_head);
    }
    if len > FULL_TEXT_MAX {
        return crate::walk::truncate_chars(&text, FULL_TEXT_MAX);
    }
    text
}

/// Line breaks and tab runs collapse to single spaces.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space && !out.is_empty() {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Build the hid -> selector side table from the rendered nodes.
pub fn build_node_map(nodes: &[WalkerNode]) -> NodeMap {
    let mut map = NodeMap::new();
    for node in nodes {
        map.insert(node.hid.clone(), node.selector.clone(), node.xpath.clone());
    }
    map
}

/// Summary statistics of one extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractStats {
    pub raw_html_chars: usize,
    pub raw_html_tokens: usize,
    pub tree_chars: usize,
    pub tree_tokens: usize,
    pub compression_ratio: f64,
    pub nodes_before_filter: usize,
    pub nodes_after_filter: usize,
}

impl ExtractStats {
    /// Token counts approximate as chars / 4; ratio is rendered / raw.
    pub fn compute(raw_html_chars: usize, tree: &str, before: usize, after: usize) -> Self {
        let tree_chars = tree.chars().count();
        let ratio = tree_chars as f64 / raw_html_chars.max(1) as f64;
        Self {
            raw_html_chars,
            raw_html_tokens: raw_html_chars / 4,
            tree_chars,
            tree_tokens: tree_chars / 4,
            compression_ratio: (ratio * 1000.0).round() / 1000.0,
            nodes_before_filter: before,
            nodes_after_filter: after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walk::Action;

    fn node(hid: &str, depth: usize, tag: &str, text: &str) -> WalkerNode {
        WalkerNode {
            hid: hid.to_string(),
            depth,
            tag: tag.to_string(),
            text: text.to_string(),
            label: text.to_string(),
            selector: format!("[data-bid=\"{}\"]", hid),
            xpath: format!("/x/{}", hid),
            ..WalkerNode::default()
        }
    }

    #[test]
    fn test_line_grammar() {
        let mut button = node("1.2", 1, "button", "Pay now");
        button.attrs = "type=\"submit\"".to_string();
        button.actions.push(Action::Click);
        button.state.insert("disabled".to_string(), "true".to_string());
        button.state.insert("aria-expanded".to_string(), "false".to_string());

        let line = render_line(&button, &RenderOptions::full());
        assert_eq!(
            line,
            "  [1.2] button(type=\"submit\") [click] [disabled] [aria-expanded=\"false\"]: Pay now"
        );
    }

    #[test]
    fn test_minimal_line() {
        let p = node("3", 0, "p", "");
        assert_eq!(render_line(&p, &RenderOptions::full()), "[3] p");
    }

    #[test]
    fn test_indent_tracks_hid_depth() {
        let deep = node("1.2.3", 2, "span", "x");
        let line = render_line(&deep, &RenderOptions::full());
        assert!(line.starts_with("    [1.2.3]"));
    }

    #[test]
    fn test_inlined_nodes_skipped() {
        let mut link = node("1.1", 1, "a", "");
        link.inlined = true;
        link.actions.push(Action::Click);
        let tree = render_tree(&[node("1", 0, "p", "see \u{27e8}docs\u{27e9}"), link], &RenderOptions::full());
        assert_eq!(tree, "[1] p: see \u{27e8}docs\u{27e9}");
    }

    #[test]
    fn test_newlines_collapsed() {
        let p = node("1", 0, "p", "line one\nline\ttwo");
        let line = render_line(&p, &RenderOptions::full());
        assert!(line.ends_with(": line one line two"));
    }

    #[test]
    fn test_full_mode_caps_noninteractive_text() {
        let long = "x".repeat(300);
        let p = node("1", 0, "p", &long);
        let line = render_line(&p, &RenderOptions::full());
        assert!(line.chars().count() < 140);
        assert!(line.ends_with('\u{2026}'));
    }

    #[test]
    fn test_interactive_text_never_capped() {
        let long = "y".repeat(300);
        let mut a = node("1", 0, "a", &long);
        a.actions.push(Action::Click);
        let line = render_line(&a, &RenderOptions::full());
        assert!(line.contains(&long));
    }

    #[test]
    fn test_lite_mode_truncation() {
        let config = WalkerConfig::default();
        let text = "a".repeat(80);
        let p = node("1", 0, "p", &text);
        let line = render_line(&p, &RenderOptions::lite(&config));
        assert!(line.contains(&"a".repeat(30)));
        assert!(line.contains("\u{2026}(50 chars omitted)"));

        let mut input = node("2", 0, "input", &text);
        input.actions.push(Action::Type);
        let line = render_line(&input, &RenderOptions::lite(&config));
        assert!(line.contains(&text));
    }

    #[test]
    fn test_node_map_built_in_order() {
        let nodes = vec![node("1", 0, "div", "a"), node("1.1", 1, "p", "b")];
        let map = build_node_map(&nodes);
        assert_eq!(map.len(), 2);
        assert_eq!(map.resolve("1.1").unwrap(), "[data-bid=\"1.1\"]");
    }

    #[test]
    fn test_stats() {
        let stats = ExtractStats::compute(4000, &"x".repeat(400), 100, 40);
        assert_eq!(stats.raw_html_tokens, 1000);
        assert_eq!(stats.tree_chars, 400);
        assert_eq!(stats.tree_tokens, 100);
        assert_eq!(stats.compression_ratio, 0.1);
        assert_eq!(stats.nodes_before_filter, 100);
        assert_eq!(stats.nodes_after_filter, 40);
    }
}
