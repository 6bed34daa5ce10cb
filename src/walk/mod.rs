//! Walk stage.
//!
//! Depth-first, left-to-right traversal of the prepared arena, producing the
//! flat ordered record list the compressor consumes. Each visited element is
//! either skipped (skip-tag, hidden, pure inline text wrapper), folded into a
//! special form (`svg` icon leaf, `tr` row line) or emitted as a full record.

mod actions;
mod labels;
mod selector;
mod state;
pub(crate) mod text;

pub use actions::{detect_actions, Action};

use crate::config::{CompiledHints, WalkerConfig};
use crate::snapshot::{DomArena, GroupRole, NodeId};
use indexmap::IndexMap;
use labels::LabelIndex;
use serde::{Deserialize, Serialize};

/// One emitted element, in walker emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalkerNode {
    /// Hierarchical identifier, assigned by the compressor; empty until then.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hid: String,
    /// Monotonic 1-based emission counter.
    pub idx: u32,
    /// Depth relative to `body` (0 = direct child).
    pub depth: usize,
    /// Lowercase tag name.
    pub tag: String,
    /// Pre-formatted comma-separated surfaced attributes.
    pub attrs: String,
    /// Text displayed on this node's line; may be empty.
    pub text: String,
    /// Best human-readable label for the element.
    pub label: String,
    /// Associated `<label>` text for form controls.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub form_label: String,
    /// Detected action set.
    pub actions: Vec<Action>,
    /// Recognized state keys (checked, disabled, value, ...).
    pub state: IndexMap<String, String>,
    /// Stable back-reference selector.
    pub selector: String,
    /// Fallback xpath.
    pub xpath: String,
    /// The element is an inline interactive fragment already bracketed in its
    /// parent's text; it gets an identifier but no rendered line.
    pub inlined: bool,
    /// The element's class string marks it as a dialog/modal/popup container.
    #[serde(skip)]
    pub popup_hint: bool,
}

impl WalkerNode {
    /// True when the record carries at least one action.
    pub fn is_interactive(&self) -> bool {
        !self.actions.is_empty()
    }
}

/// Walk the prepared arena into the flat record list.
pub fn walk(arena: &DomArena, config: &WalkerConfig, hints: &CompiledHints) -> Vec<WalkerNode> {
    let labels = LabelIndex::build(arena, hints);
    let mut walker = Walker { arena, config, hints, labels, nodes: Vec::new(), stopped: false };
    walker.walk_children(arena.root(), 0, false);
    log::debug!("walk: emitted {} records", walker.nodes.len());
    walker.nodes
}

struct Walker<'a> {
    arena: &'a DomArena,
    config: &'a WalkerConfig,
    hints: &'a CompiledHints,
    labels: LabelIndex,
    nodes: Vec<WalkerNode>,
    stopped: bool,
}

const POPUP_CLASS_KEYWORDS: [&str; 3] = ["modal", "popup", "dialog"];

impl<'a> Walker<'a> {
    fn at_capacity(&mut self) -> bool {
        if self.nodes.len() >= self.config.max_nodes {
            self.stopped = true;
        }
        self.stopped
    }

    /// `text_collected` is true when the parent emitted a record whose text
    /// pass already gathered inline children; only then may they be folded.
    fn walk_children(&mut self, parent: NodeId, depth: usize, text_collected: bool) {
        if depth > self.config.max_depth {
            return;
        }
        for child in self.arena.element_children(parent) {
            if self.at_capacity() {
                return;
            }
            let node = self.arena.node(child);
            if self.hints.is_skip_tag(&node.tag) {
                continue;
            }
            if node.hidden {
                continue;
            }
            match node.tag.as_str() {
                "svg" => self.emit_svg(child, depth),
                "tr" => self.emit_row(child, depth),
                _ => self.emit_element(child, depth, text_collected),
            }
        }
    }

    /// Element children that are neither skip-tags nor text.
    fn block_children(&self, id: NodeId) -> Vec<NodeId> {
        self.arena
            .element_children(id)
            .into_iter()
            .filter(|&c| !self.hints.is_skip_tag(&self.arena.node(c).tag))
            .collect()
    }

    fn emit_element(&mut self, id: NodeId, depth: usize, text_collected: bool) {
        let node = self.arena.node(id);
        let tag = node.tag.clone();

        let actions = detect_actions(self.arena, id, self.hints);
        let attrs = format_attrs(self.arena, id, self.config);
        let block_children = self.block_children(id);
        let icon = node.icon.clone();

        // pure inline text wrappers fold into the ancestor's text pass
        if text_collected
            && self.hints.is_inline_tag(&tag)
            && actions.is_empty()
            && block_children.is_empty()
            && icon.is_none()
            && attrs.is_empty()
        {
            return;
        }

        let text = text::collect_text(self.arena, id, self.config, self.hints);
        let mut state = state::detect_state(self.arena, id, self.config);
        match node.group {
            Some(GroupRole::Active) => {
                state.insert("selected".to_string(), "true".to_string());
            }
            Some(GroupRole::Inactive) => {
                state.insert("hidden".to_string(), "true".to_string());
            }
            None => {}
        }

        let img_name = image_name(self.arena, id);
        let label = derive_label(self.arena, id, &text, icon.as_deref(), &img_name);
        let form_label = if matches!(tag.as_str(), "input" | "textarea" | "select") {
            self.labels.form_label(self.arena, id, self.hints)
        } else {
            String::new()
        };

        let inlined = self.hints.is_inline_tag(&tag) && !actions.is_empty() && block_children.is_empty();
        let display_text = if inlined {
            String::new()
        } else if text.is_empty() {
            icon.as_deref().map(|i| format!("[icon: {}]", i)).unwrap_or_default()
        } else {
            text
        };

        let class_lower = self.arena.class(id).to_lowercase();
        let popup_hint = POPUP_CLASS_KEYWORDS.iter().any(|kw| class_lower.contains(kw));

        self.push_record(WalkerNode {
            hid: String::new(),
            idx: 0,
            depth,
            tag,
            attrs,
            text: display_text,
            label,
            form_label,
            actions,
            state,
            selector: selector::css_selector(self.arena, id),
            xpath: selector::xpath_selector(self.arena, id),
            inlined,
            popup_hint,
        });

        if !block_children.is_empty() {
            self.walk_children(id, depth + 1, true);
        }
    }

    /// svg subtrees collapse to a single icon leaf; never descended into.
    fn emit_svg(&mut self, id: NodeId, depth: usize) {
        let node = self.arena.node(id);
        let name = node
            .icon
            .clone()
            .or_else(|| svg_title_text(self.arena, id))
            .or_else(|| self.arena.attr(id, "aria-label").map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
            .or_else(|| node.parent.and_then(|p| self.arena.node(p).icon.clone()));

        let text = name.as_deref().map(|n| format!("[icon: {}]", n)).unwrap_or_default();
        let actions = detect_actions(self.arena, id, self.hints);
        self.push_record(WalkerNode {
            hid: String::new(),
            idx: 0,
            depth,
            tag: "svg".to_string(),
            attrs: format_attrs(self.arena, id, self.config),
            text: text.clone(),
            label: text,
            form_label: String::new(),
            actions,
            state: state::detect_state(self.arena, id, self.config),
            selector: selector::css_selector(self.arena, id),
            xpath: selector::xpath_selector(self.arena, id),
            inlined: false,
            popup_hint: false,
        });
    }

    /// Rows collapse to one ` | `-joined line; cells with interactive content
    /// leave an empty slot and are recursed into instead.
    fn emit_row(&mut self, id: NodeId, depth: usize) {
        let mut cells = Vec::new();
        let mut interactive_cells = Vec::new();
        for cell in self.arena.element_children(id) {
            let tag = self.arena.node(cell).tag.as_str();
            if tag != "td" && tag != "th" {
                continue;
            }
            if self.cell_has_interactive(cell) {
                cells.push(String::new());
                interactive_cells.push(cell);
            } else {
                let mut text = text::collect_text(self.arena, cell, self.config, self.hints);
                if text.is_empty() {
                    text = self.arena.visible_text(cell, &|t| self.hints.is_skip_tag(t));
                }
                cells.push(truncate_chars(&text, 500));
            }
        }
        let row_text = if cells.is_empty() { String::new() } else { cells.join(" | ") };

        self.push_record(WalkerNode {
            hid: String::new(),
            idx: 0,
            depth,
            tag: "tr".to_string(),
            attrs: format_attrs(self.arena, id, self.config),
            text: row_text.clone(),
            label: row_text,
            form_label: String::new(),
            actions: Vec::new(),
            state: state::detect_state(self.arena, id, self.config),
            selector: selector::css_selector(self.arena, id),
            xpath: selector::xpath_selector(self.arena, id),
            inlined: false,
            popup_hint: false,
        });

        for cell in interactive_cells {
            if self.at_capacity() {
                return;
            }
            self.walk_children(cell, depth + 1, false);
        }
    }

    fn cell_has_interactive(&self, cell: NodeId) -> bool {
        for child in self.arena.element_children(cell) {
            let node = self.arena.node(child);
            if self.hints.is_skip_tag(&node.tag) || node.hidden {
                continue;
            }
            if !detect_actions(self.arena, child, self.hints).is_empty() {
                return true;
            }
            if self.cell_has_interactive(child) {
                return true;
            }
        }
        false
    }

    fn push_record(&mut self, mut record: WalkerNode) {
        record.idx = self.nodes.len() as u32 + 1;
        self.nodes.push(record);
    }
}

/// Format the surfaced attributes of an element per the attr rules.
fn format_attrs(arena: &DomArena, id: NodeId, config: &WalkerConfig) -> String {
    let tag = &arena.node(id).tag;
    let mut keys: Vec<&str> = config.global_attrs.iter().map(|s| s.as_str()).collect();
    if let Some(rules) = config.attr_rules.get(tag) {
        keys.extend(rules.iter().map(|s| s.as_str()));
    }

    let mut pairs = Vec::new();
    for key in keys {
        let Some(value) = arena.attr(id, key) else { continue };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key {
            // URLs are noise; presence is the signal
            "href" => pairs.push("href".to_string()),
            "src" => {
                if !value.starts_with("data:") {
                    let fname = tail_filename(value);
                    if !fname.is_empty() && fname.chars().count() <= 80 {
                        pairs.push(format!("src=\"{}\"", fname));
                        continue;
                    }
                }
                pairs.push("src".to_string());
            }
            "action" => {
                let path = value.split('?').next().unwrap_or("");
                pairs.push(format!("action=\"{}\"", truncate_chars(path, 60)));
            }
            _ => pairs.push(format!("{}=\"{}\"", key, truncate_chars(value, 80))),
        }
    }
    pairs.join(", ")
}

/// Trailing filename of a URL, query and fragment stripped.
fn tail_filename(url: &str) -> String {
    url.rsplit('/')
        .next()
        .unwrap_or("")
        .split(['?', '#'])
        .next()
        .unwrap_or("")
        .to_string()
}

/// Media elements are labeled by their source filename minus extension.
fn image_name(arena: &DomArena, id: NodeId) -> String {
    let tag = arena.node(id).tag.as_str();
    if !matches!(tag, "img" | "video" | "audio" | "source") {
        return String::new();
    }
    let Some(src) = arena.attr(id, "src") else { return String::new() };
    if src.starts_with("data:") {
        return String::new();
    }
    let fname = tail_filename(src);
    match fname.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => fname,
    }
}

fn derive_label(
    arena: &DomArena,
    id: NodeId,
    text: &str,
    icon: Option<&str>,
    img_name: &str,
) -> String {
    let attr = |name: &str| arena.attr(id, name).map(str::trim).unwrap_or("").to_string();
    let label = if !text.is_empty() {
        text.to_string()
    } else if !attr("aria-label").is_empty() {
        attr("aria-label")
    } else if !attr("title").is_empty() {
        attr("title")
    } else if let Some(icon) = icon {
        format!("[icon: {}]", icon)
    } else if !attr("placeholder").is_empty() {
        attr("placeholder")
    } else if !attr("alt").is_empty() {
        attr("alt")
    } else if !img_name.is_empty() {
        format!("[img: {}]", img_name)
    } else {
        attr("value")
    };
    truncate_chars(&label, 500)
}

/// Truncate on a char boundary, appending an ellipsis when shortened.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push('\u{2026}');
    out
}

fn svg_title_text(arena: &DomArena, svg: NodeId) -> Option<String> {
    let title = arena
        .element_children(svg)
        .into_iter()
        .find(|&c| arena.node(c).tag == "title")?;
    let text = arena.raw_text(title);
    let text = text.trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
