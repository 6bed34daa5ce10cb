//! State detection.
//!
//! Copies the recognized state attributes into the node's state mapping and
//! reads the live `value` of form controls. A typeable input whose text color
//! is gray gets its value reclassified as `placeholder` — legacy sites
//! emulate placeholders with a preset value and gray styling.

use crate::config::WalkerConfig;
use crate::snapshot::{DomArena, NodeId};
use indexmap::IndexMap;

/// Detect the state mapping of an element.
pub fn detect_state(arena: &DomArena, id: NodeId, config: &WalkerConfig) -> IndexMap<String, String> {
    let node = arena.node(id);
    let mut state = IndexMap::new();

    for attr in &config.state_attrs {
        if let Some(value) = arena.attr(id, attr) {
            let value = if value.is_empty() { "true" } else { value };
            state.insert(attr.clone(), value.to_string());
        }
    }

    match node.checked {
        Some(true) => {
            state.entry("checked".to_string()).or_insert_with(|| "true".to_string());
        }
        Some(false) => {
            state.shift_remove("checked");
        }
        None => {}
    }

    if matches!(node.tag.as_str(), "input" | "textarea" | "select") {
        let value = node
            .value
            .clone()
            .or_else(|| arena.attr(id, "value").map(str::to_string));
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            let value = super::truncate_chars(&value, 80);
            let key = if node.tag == "input" && is_typeable(arena, id, config) && has_gray_text(arena, id, config) {
                "placeholder"
            } else {
                "value"
            };
            state.insert(key.to_string(), value);
        }
    }

    state
}

fn is_typeable(arena: &DomArena, id: NodeId, config: &WalkerConfig) -> bool {
    let ty = arena.attr(id, "type").unwrap_or("text").to_ascii_lowercase();
    config.typeable_input_types.iter().any(|t| t == &ty)
}

fn has_gray_text(arena: &DomArena, id: NodeId, config: &WalkerConfig) -> bool {
    let color = arena
        .node(id)
        .text_color
        .clone()
        .or_else(|| {
            arena
                .attr(id, "style")
                .and_then(|s| crate::snapshot::style_property(s, "color"))
                .map(str::to_string)
        });
    let Some(color) = color else { return false };
    let Some((r, g, b)) = parse_color(&color) else { return false };

    let min = config.gray_text_min_rgb;
    let diff = config.gray_text_max_diff;
    let hi = r.max(g).max(b);
    let lo = r.min(g).min(b);
    r >= min && g >= min && b >= min && hi - lo <= diff
}

/// Parse `rgb(...)`, `rgba(...)`, `#rgb` and `#rrggbb` color strings.
fn parse_color(color: &str) -> Option<(u8, u8, u8)> {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        return match hex.len() {
            3 => {
                let mut it = hex.chars();
                let r = it.next()?.to_digit(16)? as u8;
                let g = it.next()?.to_digit(16)? as u8;
                let b = it.next()?.to_digit(16)? as u8;
                Some((r * 17, g * 17, b * 17))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some((r, g, b))
            }
            _ => None,
        };
    }
    let body = color
        .strip_prefix("rgba")
        .or_else(|| color.strip_prefix("rgb"))?
        .trim()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    let mut channels = body.split(',').map(|p| p.trim().parse::<f64>());
    let r = channels.next()?.ok()?;
    let g = channels.next()?.ok()?;
    let b = channels.next()?.ok()?;
    Some((r as u8, g as u8, b as u8))
}
