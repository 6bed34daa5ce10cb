//! Icon classification.
//!
//! An element with no visible text of its own and no `aria-label` may still
//! mean something to the user: an icon font glyph, a material ligature, an
//! svg sprite. This pass derives a name for such elements so the walker can
//! label them `[icon: name]`.

use crate::config::{CompiledHints, WalkerConfig};
use crate::snapshot::{DomArena, NodeId};

const INTERACTIVE_TAGS: [&str; 5] = ["a", "button", "input", "select", "textarea"];

/// Attach an icon name to every qualifying element.
pub fn classify(arena: &mut DomArena, config: &WalkerConfig, hints: &CompiledHints) {
    for id in arena.ids().collect::<Vec<_>>() {
        if arena.node(id).hidden {
            continue;
        }
        // svg <title>/<desc> never render as text, so they don't count as
        // visible text for the gate
        let visible = arena.visible_text(id, &|t| hints.is_skip_tag(t) || t == "title" || t == "desc");
        if !visible.is_empty() {
            continue;
        }
        if arena.attr(id, "aria-label").is_some_and(|v| !v.trim().is_empty()) {
            continue;
        }

        let icon = from_class_prefix(arena, id, hints)
            .or_else(|| from_material_ligature(arena, id, hints))
            .or_else(|| from_svg_use(arena, id))
            .or_else(|| from_svg_title(arena, id))
            .or_else(|| from_semantic_ancestor(arena, id, hints));

        if let Some(name) = icon {
            if is_small(arena, id, config.icon_max_size) {
                arena.node_mut(id).icon = Some(name);
            }
        }
    }
}

/// `fa-search`, `icon-close`, ... -> the suffix after the prefix.
fn from_class_prefix(arena: &DomArena, id: NodeId, hints: &CompiledHints) -> Option<String> {
    let re = hints.icon_prefix_re.as_ref()?;
    re.captures(arena.class(id)).map(|c| c[1].to_string())
}

/// Material icon fonts render their ligature text as a glyph; the text
/// content (short, invisible as text) is the icon name.
fn from_material_ligature(arena: &DomArena, id: NodeId, hints: &CompiledHints) -> Option<String> {
    let re = hints.material_re.as_ref()?;
    if !re.is_match(arena.class(id)) {
        return None;
    }
    let text = arena.raw_text(id);
    let text = text.trim();
    if !text.is_empty() && text.chars().count() < 40 {
        Some(text.to_string())
    } else {
        None
    }
}

/// `<svg><use href="#icon-search">` -> `search`.
fn from_svg_use(arena: &DomArena, id: NodeId) -> Option<String> {
    let svg = if arena.node(id).tag == "svg" { id } else { arena.find_descendant(id, "svg")? };
    let use_el = arena.find_descendant(svg, "use")?;
    let href = arena
        .attr(use_el, "href")
        .or_else(|| arena.attr(use_el, "xlink:href"))?;
    let fragment = href.rsplit('#').next().filter(|f| !f.is_empty())?;
    let name = fragment
        .strip_prefix("icon-")
        .or_else(|| fragment.strip_prefix("icon_"))
        .or_else(|| fragment.strip_prefix("icon"))
        .filter(|n| !n.is_empty())
        .unwrap_or(fragment);
    Some(name.to_string())
}

/// `<svg><title>Close</title></svg>`.
fn from_svg_title(arena: &DomArena, id: NodeId) -> Option<String> {
    let svg = if arena.node(id).tag == "svg" { id } else { arena.find_descendant(id, "svg")? };
    let title = arena
        .element_children(svg)
        .into_iter()
        .find(|&c| arena.node(c).tag == "title")?;
    let text = arena.raw_text(title);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Last resort: search ancestor class strings for a semantic keyword.
/// Interactive elements look up to four levels, others only one.
fn from_semantic_ancestor(arena: &DomArena, id: NodeId, hints: &CompiledHints) -> Option<String> {
    let node = arena.node(id);
    let interactive = INTERACTIVE_TAGS.contains(&node.tag.as_str())
        || matches!(arena.attr(id, "role"), Some("button") | Some("link"));
    let max_levels = if interactive { 4 } else { 1 };

    let mut current = Some(id);
    for _ in 0..max_levels {
        let here = current?;
        if here == arena.root() {
            return None;
        }
        let class = arena.class(here).to_lowercase();
        if !class.is_empty() {
            for (keyword, re) in &hints.semantic_res {
                if re.is_match(&class) {
                    return Some(keyword.clone());
                }
            }
        }
        current = arena.node(here).parent;
    }
    None
}

/// Icon candidates must be small or childless; a full-width hero div with an
/// icon-ish class is not an icon.
fn is_small(arena: &DomArena, id: NodeId, max_size: f64) -> bool {
    let fits = arena
        .node(id)
        .rect
        .is_some_and(|(w, h)| w <= max_size && h <= max_size);
    fits || !arena.has_element_children(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::RawNode;

    fn classify_all(root: RawNode) -> DomArena {
        let config = WalkerConfig::default();
        let hints = config.compile();
        let mut arena = DomArena::build(&root);
        classify(&mut arena, &config, &hints);
        arena
    }

    fn first_child_icon(arena: &DomArena) -> Option<String> {
        let child = arena.element_children(arena.root())[0];
        arena.node(child).icon.clone()
    }

    #[test]
    fn test_class_prefix() {
        let root = RawNode::new("body")
            .with_child(RawNode::new("i").with_attr("class", "fa fa-search").with_rect(16.0, 16.0));
        let arena = classify_all(root);
        assert_eq!(first_child_icon(&arena).as_deref(), Some("search"));
    }

    #[test]
    fn test_text_blocks_icon() {
        let root = RawNode::new("body")
            .with_child(RawNode::new("i").with_attr("class", "fa-search").with_text("Search"));
        let arena = classify_all(root);
        assert_eq!(first_child_icon(&arena), None);
    }

    #[test]
    fn test_aria_label_blocks_icon() {
        let root = RawNode::new("body")
            .with_child(RawNode::new("i").with_attr("class", "fa-x").with_attr("aria-label", "Close"));
        let arena = classify_all(root);
        assert_eq!(first_child_icon(&arena), None);
    }

    #[test]
    fn test_svg_use_href() {
        let root = RawNode::new("body").with_child(
            RawNode::new("button").with_rect(28.0, 28.0).with_child(
                RawNode::new("svg")
                    .with_rect(20.0, 20.0)
                    .with_child(RawNode::new("use").with_attr("href", "#icon-close")),
            ),
        );
        let arena = classify_all(root);
        assert_eq!(first_child_icon(&arena).as_deref(), Some("close"));
    }

    #[test]
    fn test_svg_title() {
        let root = RawNode::new("body").with_child(
            RawNode::new("svg")
                .with_rect(24.0, 24.0)
                .with_child(RawNode::new("title").with_text("Download")),
        );
        let arena = classify_all(root);
        assert_eq!(first_child_icon(&arena).as_deref(), Some("Download"));
    }

    #[test]
    fn test_semantic_ancestor_on_button_class() {
        let root = RawNode::new("body").with_child(
            RawNode::new("button").with_attr("class", "download-btn").with_rect(24.0, 24.0),
        );
        let arena = classify_all(root);
        assert_eq!(first_child_icon(&arena).as_deref(), Some("download"));
    }

    #[test]
    fn test_semantic_ancestor_depth_limit() {
        // non-interactive: only one level is searched
        let root = RawNode::new("body").with_child(
            RawNode::new("div").with_attr("class", "search-bar").with_child(
                RawNode::new("div").with_child(RawNode::new("span").with_rect(10.0, 10.0)),
            ),
        );
        let arena = classify_all(root);
        let outer = arena.element_children(arena.root())[0];
        let mid = arena.element_children(outer)[0];
        let span = arena.element_children(mid)[0];
        assert_eq!(arena.node(span).icon, None);

        // interactive: four levels reach the named ancestor
        let root = RawNode::new("body").with_child(
            RawNode::new("div").with_attr("class", "search-bar").with_child(
                RawNode::new("div").with_child(RawNode::new("button").with_rect(10.0, 10.0)),
            ),
        );
        let arena = classify_all(root);
        let outer = arena.element_children(arena.root())[0];
        let mid = arena.element_children(outer)[0];
        let button = arena.element_children(mid)[0];
        assert_eq!(arena.node(button).icon.as_deref(), Some("search"));
    }

    #[test]
    fn test_large_element_rejected() {
        let root = RawNode::new("body").with_child(
            RawNode::new("div")
                .with_attr("class", "fa-search")
                .with_rect(800.0, 600.0)
                .with_child(RawNode::new("div")),
        );
        let arena = classify_all(root);
        assert_eq!(first_child_icon(&arena), None);
    }
}
