//! Simplification pass.
//!
//! Collapses the wrapper nesting real pages are made of: contentless wrapper
//! nodes dissolve into their children, text repeated between a parent and its
//! children is deduplicated, and runs of adjacent inline text wrappers merge
//! into a single block. Run to a fixed point by [`simplify`].

use super::tree::TreeNode;
use crate::walk::text::join_cjk_aware;

const WRAPPER_TAGS: [&str; 20] = [
    "div", "span", "section", "article", "main", "header", "footer", "aside", "figure",
    "figcaption", "nav", "details", "summary", "hgroup", "center", "font", "big", "nobr",
    "thead", "tbody",
];

const INLINE_MERGE_TAGS: [&str; 10] =
    ["span", "em", "b", "i", "strong", "small", "font", "u", "s", "label"];

/// Run [`simplify_pass`] until the node count stops shrinking.
pub fn simplify(mut roots: Vec<TreeNode>, max_passes: usize) -> Vec<TreeNode> {
    for _ in 0..max_passes {
        let before = super::tree::count_nodes(&roots);
        roots = simplify_pass(roots);
        if super::tree::count_nodes(&roots) == before {
            break;
        }
    }
    roots
}

/// One bottom-up simplification pass.
pub fn simplify_pass(children: Vec<TreeNode>) -> Vec<TreeNode> {
    let mut result: Vec<TreeNode> = Vec::new();
    for mut node in children {
        node.children = simplify_pass(node.children);
        dedup_text(&mut node);

        let collapsible = is_collapsible(&node.node);
        let has_content =
            !node.node.text.is_empty() || !meaningful_attrs(&node.node.attrs).is_empty();

        if collapsible && !has_content {
            match node.children.len() {
                0 => continue,
                1 => {
                    result.push(node.children.remove(0));
                    continue;
                }
                _ => {
                    result.append(&mut node.children);
                    continue;
                }
            }
        }
        result.push(node);
    }
    merge_inline_runs(&mut result);
    result
}

/// Clear text duplicated between a node and its children.
fn dedup_text(node: &mut TreeNode) {
    if node.node.text.is_empty() || node.children.is_empty() {
        return;
    }
    let combined = children_text(node);
    if !combined.is_empty() {
        let own = node.node.text.clone();
        let covers = own == combined
            || combined.starts_with(&own)
            || (own.starts_with(&combined)
                && combined.chars().count() * 10 > own.chars().count() * 8);
        if covers {
            node.node.text.clear();
        }
    }
    if node.node.text.is_empty() {
        return;
    }
    for child in &mut node.children {
        if !child.node.text.is_empty()
            && child.node.actions.is_empty()
            && text_overlap(&node.node.text, &child.node.text)
        {
            child.node.text.clear();
        }
    }
}

fn children_text(node: &TreeNode) -> String {
    let parts: Vec<String> = node
        .children
        .iter()
        .filter(|c| !c.node.text.is_empty())
        .map(|c| c.node.text.clone())
        .collect();
    parts.join(" ")
}

/// Two texts overlap when equal, or the shorter is a substring of the longer
/// covering more than half of it (and at least 8 chars).
fn text_overlap(a: &str, b: &str) -> bool {
    let a = a.trim();
    let b = b.trim();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b {
        return true;
    }
    let (shorter, longer) = if a.chars().count() <= b.chars().count() { (a, b) } else { (b, a) };
    longer.contains(shorter)
        && shorter.chars().count() >= 8
        && shorter.chars().count() * 2 > longer.chars().count()
}

/// A node may dissolve only when it is a plain wrapper: no actions, no state,
/// no bracketed inline fragment in its text, and a wrapper tag or a
/// presentational role.
fn is_collapsible(node: &crate::walk::WalkerNode) -> bool {
    if !node.actions.is_empty() || !node.state.is_empty() {
        return false;
    }
    if node.text.contains('\u{27e8}') && node.text.contains('\u{27e9}') {
        return false;
    }
    if WRAPPER_TAGS.contains(&node.tag.as_str()) {
        return true;
    }
    has_transparent_role(&node.attrs)
}

fn has_transparent_role(attrs: &str) -> bool {
    attrs.contains("role=\"none\"") || attrs.contains("role=\"presentation\"")
}

/// The formatted attr string minus presentational roles and `id="..."`.
/// What remains is what makes a wrapper worth keeping.
pub(crate) fn meaningful_attrs(attrs: &str) -> String {
    if attrs.is_empty() {
        return String::new();
    }
    attrs
        .split(", ")
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or(pair);
            if key == "id" {
                return false;
            }
            !(key == "role" && has_transparent_role(pair))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Merge adjacent inline text-wrapper siblings into a single text block.
fn merge_inline_runs(nodes: &mut Vec<TreeNode>) {
    let mut i = 0;
    while i + 1 < nodes.len() {
        if is_inline_text_leaf(&nodes[i]) && is_inline_text_leaf(&nodes[i + 1]) {
            let absorbed = nodes.remove(i + 1);
            let merged = join_cjk_aware(&[nodes[i].node.text.clone(), absorbed.node.text]);
            nodes[i].node.text = merged;
        } else {
            i += 1;
        }
    }
}

fn is_inline_text_leaf(node: &TreeNode) -> bool {
    node.children.is_empty()
        && INLINE_MERGE_TAGS.contains(&node.node.tag.as_str())
        && !node.node.text.is_empty()
        && node.node.actions.is_empty()
        && node.node.state.is_empty()
        && meaningful_attrs(&node.node.attrs).is_empty()
}
