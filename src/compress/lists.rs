//! Long-list truncation.
//!
//! A container with dozens of structurally identical children (search results
//! past the fold, link farms, tag clouds) is sampled: the head is kept and
//! the remainder replaced by a synthetic ellipsis node. Runs that are mostly
//! interactive are left alone — every target must stay addressable.

use super::tree::TreeNode;
use crate::walk::WalkerNode;
use std::collections::HashMap;

/// Truncation parameters, overridable per compressor profile.
#[derive(Debug, Clone, Copy)]
pub struct ListLimits {
    /// Child count above which truncation is considered.
    pub max_items: usize,
    /// Children kept when truncating.
    pub show_head: usize,
}

impl Default for ListLimits {
    fn default() -> Self {
        Self { max_items: 50, show_head: 10 }
    }
}

impl ListLimits {
    pub fn new(max_items: usize, show_head: usize) -> Self {
        Self { max_items, show_head }
    }
}

/// Truncate homogeneous long child runs throughout the forest.
pub fn truncate_long_lists(roots: Vec<TreeNode>, limits: &ListLimits) -> Vec<TreeNode> {
    roots
        .into_iter()
        .map(|mut node| {
            node.children = truncate_long_lists(std::mem::take(&mut node.children), limits);
            let n = node.children.len();
            if n <= limits.max_items {
                return node;
            }

            let mut tag_freq: HashMap<&str, usize> = HashMap::new();
            for child in &node.children {
                *tag_freq.entry(child.node.tag.as_str()).or_default() += 1;
            }
            let dominant = tag_freq.values().copied().max().unwrap_or(0);
            if (dominant as f64) < n as f64 * 0.7 {
                return node;
            }
            let interactive = node.children.iter().filter(|c| has_interactive(c)).count();
            if interactive as f64 > n as f64 * 0.3 {
                return node;
            }

            node.children.truncate(limits.show_head);
            node.children.push(ellipsis_node(n - limits.show_head));
            node
        })
        .collect()
}

fn has_interactive(node: &TreeNode) -> bool {
    node.node.is_interactive() || node.children.iter().any(has_interactive)
}

fn ellipsis_node(omitted: usize) -> TreeNode {
    TreeNode::leaf(WalkerNode {
        tag: "\u{2026}".to_string(),
        text: format!("({} more)", omitted),
        ..WalkerNode::default()
    })
}
