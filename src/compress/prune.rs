//! Empty-leaf pruning.
//!
//! The simplify pass clears duplicated text rather than deleting nodes; this
//! final sweep removes the leaves left with nothing to say. Bottom-up, so a
//! wrapper whose last leaf disappears is itself removed in the same pass.

use super::simplify::meaningful_attrs;
use super::tree::TreeNode;

/// Remove leaf nodes carrying no text, actions, state or meaningful attrs.
pub fn prune_empty_leaves(roots: Vec<TreeNode>) -> Vec<TreeNode> {
    let mut result = Vec::new();
    for mut node in roots {
        node.children = prune_empty_leaves(node.children);
        let keep = !node.children.is_empty()
            || !node.node.text.trim().is_empty()
            || !node.node.actions.is_empty()
            || !node.node.state.is_empty()
            || !meaningful_attrs(&node.node.attrs).is_empty();
        if keep {
            result.push(node);
        }
    }
    result
}
