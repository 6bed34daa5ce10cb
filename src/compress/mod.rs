//! Compress stage.
//!
//! Pure tree transformations over the flat walker record list:
//!
//! 1. `flat_to_tree` — rebuild parent-child hierarchy from the depth field
//! 2. `simplify` (fixed point, ≤10 passes) — collapse redundant wrappers,
//!    dedup repeated text, merge inline sibling runs
//! 3. `collapse_popups` — fold dialog subtrees into one-line summaries,
//!    hoisting interactive descendants
//! 4. `truncate_long_lists` — truncate homogeneous child runs
//! 5. `prune_empty_leaves` — drop leaves with no content
//! 6. `tree_to_flat` — flatten back, assigning hierarchical identifiers

pub mod lists;
pub mod popups;
pub mod prune;
pub mod simplify;
pub mod tree;

pub use lists::ListLimits;
pub use tree::TreeNode;

use crate::walk::WalkerNode;

/// Run the full compression pipeline over a walker record list.
pub fn run(nodes: Vec<WalkerNode>, limits: &ListLimits) -> Vec<WalkerNode> {
    let before = nodes.len();
    let roots = tree::flat_to_tree(nodes);
    let roots = simplify::simplify(roots, 10);
    let roots = popups::collapse_popups(roots);
    let roots = lists::truncate_long_lists(roots, limits);
    let roots = prune::prune_empty_leaves(roots);
    let flat = tree::tree_to_flat(roots);
    log::debug!("compress: {} -> {} nodes", before, flat.len());
    flat
}
