//! Flat/tree conversion and hierarchical identifier assignment.

use crate::walk::WalkerNode;

/// A walker record with reconstructed children.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub node: WalkerNode,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(node: WalkerNode) -> Self {
        Self { node, children: Vec::new() }
    }
}

/// Rebuild the tree from the flat depth-annotated record list. Every record's
/// parent is the most recent record at a smaller depth.
pub fn flat_to_tree(nodes: Vec<WalkerNode>) -> Vec<TreeNode> {
    let mut roots: Vec<TreeNode> = Vec::new();
    let mut stack: Vec<(usize, TreeNode)> = Vec::new();

    fn pop_into(stack: &mut Vec<(usize, TreeNode)>, roots: &mut Vec<TreeNode>) {
        if let Some((_, done)) = stack.pop() {
            match stack.last_mut() {
                Some((_, parent)) => parent.children.push(done),
                None => roots.push(done),
            }
        }
    }

    for record in nodes {
        let depth = record.depth;
        while stack.last().is_some_and(|(d, _)| *d >= depth) {
            pop_into(&mut stack, &mut roots);
        }
        stack.push((depth, TreeNode::leaf(record)));
    }
    while !stack.is_empty() {
        pop_into(&mut stack, &mut roots);
    }
    roots
}

/// Flatten back to pre-order, assigning each node a dotted hierarchical
/// identifier from its 1-based position among its siblings.
pub fn tree_to_flat(roots: Vec<TreeNode>) -> Vec<WalkerNode> {
    let mut flat = Vec::new();
    flatten_into(roots, 0, "", &mut flat);
    flat
}

fn flatten_into(nodes: Vec<TreeNode>, depth: usize, prefix: &str, flat: &mut Vec<WalkerNode>) {
    for (i, tree_node) in nodes.into_iter().enumerate() {
        let hid = format!("{}{}", prefix, i + 1);
        let mut record = tree_node.node;
        record.hid = hid.clone();
        record.depth = depth;
        flat.push(record);
        flatten_into(tree_node.children, depth + 1, &format!("{}.", hid), flat);
    }
}

/// Total node count of a forest.
pub fn count_nodes(roots: &[TreeNode]) -> usize {
    roots.iter().map(|n| 1 + count_nodes(&n.children)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(depth: usize, tag: &str) -> WalkerNode {
        WalkerNode { depth, tag: tag.to_string(), ..WalkerNode::default() }
    }

    #[test]
    fn test_round_trip() {
        let nodes = vec![
            record(0, "div"),
            record(1, "p"),
            record(2, "a"),
            record(1, "p"),
            record(0, "footer"),
        ];
        let roots = flat_to_tree(nodes);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].children.len(), 2);
        assert_eq!(roots[0].children[0].children.len(), 1);
        assert_eq!(count_nodes(&roots), 5);

        let flat = tree_to_flat(roots);
        let hids: Vec<&str> = flat.iter().map(|n| n.hid.as_str()).collect();
        assert_eq!(hids, vec!["1", "1.1", "1.1.1", "1.2", "2"]);
        let depths: Vec<usize> = flat.iter().map(|n| n.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn test_depth_jump_attaches_to_last_shallower() {
        // a record two levels deeper than its predecessor still attaches
        let nodes = vec![record(0, "div"), record(2, "p")];
        let roots = flat_to_tree(nodes);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].children.len(), 1);
        assert_eq!(roots[0].children[0].node.tag, "p");
    }

    #[test]
    fn test_empty() {
        assert!(flat_to_tree(Vec::new()).is_empty());
        assert!(tree_to_flat(Vec::new()).is_empty());
    }
}
