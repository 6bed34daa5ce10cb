//! Popup collapsing.
//!
//! Dialog/modal subtrees are usually boilerplate the agent only needs a
//! summary of. The subtree is replaced by a one-line summary node carrying
//! the dialog's concatenated visible text; interactive descendants are
//! hoisted as direct children so they stay targetable.

use super::tree::TreeNode;
use crate::walk::truncate_chars;

const POPUP_ROLES: [&str; 2] = ["dialog", "alertdialog"];
const SUMMARY_TEXT_MAX: usize = 200;

/// Collapse dialog/modal/popup subtrees into summaries.
pub fn collapse_popups(roots: Vec<TreeNode>) -> Vec<TreeNode> {
    roots
        .into_iter()
        .map(|mut node| {
            if is_popup(&node.node) && !node.children.is_empty() {
                let mut texts = Vec::new();
                if !node.node.text.is_empty() {
                    texts.push(node.node.text.clone());
                }
                collect_text(&node.children, &mut texts);
                node.node.text = truncate_chars(&texts.join(" "), SUMMARY_TEXT_MAX);

                let children = std::mem::take(&mut node.children);
                let mut hoisted = Vec::new();
                hoist_interactive(children, &mut hoisted);
                node.children = hoisted;
                node
            } else {
                node.children = collapse_popups(std::mem::take(&mut node.children));
                node
            }
        })
        .collect()
}

fn is_popup(node: &crate::walk::WalkerNode) -> bool {
    if node.tag == "dialog" {
        return true;
    }
    if POPUP_ROLES.iter().any(|r| node.attrs.contains(&format!("role=\"{}\"", r))) {
        return true;
    }
    // custom elements like <fancy-dialog>
    if node.tag.contains('-') && node.tag.contains("dialog") {
        return true;
    }
    node.popup_hint
}

fn collect_text(nodes: &[TreeNode], out: &mut Vec<String>) {
    for node in nodes {
        if !node.node.text.is_empty() {
            out.push(node.node.text.clone());
        }
        collect_text(&node.children, out);
    }
}

fn hoist_interactive(nodes: Vec<TreeNode>, out: &mut Vec<TreeNode>) {
    for node in nodes {
        if node.node.is_interactive() {
            out.push(TreeNode::leaf(node.node.clone()));
        }
        hoist_interactive(node.children, out);
    }
}
