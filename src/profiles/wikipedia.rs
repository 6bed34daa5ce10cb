//! Wikipedia: article content, table of contents, infoboxes.

use super::Profile;
use crate::compress::ListLimits;
use crate::config::WalkerConfig;
use crate::walk::WalkerNode;

const SKIP_SECTIONS: [&str; 6] = [
    "External links",
    "References",
    "Notes",
    "Citations",
    "Further reading",
    "Bibliography",
];
const NOISE_TAGS: [&str; 3] = ["footer", "sup", "noscript"];

/// Article profile: drops reference sections, edit links and site chrome.
pub struct WikipediaProfile {
    pub skip_references: bool,
    pub remove_edit_links: bool,
    pub max_items: usize,
    pub show_head: usize,
}

impl Default for WikipediaProfile {
    fn default() -> Self {
        Self { skip_references: true, remove_edit_links: true, max_items: 40, show_head: 15 }
    }
}

impl Profile for WikipediaProfile {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn url_patterns(&self) -> &[&str] {
        &["*wikipedia.org/wiki/*", "*wikipedia.org/w/*"]
    }

    fn limits(&self, _config: &WalkerConfig) -> ListLimits {
        ListLimits::new(self.max_items, self.show_head)
    }

    fn is_noise(&self, node: &WalkerNode) -> bool {
        if NOISE_TAGS.contains(&node.tag.as_str()) {
            return true;
        }
        if node.attrs.contains("role=\"navigation\"") && !node.attrs.contains("mw-") {
            return true;
        }
        if self.remove_edit_links {
            let text = node.text.trim();
            if text == "[edit]" || text == "[citation needed]" {
                return true;
            }
        }
        false
    }

    fn pre_filter(&self, nodes: Vec<WalkerNode>) -> Vec<WalkerNode> {
        let filtered: Vec<WalkerNode> = nodes.into_iter().filter(|n| !self.is_noise(n)).collect();
        if !self.skip_references {
            return filtered;
        }

        // drop whole sections under References/External links headings
        let mut result = Vec::new();
        let mut skip_depth: Option<usize> = None;
        for node in filtered {
            let is_heading = node.tag == "h2" || node.tag == "h3";
            if is_heading && is_skip_section(&node.text) {
                skip_depth = Some(node.depth);
                continue;
            }
            if let Some(depth) = skip_depth {
                if is_heading && node.depth <= depth {
                    skip_depth = None;
                } else {
                    continue;
                }
            }
            result.push(node);
        }
        result
    }
}

fn is_skip_section(text: &str) -> bool {
    let title = text.trim().trim_end_matches("[edit]").trim();
    SKIP_SECTIONS.contains(&title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(depth: usize, tag: &str, text: &str) -> WalkerNode {
        WalkerNode {
            depth,
            tag: tag.to_string(),
            text: text.to_string(),
            ..WalkerNode::default()
        }
    }

    #[test]
    fn test_reference_section_dropped() {
        let profile = WikipediaProfile::default();
        let nodes = vec![
            node(0, "h2", "History"),
            node(1, "p", "Long ago"),
            node(0, "h2", "References"),
            node(1, "li", "Citation 1"),
            node(1, "li", "Citation 2"),
            node(0, "h2", "Legacy"),
            node(1, "p", "Still here"),
        ];
        let out = profile.pre_filter(nodes);
        let texts: Vec<&str> = out.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["History", "Long ago", "Legacy", "Still here"]);
    }

    #[test]
    fn test_edit_suffix_recognized() {
        assert!(is_skip_section("References[edit]"));
        assert!(is_skip_section("  External links  "));
        assert!(!is_skip_section("Early life"));
    }

    #[test]
    fn test_edit_links_removed() {
        let profile = WikipediaProfile::default();
        assert!(profile.is_noise(&node(0, "a", "[edit]")));
        assert!(!profile.is_noise(&node(0, "a", "edit page")));
    }
}
