//! Stack Overflow: question, answers, votes, comments.

use super::Profile;
use crate::compress::ListLimits;
use crate::config::WalkerConfig;
use crate::walk::WalkerNode;

const NOISE_TAGS: [&str; 3] = ["footer", "svg", "noscript"];
const NOISE_TEXTS: [&str; 5] =
    ["Teams", "Advertising", "Talent", "Company", "Stack Overflow for Teams"];

/// Question-page profile: strips the right sidebar and consent banner.
pub struct StackOverflowProfile {
    pub remove_sidebar: bool,
    pub max_items: usize,
    pub show_head: usize,
}

impl Default for StackOverflowProfile {
    fn default() -> Self {
        Self { remove_sidebar: true, max_items: 30, show_head: 10 }
    }
}

impl Profile for StackOverflowProfile {
    fn name(&self) -> &str {
        "stackoverflow"
    }

    fn url_patterns(&self) -> &[&str] {
        &["*stackoverflow.com/questions/*", "*stackexchange.com/questions/*"]
    }

    fn limits(&self, _config: &WalkerConfig) -> ListLimits {
        ListLimits::new(self.max_items, self.show_head)
    }

    fn is_noise(&self, node: &WalkerNode) -> bool {
        if NOISE_TAGS.contains(&node.tag.as_str()) {
            return true;
        }
        if NOISE_TEXTS.contains(&node.text.trim()) {
            return true;
        }
        if node.attrs.contains("js-consent-banner") {
            return true;
        }
        self.remove_sidebar
            && (node.attrs.contains("js-sidebar-zone") || node.attrs.to_lowercase().contains("sidebar"))
    }
}
