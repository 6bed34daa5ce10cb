//! Google Search: search results, knowledge panels, navigation.

use super::Profile;
use crate::compress::ListLimits;
use crate::config::WalkerConfig;
use crate::walk::WalkerNode;

const NOISE_TAGS: [&str; 4] = ["footer", "svg", "path", "noscript"];
const NOISE_TEXTS: [&str; 8] = [
    "Sign in",
    "Settings",
    "Privacy",
    "Terms",
    "Advertising",
    "Business",
    "About",
    "How Search works",
];

/// Result-page profile: strips chrome and footer navigation.
pub struct GoogleSearchProfile {
    /// Strip `role="contentinfo"` footer blocks.
    pub remove_footer: bool,
    pub max_items: usize,
    pub show_head: usize,
}

impl Default for GoogleSearchProfile {
    fn default() -> Self {
        Self { remove_footer: true, max_items: 30, show_head: 10 }
    }
}

impl Profile for GoogleSearchProfile {
    fn name(&self) -> &str {
        "google_search"
    }

    fn url_patterns(&self) -> &[&str] {
        &["*google.com/search*", "*google.*/search*"]
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
        self.remove_footer && node.attrs.contains("role=\"contentinfo\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(tag: &str, text: &str) -> WalkerNode {
        WalkerNode { tag: tag.to_string(), text: text.to_string(), ..WalkerNode::default() }
    }

    #[test]
    fn test_noise_filtering() {
        let profile = GoogleSearchProfile::default();
        assert!(profile.is_noise(&node("footer", "")));
        assert!(profile.is_noise(&node("div", "How Search works")));
        assert!(!profile.is_noise(&node("a", "Rust Programming Language")));

        let mut footer = node("div", "");
        footer.attrs = "role=\"contentinfo\"".to_string();
        assert!(profile.is_noise(&footer));
    }
}
