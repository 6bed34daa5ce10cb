//! YouTube: video info, search results, comments.

use super::Profile;
use crate::compress::ListLimits;
use crate::config::WalkerConfig;
use crate::walk::WalkerNode;

const NOISE_TAGS: [&str; 4] = ["footer", "path", "noscript", "svg"];
const NOISE_TEXTS: [&str; 6] = [
    "Terms",
    "Privacy",
    "Policy & Safety",
    "How YouTube works",
    "Test new features",
    "NFL Sunday Ticket",
];

/// Watch/search profile: strips the miniplayer overlay and guide drawer.
pub struct YoutubeProfile {
    pub remove_miniplayer: bool,
    pub remove_guide: bool,
    pub max_items: usize,
    pub show_head: usize,
}

impl Default for YoutubeProfile {
    fn default() -> Self {
        Self { remove_miniplayer: true, remove_guide: true, max_items: 20, show_head: 8 }
    }
}

impl Profile for YoutubeProfile {
    fn name(&self) -> &str {
        "youtube"
    }

    fn url_patterns(&self) -> &[&str] {
        &["*youtube.com/*", "*youtu.be/*"]
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
        if self.remove_miniplayer && (node.tag.contains("ytd-miniplayer") || node.tag.contains("ytd-popup")) {
            return true;
        }
        self.remove_guide && (node.tag.contains("tp-yt-app-drawer") || node.tag.contains("ytd-guide"))
    }
}
