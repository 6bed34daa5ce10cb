//! Compressor profiles.
//!
//! The default compression works everywhere; well-known sites benefit from
//! extra noise filtering and tighter list limits. A profile bundles a noise
//! predicate, truncation limits and optional record-level pre-filtering, and
//! declares the URL wildcard patterns it handles. The registry picks the
//! first enabled profile whose pattern matches the page URL, falling back to
//! the default. Site profiles ship disabled.

mod google_search;
mod stackoverflow;
mod wikipedia;
mod youtube;

pub use google_search::GoogleSearchProfile;
pub use stackoverflow::StackOverflowProfile;
pub use wikipedia::WikipediaProfile;
pub use youtube::YoutubeProfile;

use crate::compress::{self, ListLimits};
use crate::config::WalkerConfig;
use crate::walk::WalkerNode;
use std::collections::HashSet;

/// A pluggable compression strategy.
pub trait Profile: Send + Sync {
    /// Registry name, unique.
    fn name(&self) -> &str;

    /// URL wildcard patterns this profile handles.
    fn url_patterns(&self) -> &[&str] {
        &[]
    }

    /// List-truncation limits; defaults to the configured global limits.
    fn limits(&self, config: &WalkerConfig) -> ListLimits {
        ListLimits::new(config.list_max_items, config.list_show_head)
    }

    /// Per-record noise predicate applied before tree building.
    fn is_noise(&self, node: &WalkerNode) -> bool {
        let _ = node;
        false
    }

    /// Record-level pre-filter; the default drops noise records.
    fn pre_filter(&self, nodes: Vec<WalkerNode>) -> Vec<WalkerNode> {
        nodes.into_iter().filter(|n| !self.is_noise(n)).collect()
    }

    /// Run the full compression pipeline under this profile.
    fn process(&self, nodes: Vec<WalkerNode>, config: &WalkerConfig) -> Vec<WalkerNode> {
        let filtered = self.pre_filter(nodes);
        compress::run(filtered, &self.limits(config))
    }
}

/// The built-in general-purpose profile.
pub struct DefaultProfile;

impl Profile for DefaultProfile {
    fn name(&self) -> &str {
        "default"
    }
}

/// Profile registry with URL-based selection.
pub struct ProfileRegistry {
    profiles: Vec<Box<dyn Profile>>,
    disabled: HashSet<String>,
    fallback: DefaultProfile,
}

impl ProfileRegistry {
    /// Registry with only the default profile.
    pub fn new() -> Self {
        Self { profiles: Vec::new(), disabled: HashSet::new(), fallback: DefaultProfile }
    }

    /// Registry with all bundled site profiles registered but disabled, as
    /// shipped. Call [`enable`](Self::enable) to turn one on.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(GoogleSearchProfile::default()));
        registry.register(Box::new(WikipediaProfile::default()));
        registry.register(Box::new(YoutubeProfile::default()));
        registry.register(Box::new(StackOverflowProfile::default()));
        for name in ["google_search", "wikipedia", "youtube", "stackoverflow"] {
            registry.disable(name);
        }
        registry
    }

    pub fn register(&mut self, profile: Box<dyn Profile>) {
        self.profiles.push(profile);
    }

    pub fn enable(&mut self, name: &str) {
        self.disabled.remove(name);
    }

    pub fn disable(&mut self, name: &str) {
        self.disabled.insert(name.to_string());
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        !self.disabled.contains(name)
    }

    /// First enabled profile whose pattern matches the URL, else the default.
    pub fn match_url(&self, url: &str) -> &dyn Profile {
        for profile in &self.profiles {
            if self.disabled.contains(profile.name()) {
                continue;
            }
            if profile.url_patterns().iter().any(|p| wildcard_match(p, url)) {
                return profile.as_ref();
            }
        }
        &self.fallback
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Shell-style wildcard match: `*` spans any run, `?` one character.
pub(crate) fn wildcard_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0usize, 0usize);
    let (mut star, mut mark) = (None, 0usize);
    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some(pi);
            mark = ti;
            pi += 1;
        } else if let Some(s) = star {
            pi = s + 1;
            mark += 1;
            ti = mark;
        } else {
            return false;
        }
    }
    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}
