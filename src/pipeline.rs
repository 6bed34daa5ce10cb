//! Pipeline entry points: `extract` and the [`Extraction`] result.
//!
//! The snapshot comes from the DOM context (live capture script or a test
//! fixture); everything from there is pure: prepare, walk, profile-selected
//! compression, render. No partial result escapes a failed extraction.

use crate::config::WalkerConfig;
use crate::node_map::NodeMap;
use crate::prepare;
use crate::profiles::ProfileRegistry;
use crate::render::{self, ExtractStats, RenderOptions};
use crate::snapshot::{DomArena, PageSnapshot};
use crate::walk::{self, Action, WalkerNode};
use crate::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An action-bearing output node, as handed to the action layer and used for
/// before/after diffing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractiveNode {
    pub hid: String,
    pub depth: usize,
    pub tag: String,
    pub label: String,
    pub selector: String,
    pub xpath: String,
    pub actions: Vec<Action>,
    #[serde(default)]
    pub state: IndexMap<String, String>,
}

impl InteractiveNode {
    fn from_record(record: &WalkerNode) -> Self {
        let label = if !record.label.is_empty() {
            record.label.clone()
        } else if !record.form_label.is_empty() {
            record.form_label.clone()
        } else {
            record.text.clone()
        };
        Self {
            hid: record.hid.clone(),
            depth: record.depth,
            tag: record.tag.clone(),
            label,
            selector: record.selector.clone(),
            xpath: record.xpath.clone(),
            actions: record.actions.clone(),
            state: record.state.clone(),
        }
    }
}

/// Result of one extraction.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// The rendered tree (full mode).
    pub tree: String,
    /// hid -> selector/xpath side table.
    pub node_map: NodeMap,
    /// Action-bearing nodes, in tree order.
    pub interactive: Vec<InteractiveNode>,
    /// Compression statistics.
    pub stats: ExtractStats,
    /// The compressed node list, retained so lite mode re-renders the same
    /// walk with identical identifiers.
    nodes: Vec<WalkerNode>,
}

impl Extraction {
    /// The compressed output nodes.
    pub fn nodes(&self) -> &[WalkerNode] {
        &self.nodes
    }

    /// Re-render the same extraction in lite mode. Identifiers, actions and
    /// state are unchanged; only non-interactive text is truncated.
    pub fn render_lite(&self, config: &WalkerConfig) -> String {
        render::render_tree(&self.nodes, &RenderOptions::lite(config))
    }
}

/// Extract a snapshot with the bundled profile registry.
pub fn extract(snapshot: &PageSnapshot, config: &WalkerConfig) -> Result<Extraction> {
    extract_with_profiles(snapshot, config, &ProfileRegistry::with_defaults())
}

/// Extract a snapshot, selecting the compressor profile from the registry by
/// the snapshot URL.
pub fn extract_with_profiles(
    snapshot: &PageSnapshot,
    config: &WalkerConfig,
    registry: &ProfileRegistry,
) -> Result<Extraction> {
    let hints = config.compile();
    let mut arena = DomArena::build(&snapshot.root);
    prepare::prepare(&mut arena, config, &hints);

    let raw_nodes = walk::walk(&arena, config, &hints);
    let nodes_before = raw_nodes.len();

    let profile = registry.match_url(&snapshot.url);
    log::debug!("extract: profile '{}' for '{}'", profile.name(), snapshot.url);
    let nodes = profile.process(raw_nodes, config);

    let tree = render::render_tree(&nodes, &RenderOptions::full());
    let node_map = render::build_node_map(&nodes);
    let interactive = nodes
        .iter()
        .filter(|n| n.is_interactive())
        .map(InteractiveNode::from_record)
        .collect();
    let stats = ExtractStats::compute(snapshot.raw_html_chars, &tree, nodes_before, nodes.len());

    Ok(Extraction { tree, node_map, interactive, stats, nodes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::RawNode;

    fn login_page() -> PageSnapshot {
        let root = RawNode::new("body").with_child(
            RawNode::new("form")
                .with_attr("action", "/login")
                .with_child(RawNode::new("label").with_attr("for", "user").with_text("Username"))
                .with_child(RawNode::new("input").with_attr("id", "user").with_attr("type", "text"))
                .with_child(RawNode::new("button").with_attr("type", "submit").with_text("Sign in")),
        );
        let mut snapshot = PageSnapshot::from_root(root);
        snapshot.url = "https://example.com/login".to_string();
        snapshot.raw_html_chars = 2048;
        snapshot
    }

    #[test]
    fn test_extract_basic() {
        let config = WalkerConfig::default();
        let extraction = extract(&login_page(), &config).unwrap();

        assert!(extraction.tree.contains("form(action=\"/login\")"));
        assert!(extraction.tree.contains("[type]"));
        assert!(extraction.tree.contains("button(type=\"submit\") [click]: Sign in"));
        assert_eq!(extraction.stats.raw_html_chars, 2048);
        assert!(extraction.stats.nodes_after_filter <= extraction.stats.nodes_before_filter);
    }

    #[test]
    fn test_interactive_list() {
        let config = WalkerConfig::default();
        let extraction = extract(&login_page(), &config).unwrap();
        let tags: Vec<&str> = extraction.interactive.iter().map(|n| n.tag.as_str()).collect();
        assert_eq!(tags, vec!["input", "button"]);
        // the unlabeled input borrows its form label
        assert_eq!(extraction.interactive[0].label, "Username");
    }

    #[test]
    fn test_node_map_resolves_every_interactive() {
        let config = WalkerConfig::default();
        let extraction = extract(&login_page(), &config).unwrap();
        for node in &extraction.interactive {
            assert_eq!(extraction.node_map.resolve(&node.hid).unwrap(), node.selector);
        }
    }

    #[test]
    fn test_consecutive_extractions_identical() {
        let config = WalkerConfig::default();
        let snapshot = login_page();
        let a = extract(&snapshot, &config).unwrap();
        let b = extract(&snapshot, &config).unwrap();
        assert_eq!(a.tree, b.tree);
        assert_eq!(a.interactive, b.interactive);
        for (ha, hb) in a.node_map.iter().zip(b.node_map.iter()) {
            assert_eq!(ha, hb);
        }
    }

    #[test]
    fn test_lite_rerender_keeps_ids() {
        let mut config = WalkerConfig::default();
        config.lite_text_max = 10;
        config.lite_text_head = 4;
        let root = RawNode::new("body")
            .with_child(RawNode::new("p").with_text("a very long paragraph of prose that will be cut"))
            .with_child(RawNode::new("button").with_text("Click"));
        let snapshot = PageSnapshot::from_root(root);
        let extraction = extract(&snapshot, &config).unwrap();

        let lite = extraction.render_lite(&config);
        assert!(lite.contains("chars omitted"));
        assert!(lite.contains("button [click]: Click"));
        // same identifiers in both renderings
        for line in extraction.tree.lines() {
            let hid = line.trim_start().split(']').next().unwrap_or("");
            assert!(lite.contains(hid));
        }
    }
}
