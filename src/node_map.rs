//! Node map: hierarchical identifier -> back-reference selector.
//!
//! Built during Render, replaced atomically on every re-extraction, consumed
//! by the action layer to translate agent-supplied identifiers into concrete
//! element selectors. Insertion order is preserved so serialized maps read in
//! tree order.

use crate::error::{ClawomeError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Addressing information for one output node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRef {
    /// CSS selector (usually `[data-bid="N"]`).
    pub selector: String,
    /// Structural xpath fallback.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub xpath: String,
}

/// Map of hierarchical identifiers to element references.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeMap {
    map: IndexMap<String, NodeRef>,
}

impl NodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. Synthetic nodes without a selector are not mapped.
    pub fn insert(&mut self, hid: impl Into<String>, selector: impl Into<String>, xpath: impl Into<String>) {
        let selector = selector.into();
        if selector.is_empty() {
            return;
        }
        self.map.insert(hid.into(), NodeRef { selector, xpath: xpath.into() });
    }

    /// Resolve an identifier to its CSS selector.
    pub fn resolve(&self, hid: &str) -> Result<&str> {
        self.map
            .get(hid)
            .map(|r| r.selector.as_str())
            .ok_or_else(|| ClawomeError::NodeNotFound(hid.to_string()))
    }

    /// Resolve an identifier to its xpath fallback.
    pub fn resolve_xpath(&self, hid: &str) -> Result<&str> {
        self.map
            .get(hid)
            .map(|r| r.xpath.as_str())
            .ok_or_else(|| ClawomeError::NodeNotFound(hid.to_string()))
    }

    /// Full reference lookup.
    pub fn get(&self, hid: &str) -> Option<&NodeRef> {
        self.map.get(hid)
    }

    pub fn contains(&self, hid: &str) -> bool {
        self.map.contains_key(hid)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate `(hid, reference)` pairs in tree order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &NodeRef)> {
        self.map.iter()
    }

    /// Export for debugging.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NodeMap {
        let mut map = NodeMap::new();
        map.insert("1", "[data-bid=\"4\"]", "/body/div");
        map.insert("1.1", "[data-bid=\"5\"]", "/body/div/p");
        map.insert("2", "#footer", "/body/footer");
        map
    }

    #[test]
    fn test_resolve() {
        let map = sample();
        assert_eq!(map.resolve("1.1").unwrap(), "[data-bid=\"5\"]");
        assert_eq!(map.resolve_xpath("2").unwrap(), "/body/footer");
    }

    #[test]
    fn test_resolve_missing() {
        let map = sample();
        let err = map.resolve("9.9").unwrap_err();
        assert!(matches!(err, ClawomeError::NodeNotFound(_)));
    }

    #[test]
    fn test_empty_selector_not_registered() {
        let mut map = NodeMap::new();
        map.insert("3", "", "");
        assert!(map.is_empty());
    }

    #[test]
    fn test_iteration_order() {
        let map = sample();
        let hids: Vec<&str> = map.iter().map(|(h, _)| h.as_str()).collect();
        assert_eq!(hids, vec!["1", "1.1", "2"]);
    }

    #[test]
    fn test_serde_round_trip() {
        let map = sample();
        let json = serde_json::to_string(&map).unwrap();
        let back: NodeMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back.resolve("1").unwrap(), "[data-bid=\"4\"]");
        assert_eq!(back.len(), 3);
    }
}
