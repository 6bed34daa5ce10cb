//! Page snapshot model.
//!
//! The DOM-context half of the pipeline serializes the live `body` subtree as
//! a JSON document (see `capture.js`); this module is the host-side shape of
//! that document plus the flattened arena every later stage operates on.
//!
//! Snapshots can equally be built by hand (or from a recorded JSON fixture),
//! which is how the pipeline is tested without a browser.

mod arena;

pub use arena::{DomArena, DomChild, DomNode, GroupRole, NodeId};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A captured page: the serialized `body` subtree plus page-level facts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    /// Page URL at capture time; drives compressor-profile selection.
    #[serde(default)]
    pub url: String,

    /// Character count of the raw document HTML, for the compression stats.
    #[serde(default)]
    pub raw_html_chars: usize,

    /// The `body` element.
    pub root: RawNode,
}

/// One serialized element.
///
/// The capture script annotates each element with the probes that only the
/// live page can answer (computed hidden state, bounding-rect size, pointer
/// cursor, recorded click listeners, live form values). Fixtures built in
/// tests set these fields directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNode {
    /// Element tag name (normalized to lowercase on arena construction).
    pub tag: String,

    /// Attributes in document order.
    pub attrs: IndexMap<String, String>,

    /// Interleaved text and element children.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawChild>,

    /// Computed style hides this element (display/visibility/opacity).
    pub css_hidden: bool,

    /// Bounding-rect `[width, height]`; `None` when unknown (static fixture).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect: Option<[f64; 2]>,

    /// Computed cursor is `pointer`, or the element matches a harvested
    /// `:hover { cursor: pointer }` selector.
    pub cursor_pointer: bool,

    /// The element was recorded by the listener interceptor or resolved from
    /// a delegated-handler registry.
    pub click_listener: bool,

    /// Live `value` property for form controls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Live `checked` property for checkboxes and radios.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,

    /// Computed text color for typeable inputs, e.g. `rgb(170, 170, 170)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

/// A child of an element: a text node or a nested element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawChild {
    /// A text node.
    Text {
        /// Raw text content.
        text: String,
    },
    /// A nested element.
    Element(RawNode),
}

impl RawNode {
    /// Create a bare element, builder-style.
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), ..Self::default() }
    }

    /// Builder: set an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Builder: append a text child.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(RawChild::Text { text: text.into() });
        self
    }

    /// Builder: append an element child.
    pub fn with_child(mut self, child: RawNode) -> Self {
        self.children.push(RawChild::Element(child));
        self
    }

    /// Builder: mark as hidden by computed style.
    pub fn css_hidden(mut self) -> Self {
        self.css_hidden = true;
        self
    }

    /// Builder: set the bounding-rect size.
    pub fn with_rect(mut self, width: f64, height: f64) -> Self {
        self.rect = Some([width, height]);
        self
    }

    /// Builder: mark as carrying a recorded click listener.
    pub fn with_click_listener(mut self) -> Self {
        self.click_listener = true;
        self
    }
}

impl PageSnapshot {
    /// Wrap a `body` node into a snapshot with no page-level facts.
    pub fn from_root(root: RawNode) -> Self {
        Self { url: String::new(), raw_html_chars: 0, root }
    }

    /// Parse a snapshot from the JSON string the capture script returns.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| crate::ClawomeError::SnapshotFailed(format!("malformed snapshot: {}", e)))
    }
}

/// Read a property from an inline `style` attribute string.
///
/// Good enough for the `display:none` / `visibility:hidden` / `opacity:0`
/// checks on static fixtures; live captures report computed style directly.
pub(crate) fn style_property<'a>(style: &'a str, property: &str) -> Option<&'a str> {
    for decl in style.split(';') {
        let mut parts = decl.splitn(2, ':');
        let name = parts.next()?.trim();
        if name.eq_ignore_ascii_case(property) {
            return Some(parts.next().unwrap_or("").trim());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let node = RawNode::new("div")
            .with_attr("class", "row")
            .with_text("hello")
            .with_child(RawNode::new("span").with_text("world"));

        assert_eq!(node.tag, "div");
        assert_eq!(node.attrs.get("class").unwrap(), "row");
        assert_eq!(node.children.len(), 2);
    }

    #[test]
    fn test_untagged_child_deserialization() {
        let json = r#"{
            "tag": "p",
            "children": [
                {"text": "before "},
                {"tag": "a", "attrs": {"href": "/x"}, "children": [{"text": "link"}]},
                {"text": " after"}
            ]
        }"#;
        let node: RawNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.children.len(), 3);
        match &node.children[1] {
            RawChild::Element(el) => assert_eq!(el.tag, "a"),
            RawChild::Text { .. } => panic!("expected element"),
        }
        match &node.children[2] {
            RawChild::Text { text } => assert_eq!(text, " after"),
            RawChild::Element(_) => panic!("expected text"),
        }
    }

    #[test]
    fn test_snapshot_from_json() {
        let json = r#"{"url": "https://example.com", "rawHtmlChars": 123,
                       "root": {"tag": "body", "children": [{"text": "hi"}]}}"#;
        let snapshot = PageSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.url, "https://example.com");
        assert_eq!(snapshot.raw_html_chars, 123);
        assert_eq!(snapshot.root.tag, "body");
    }

    #[test]
    fn test_snapshot_rejects_garbage() {
        assert!(PageSnapshot::from_json("not json").is_err());
    }

    #[test]
    fn test_style_property() {
        assert_eq!(style_property("display: none; color: red", "display"), Some("none"));
        assert_eq!(style_property("DISPLAY:none", "display"), Some("none"));
        assert_eq!(style_property("color: red", "display"), None);
        assert_eq!(style_property("", "display"), None);
    }
}
