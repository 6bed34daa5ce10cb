//! Pipeline configuration.
//!
//! One [`WalkerConfig`] record parameterizes every stage. The record is
//! serialized as camelCase JSON because it is also handed to the in-page
//! capture script, which reads the same keys.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Configuration for Prepare, Walk, Compress and Render.
///
/// Every field has a default matching the stock behavior; hosts usually start
/// from [`WalkerConfig::default`] and override a handful of knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalkerConfig {
    /// Tags never emitted and never descended into.
    pub skip_tags: Vec<String>,

    /// Tags treated as inline: their text is collected by the nearest
    /// block ancestor unless they carry actions or surfaced attributes.
    pub inline_tags: Vec<String>,

    /// Per-tag attributes surfaced into the output, e.g. `input` ->
    /// `[type, name, placeholder, value]`.
    pub attr_rules: IndexMap<String, Vec<String>>,

    /// Attributes surfaced on every tag.
    pub global_attrs: Vec<String>,

    /// Attributes read into the node state mapping.
    pub state_attrs: Vec<String>,

    /// `<input type=...>` values that accept keyboard input.
    pub typeable_input_types: Vec<String>,

    /// `<input type=...>` values that act as buttons.
    pub clickable_input_types: Vec<String>,

    /// Class prefixes for icon-font discovery (`fa-search` -> `search`).
    pub icon_prefixes: Vec<String>,

    /// Class patterns identifying ligature icon fonts (material icons).
    pub material_classes: Vec<String>,

    /// Keywords searched in ancestor class strings as a last-resort icon name.
    pub semantic_keywords: Vec<String>,

    /// CSS selectors matching carousel/framework clones to hide at prepare time.
    pub clone_selectors: Vec<String>,

    /// Class names stripped before switchable-group bucketing.
    pub state_classes: Vec<String>,

    /// Hard cap on emitted walker records. Walking stops silently when reached.
    pub max_nodes: usize,

    /// Hard cap on traversal depth relative to `body`.
    pub max_depth: usize,

    /// Cap on collected text per node at walk time; 0 disables.
    pub max_text_len: usize,

    /// Minimum per-channel RGB value for the gray-preset-value heuristic.
    pub gray_text_min_rgb: u8,

    /// Maximum pairwise RGB channel difference for the gray heuristic.
    pub gray_text_max_diff: u8,

    /// Maximum width/height (px) for an element to qualify as an icon.
    pub icon_max_size: f64,

    /// Lite mode: non-interactive text longer than this is truncated.
    pub lite_text_max: usize,

    /// Lite mode: characters kept when truncating.
    pub lite_text_head: usize,

    /// Homogeneous child runs longer than this are truncated.
    pub list_max_items: usize,

    /// Children kept at the head of a truncated run.
    pub list_show_head: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            skip_tags: str_vec(&[
                "script", "style", "meta", "link", "noscript", "head", "br", "hr", "iframe",
                "object", "embed", "template", "slot", "col",
            ]),
            inline_tags: str_vec(&[
                "a", "span", "strong", "em", "b", "i", "u", "s", "code", "kbd", "mark", "small",
                "sub", "sup", "abbr", "cite", "time", "label", "font",
            ]),
            attr_rules: default_attr_rules(),
            global_attrs: str_vec(&["id", "role", "aria-label", "title"]),
            state_attrs: str_vec(&[
                "disabled",
                "checked",
                "readonly",
                "required",
                "open",
                "aria-expanded",
                "aria-selected",
                "aria-checked",
                "aria-pressed",
                "aria-current",
                "aria-valuenow",
                "aria-valuemin",
                "aria-valuemax",
            ]),
            typeable_input_types: str_vec(&[
                "text", "search", "email", "password", "url", "tel", "number", "",
            ]),
            clickable_input_types: str_vec(&["submit", "button", "reset", "image"]),
            icon_prefixes: str_vec(&["icon", "fa", "fas", "far", "fab", "glyphicon", "bi", "mdi", "oi"]),
            material_classes: str_vec(&["material-icons", "material-symbols"]),
            semantic_keywords: str_vec(&[
                "search", "close", "menu", "arrow", "play", "pause", "next", "prev", "back",
                "download", "upload", "share", "edit", "delete", "add", "remove", "settings",
                "user", "home", "cart", "heart", "star", "check", "expand", "collapse",
            ]),
            clone_selectors: str_vec(&[
                ".swiper-slide-duplicate",
                ".slick-cloned",
                ".owl-item.cloned",
            ]),
            state_classes: str_vec(&[
                "active", "current", "selected", "show", "shown", "open", "visible", "in", "on",
            ]),
            max_nodes: 20_000,
            max_depth: 50,
            max_text_len: 0,
            gray_text_min_rgb: 140,
            gray_text_max_diff: 25,
            icon_max_size: 64.0,
            lite_text_max: 50,
            lite_text_head: 30,
            list_max_items: 50,
            list_show_head: 10,
        }
    }
}

impl WalkerConfig {
    /// Compile the string-based hints into the matcher set used by the
    /// pipeline. Compiled once per extraction.
    pub fn compile(&self) -> CompiledHints {
        CompiledHints::new(self)
    }
}

fn str_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_attr_rules() -> IndexMap<String, Vec<String>> {
    let mut rules = IndexMap::new();
    let mut put = |tag: &str, attrs: &[&str]| {
        rules.insert(tag.to_string(), str_vec(attrs));
    };
    put("a", &["href"]);
    put("img", &["src", "alt"]);
    put("input", &["type", "name", "placeholder", "value"]);
    put("textarea", &["name", "placeholder"]);
    put("select", &["name"]);
    put("option", &["value"]);
    put("button", &["type"]);
    put("form", &["action", "method"]);
    put("video", &["src"]);
    put("audio", &["src"]);
    put("source", &["src", "type"]);
    put("th", &["colspan", "rowspan"]);
    put("td", &["colspan", "rowspan"]);
    rules
}

/// Matcher set derived from a [`WalkerConfig`].
///
/// Holds the tag sets as hash sets and the icon/material/semantic hints as
/// compiled regexes. A hint whose pattern fails to compile is disabled rather
/// than failing the extraction.
pub struct CompiledHints {
    pub skip_tags: HashSet<String>,
    pub inline_tags: HashSet<String>,
    pub typeable_input_types: HashSet<String>,
    pub clickable_input_types: HashSet<String>,
    pub icon_prefix_re: Option<Regex>,
    pub material_re: Option<Regex>,
    pub semantic_res: Vec<(String, Regex)>,
    pub state_class_re: Option<Regex>,
}

impl CompiledHints {
    fn new(config: &WalkerConfig) -> Self {
        let icon_prefix_re = if config.icon_prefixes.is_empty() {
            None
        } else {
            let pattern = format!("(?:{})-([a-zA-Z][\\w-]*)", config.icon_prefixes.join("|"));
            compile_or_warn(&pattern, "iconPrefixes")
        };

        let material_re = if config.material_classes.is_empty() {
            None
        } else {
            let pattern = config
                .material_classes
                .iter()
                .map(|c| c.replace('-', "[_-]"))
                .collect::<Vec<_>>()
                .join("|");
            compile_or_warn(&pattern, "materialClasses")
        };

        let semantic_res = config
            .semantic_keywords
            .iter()
            .filter_map(|kw| {
                let pattern = format!("(?:^|[\\s_-]){}(?:$|[\\s_-])", kw);
                compile_or_warn(&pattern, "semanticKeywords").map(|re| (kw.clone(), re))
            })
            .collect();

        let state_class_re = if config.state_classes.is_empty() {
            None
        } else {
            let pattern = format!("(?i)\\b(?:{})\\b", config.state_classes.join("|"));
            compile_or_warn(&pattern, "stateClasses")
        };

        Self {
            skip_tags: config.skip_tags.iter().cloned().collect(),
            inline_tags: config.inline_tags.iter().cloned().collect(),
            typeable_input_types: config.typeable_input_types.iter().cloned().collect(),
            clickable_input_types: config.clickable_input_types.iter().cloned().collect(),
            icon_prefix_re,
            material_re,
            semantic_res,
            state_class_re,
        }
    }

    /// True when the tag is never emitted and never descended into.
    pub fn is_skip_tag(&self, tag: &str) -> bool {
        self.skip_tags.contains(tag)
    }

    /// True when the tag participates in inline text collection.
    pub fn is_inline_tag(&self, tag: &str) -> bool {
        self.inline_tags.contains(tag)
    }
}

fn compile_or_warn(pattern: &str, what: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("ignoring unparseable {} pattern: {}", what, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WalkerConfig::default();
        assert!(config.skip_tags.iter().any(|t| t == "script"));
        assert!(config.inline_tags.iter().any(|t| t == "span"));
        assert_eq!(config.max_nodes, 20_000);
        assert_eq!(config.max_depth, 50);
        assert_eq!(config.attr_rules.get("a").unwrap(), &["href"]);
    }

    #[test]
    fn test_compile_icon_prefix() {
        let hints = WalkerConfig::default().compile();
        let re = hints.icon_prefix_re.as_ref().unwrap();
        let caps = re.captures("btn fa-search large").unwrap();
        assert_eq!(&caps[1], "search");
        assert!(re.captures("plain-class").is_none());
    }

    #[test]
    fn test_compile_semantic_word_boundaries() {
        let hints = WalkerConfig::default().compile();
        let (_, re) = hints
            .semantic_res
            .iter()
            .find(|(kw, _)| kw == "close")
            .unwrap();
        assert!(re.is_match("modal-close-btn"));
        assert!(re.is_match("close"));
        assert!(!re.is_match("disclosure"));
    }

    #[test]
    fn test_state_class_re() {
        let hints = WalkerConfig::default().compile();
        let re = hints.state_class_re.as_ref().unwrap();
        assert!(re.is_match("tab-pane Active"));
        assert!(!re.is_match("tab-pane inactive-ish"));
    }

    #[test]
    fn test_serde_camel_case() {
        let config = WalkerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"skipTags\""));
        assert!(json.contains("\"grayTextMinRgb\""));

        let parsed: WalkerConfig = serde_json::from_str("{\"maxNodes\": 5}").unwrap();
        assert_eq!(parsed.max_nodes, 5);
        assert_eq!(parsed.max_depth, 50);
    }

    #[test]
    fn test_bad_pattern_disables_hint() {
        let mut config = WalkerConfig::default();
        config.icon_prefixes = vec!["(((".to_string()];
        let hints = config.compile();
        assert!(hints.icon_prefix_re.is_none());
    }
}
