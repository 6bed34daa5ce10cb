//! Live-page session: the host side of the DOM-context split.
//!
//! Wraps a Chrome/Chromium instance via CDP. The listener interceptor is
//! installed as the first script of every new document; extraction evaluates
//! the capture script, hands the snapshot to the pure pipeline and publishes
//! the node map atomically on success.

use crate::browser::config::{ConnectionOptions, LaunchOptions};
use crate::config::WalkerConfig;
use crate::diff::{diff_interactive, DomDiff};
use crate::error::{ClawomeError, Result};
use crate::node_map::NodeMap;
use crate::pipeline::{self, Extraction, InteractiveNode};
use crate::profiles::ProfileRegistry;
use crate::snapshot::PageSnapshot;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

const LISTENER_PROBE_JS: &str = include_str!("../snapshot/listener_probe.js");
const CAPTURE_JS: &str = include_str!("../snapshot/capture.js");

/// DOM mutation settle window before a capture, in milliseconds.
const SETTLE_MS: u64 = 500;

/// Entries reported per category by the post-action diff.
const DIFF_MAX_ITEMS: usize = 20;

/// A browser page driven for extraction and node-targeted interaction.
pub struct PageSession {
    browser: Browser,
    tab: Arc<Tab>,
    config: WalkerConfig,
    registry: ProfileRegistry,
    node_map: NodeMap,
    last_interactive: Vec<InteractiveNode>,
}

impl PageSession {
    /// Launch a new browser instance.
    pub fn launch(options: LaunchOptions, config: WalkerConfig) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();
        launch_opts.headless = options.headless;
        launch_opts.sandbox = options.sandbox;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);
        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }
        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        let browser = Browser::new(launch_opts).map_err(|e| ClawomeError::LaunchFailed(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| ClawomeError::LaunchFailed(format!("Failed to create tab: {}", e)))?;
        Self::from_parts(browser, tab, config)
    }

    /// Attach to a running browser over its DevTools WebSocket.
    pub fn connect(options: ConnectionOptions, config: WalkerConfig) -> Result<Self> {
        let browser =
            Browser::connect(options.ws_url).map_err(|e| ClawomeError::ConnectionFailed(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| ClawomeError::ConnectionFailed(format!("Failed to create tab: {}", e)))?;
        Self::from_parts(browser, tab, config)
    }

    fn from_parts(browser: Browser, tab: Arc<Tab>, config: WalkerConfig) -> Result<Self> {
        install_listener_probe(&tab)?;
        Ok(Self {
            browser,
            tab,
            config,
            registry: ProfileRegistry::with_defaults(),
            node_map: NodeMap::new(),
            last_interactive: Vec::new(),
        })
    }

    /// The underlying browser.
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// The active tab.
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// The walker configuration.
    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    /// Mutable profile registry, to enable site profiles.
    pub fn registry_mut(&mut self) -> &mut ProfileRegistry {
        &mut self.registry
    }

    /// Navigate to a URL (scheme added when missing) and await the load.
    pub fn navigate(&self, url: &str) -> Result<()> {
        let url = super::normalize_url(url);
        self.tab
            .navigate_to(&url)
            .map_err(|e| ClawomeError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| ClawomeError::NavigationFailed(format!("Navigation timeout: {}", e)))?;
        Ok(())
    }

    /// Wait for DOM mutations to settle (dropdowns, autocomplete, dynamic UI).
    /// Best-effort: a page that never settles just runs out the window.
    pub fn wait_stable(&self) {
        let settle_js = format!(
            r#"new Promise((resolve) => {{
                const settleMs = {};
                let timer = null;
                const observer = new MutationObserver(() => {{
                    clearTimeout(timer);
                    timer = setTimeout(() => {{ observer.disconnect(); resolve(true); }}, settleMs);
                }});
                observer.observe(document.body, {{
                    childList: true, subtree: true, attributes: true, characterData: true
                }});
                timer = setTimeout(() => {{ observer.disconnect(); resolve(true); }}, settleMs);
            }})"#,
            SETTLE_MS
        );
        if let Err(e) = self.tab.evaluate(&settle_js, true) {
            log::debug!("settle wait failed: {}", e);
        }
    }

    /// Capture a snapshot of the current page.
    pub fn snapshot(&self) -> Result<PageSnapshot> {
        let cfg_json = serde_json::to_string(&self.config)
            .map_err(|e| ClawomeError::SnapshotFailed(format!("config serialization: {}", e)))?;
        let script = CAPTURE_JS.replace("__CLAWOME_CONFIG__", &cfg_json);

        let result = self
            .tab
            .evaluate(&script, false)
            .map_err(|e| ClawomeError::SnapshotFailed(e.to_string()))?;
        let value = result
            .value
            .ok_or_else(|| ClawomeError::SnapshotFailed("capture script returned no value".to_string()))?;
        let json = value
            .as_str()
            .ok_or_else(|| ClawomeError::SnapshotFailed("capture script returned a non-string".to_string()))?;
        PageSnapshot::from_json(json)
    }

    /// Extract the current page. On success the session's node map is
    /// replaced atomically; on failure the previous map stays valid.
    pub fn extract(&mut self) -> Result<Extraction> {
        self.wait_stable();
        let snapshot = self.snapshot()?;
        let extraction = pipeline::extract_with_profiles(&snapshot, &self.config, &self.registry)?;
        self.node_map = extraction.node_map.clone();
        self.last_interactive = extraction.interactive.clone();
        Ok(extraction)
    }

    /// Extract and report what changed since the previous extraction.
    pub fn extract_with_diff(&mut self) -> Result<(Extraction, DomDiff)> {
        let before = std::mem::take(&mut self.last_interactive);
        let extraction = self.extract()?;
        let diff = diff_interactive(&before, &extraction.interactive, DIFF_MAX_ITEMS);
        Ok((extraction, diff))
    }

    /// Translate a hierarchical identifier into its selector.
    pub fn resolve(&self, hid: &str) -> Result<&str> {
        self.node_map.resolve(hid)
    }

    /// Click the element behind an identifier.
    pub fn click(&self, hid: &str) -> Result<()> {
        let selector = self.node_map.resolve(hid)?;
        let element = self
            .tab
            .find_element(selector)
            .map_err(|e| ClawomeError::ElementNotFound(format!("{}: {}", selector, e)))?;
        element
            .click()
            .map_err(|e| ClawomeError::TabOperationFailed(format!("click [{}]: {}", hid, e)))?;
        Ok(())
    }

    /// Focus the element behind an identifier and type into it.
    pub fn type_text(&self, hid: &str, text: &str) -> Result<()> {
        let selector = self.node_map.resolve(hid)?;
        let element = self
            .tab
            .find_element(selector)
            .map_err(|e| ClawomeError::ElementNotFound(format!("{}: {}", selector, e)))?;
        element
            .click()
            .map_err(|e| ClawomeError::TabOperationFailed(format!("focus [{}]: {}", hid, e)))?;
        element
            .type_into(text)
            .map_err(|e| ClawomeError::TabOperationFailed(format!("type into [{}]: {}", hid, e)))?;
        Ok(())
    }
}

/// Install the listener interceptor as the first script of every document
/// created in this tab.
fn install_listener_probe(tab: &Arc<Tab>) -> Result<()> {
    tab.call_method(Page::AddScriptToEvaluateOnNewDocument {
        source: LISTENER_PROBE_JS.to_string(),
        world_name: None,
        include_command_line_api: None,
        run_immediately: None,
    })
    .map_err(|e| ClawomeError::TabOperationFailed(format!("interceptor install: {}", e)))?;
    Ok(())
}
