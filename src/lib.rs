//! # clawome
//!
//! Clawome sits between a headless browser and a language-model agent: it
//! takes the live rendered DOM of a page (typically hundreds of thousands of
//! tokens of HTML) and emits a compact, hierarchically-numbered textual tree
//! that preserves every visible text line, interactive control and stateful
//! widget while stripping presentational, invisible and redundant structure.
//!
//! Every output node carries a stable identifier (`1`, `1.2`, `3.1.4`) that
//! resolves back to the source element, so the agent can act on what it reads.
//!
//! ## Pipeline
//!
//! 1. **Prepare** — back-reference ids, carousel-clone hiding, icon
//!    classification, switchable-group detection, click-listener discovery,
//!    hover-pointer rule harvest
//! 2. **Walk** — depth-first traversal emitting one annotated record per
//!    surviving element
//! 3. **Compress** — wrapper collapsing, text dedup, popup folding, long-list
//!    truncation, pruning, hierarchical renumbering
//! 4. **Render** — the `[id] tag(attrs) [action] [state]: text` tree plus the
//!    id -> selector node map
//!
//! ## Extracting a live page
//!
//! ```rust,no_run
//! use clawome::{LaunchOptions, PageSession, WalkerConfig};
//!
//! # fn main() -> clawome::Result<()> {
//! let mut session = PageSession::launch(LaunchOptions::default(), WalkerConfig::default())?;
//! session.navigate("https://example.com")?;
//!
//! let extraction = session.extract()?;
//! println!("{}", extraction.tree);
//! println!("{} interactive elements", extraction.interactive.len());
//!
//! // act on what the agent picked
//! session.click("1.2")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Running the pipeline on a snapshot
//!
//! The pipeline itself is pure: everything browser-specific arrives on a
//! [`PageSnapshot`], which can equally be built by hand or loaded from JSON.
//!
//! ```rust
//! use clawome::snapshot::{PageSnapshot, RawNode};
//! use clawome::{extract, WalkerConfig};
//!
//! # fn main() -> clawome::Result<()> {
//! let root = RawNode::new("body")
//!     .with_child(RawNode::new("button").with_text("Search"));
//! let extraction = extract(&PageSnapshot::from_root(root), &WalkerConfig::default())?;
//! assert!(extraction.tree.contains("[1] button [click]: Search"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Module overview
//!
//! - [`config`]: the single configuration record parameterizing every stage
//! - [`snapshot`]: serialized-page model and the capture scripts
//! - [`prepare`]: pre-walk annotation passes
//! - [`walk`]: DOM walker producing flat node records
//! - [`compress`]: tree simplification and renumbering
//! - [`render`]: textual tree serialization and stats
//! - [`profiles`]: per-site compressor profiles with URL matching
//! - [`diff`]: before/after extraction comparison
//! - [`browser`]: Chrome/CDP session supplying live snapshots

pub mod browser;
pub mod compress;
pub mod config;
pub mod diff;
pub mod error;
pub mod node_map;
pub mod pipeline;
pub mod prepare;
pub mod profiles;
pub mod render;
pub mod snapshot;
pub mod walk;

pub use browser::{ConnectionOptions, LaunchOptions, PageSession};
pub use config::WalkerConfig;
pub use diff::{diff_interactive, DomDiff};
pub use error::{ClawomeError, Result};
pub use node_map::{NodeMap, NodeRef};
pub use pipeline::{extract, extract_with_profiles, Extraction, InteractiveNode};
pub use profiles::{Profile, ProfileRegistry};
pub use render::{ExtractStats, RenderOptions};
pub use snapshot::PageSnapshot;
pub use walk::{Action, WalkerNode};
