//! Browser integration: the live-page collaborator of the pipeline.
//!
//! [`PageSession`] drives a Chrome/Chromium instance over CDP, supplies the
//! DOM-context half of extraction (listener interception + snapshot capture)
//! and offers node-targeted click/type using the current node map.

mod config;
mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use session::PageSession;

/// Add a scheme to bare URLs; known local hosts get `http`.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
        || trimmed.starts_with("file://")
        || trimmed.starts_with("data:")
        || trimmed.starts_with("about:")
        || trimmed.starts_with("chrome://")
    {
        return trimmed.to_string();
    }
    if trimmed.starts_with("localhost") || trimmed.starts_with("127.0.0.1") {
        return format!("http://{}", trimmed);
    }
    format!("https://{}", trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
        assert_eq!(normalize_url("example.com/page"), "https://example.com/page");
        assert_eq!(normalize_url("localhost:8080"), "http://localhost:8080");
        assert_eq!(normalize_url("about:blank"), "about:blank");
        assert_eq!(normalize_url("  example.org  "), "https://example.org");
    }
}
