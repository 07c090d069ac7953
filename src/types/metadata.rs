use serde::{Deserialize, Serialize};

/// Page metadata scraped from a bookmark target's HTML head.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Always absolute; falls back to `/favicon.ico` on the page's origin.
    pub favicon: Option<String>,
    pub image: Option<String>,
}
