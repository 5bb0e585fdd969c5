//! `[feed]` section configuration.
//!
//! The section is optional; when it is absent no feed is written.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[feed]` section in data.toml.
///
/// # Example
/// ```toml
/// [feed]
/// id = "https://example.com/"
/// rss = "feed.xml"
/// atom = "atom.xml"
/// groups = ["posts"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    /// Feed id, also the base for entry ids. Defaults to `[site].url`.
    #[serde(default)]
    pub id: Option<String>,

    /// Alternate link. Defaults to `[site].url`.
    #[serde(default)]
    pub link: Option<String>,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub logo: Option<String>,

    #[serde(default)]
    pub contributor: Option<String>,

    /// Defaults to `[site].language`.
    #[serde(default)]
    pub language: Option<String>,

    /// Restrict the feed to these groups. Empty means every group.
    #[serde(default)]
    pub groups: Vec<String>,

    /// RSS output path, relative to the output directory.
    #[serde(default)]
    pub rss: Option<PathBuf>,

    /// Atom output path, relative to the output directory.
    #[serde(default)]
    pub atom: Option<PathBuf>,
}
