//! `[build]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in data.toml - output settings.
///
/// # Example
/// ```toml
/// [build]
/// output = "public"
/// extension = "html"
/// tab_length = 4
/// minify = false
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Output directory, replaced on every build.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Extension of rendered pages (without the dot).
    #[serde(default = "defaults::build::extension")]
    #[educe(Default = defaults::build::extension())]
    pub extension: String,

    /// Indent unit, in spaces, of callout bodies.
    #[serde(default = "defaults::build::tab_length")]
    #[educe(Default = defaults::build::tab_length())]
    pub tab_length: usize,

    /// Minify rendered pages and feeds.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub minify: bool,
}
