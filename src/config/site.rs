//! `[site]` section configuration.
//!
//! Site-wide metadata, exposed to templates as `site` and used as the
//! fallback for feed authorship.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[site]` section in data.toml.
///
/// # Example
/// ```toml
/// [site]
/// title = "Field Notes"
/// author = "Alice"
/// url = "https://notes.example.com"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteMeta {
    #[serde(default = "defaults::site::title")]
    #[educe(Default = defaults::site::title())]
    pub title: String,

    #[serde(default)]
    pub subtitle: String,

    #[serde(default)]
    pub description: String,

    /// Fallback author for feed entries.
    #[serde(default)]
    pub author: String,

    /// Fallback rights notice for feed entries.
    #[serde(default)]
    pub rights: String,

    /// BCP 47 language code.
    #[serde(default = "defaults::site::language")]
    #[educe(Default = defaults::site::language())]
    pub language: String,

    /// Base URL of the deployed site.
    #[serde(default = "defaults::site::url")]
    #[educe(Default = defaults::site::url())]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_site_meta_full() {
        let config = r#"
            [site]
            title = "Field Notes"
            subtitle = "things I learned"
            author = "Alice"
            rights = "CC-BY"
            language = "de"
            url = "https://notes.example.com"
        "#;
        let config = SiteConfig::from_str(config).unwrap();

        assert_eq!(config.site.title, "Field Notes");
        assert_eq!(config.site.subtitle, "things I learned");
        assert_eq!(config.site.author, "Alice");
        assert_eq!(config.site.rights, "CC-BY");
        assert_eq!(config.site.language, "de");
        assert_eq!(config.site.url.as_deref(), Some("https://notes.example.com"));
    }

    #[test]
    fn test_site_meta_defaults() {
        let config = SiteConfig::from_str("[site]").unwrap();

        assert_eq!(config.site.title, "My Site");
        assert_eq!(config.site.language, "en");
        assert_eq!(config.site.url, None);
        assert!(config.site.author.is_empty());
    }

    #[test]
    fn test_unknown_field_rejection() {
        let result = SiteConfig::from_str("[site]\nunknown_field = 1");
        assert!(result.is_err());
    }
}
