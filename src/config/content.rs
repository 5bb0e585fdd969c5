//! Content sources: `[groups.<name>]`, `[assets]` and `[templates]`.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Explicit files plus recursively walked directories, relative to the root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSpec {
    #[serde(default)]
    pub files: Vec<PathBuf>,

    #[serde(default)]
    pub directories: Vec<PathBuf>,
}

/// One `[groups.<name>]` table.
///
/// # Example
/// ```toml
/// [groups.posts]
/// directories = ["posts"]
/// sortByDate = true
/// sortReverse = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    #[serde(default)]
    pub files: Vec<PathBuf>,

    #[serde(default)]
    pub directories: Vec<PathBuf>,

    /// Stable re-sort by page date after collection.
    #[serde(default, alias = "sortByDate")]
    pub sort_by_date: bool,

    /// Newest first when sorting by date.
    #[serde(default, alias = "sortReverse")]
    pub sort_reverse: bool,
}

/// `[templates]` section: directories scanned for template files.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct TemplatesConfig {
    #[serde(default = "defaults::templates::directories")]
    #[educe(Default = defaults::templates::directories())]
    pub directories: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_groups_with_camel_case_aliases() {
        let config = SiteConfig::from_str(
            r#"
            [groups.pages]
            files = ["index.md", "about.md"]

            [groups.posts]
            directories = ["posts"]
            sortByDate = true
            sortReverse = true
        "#,
        )
        .unwrap();

        let pages = &config.groups["pages"];
        assert_eq!(pages.files, vec![PathBuf::from("index.md"), PathBuf::from("about.md")]);
        assert!(!pages.sort_by_date);

        let posts = &config.groups["posts"];
        assert_eq!(posts.directories, vec![PathBuf::from("posts")]);
        assert!(posts.sort_by_date);
        assert!(posts.sort_reverse);
    }

    #[test]
    fn test_groups_snake_case() {
        let config = SiteConfig::from_str(
            r#"
            [groups.notes]
            directories = ["notes"]
            sort_by_date = true
        "#,
        )
        .unwrap();
        assert!(config.groups["notes"].sort_by_date);
        assert!(!config.groups["notes"].sort_reverse);
    }

    #[test]
    fn test_assets_and_templates() {
        let config = SiteConfig::from_str(
            r#"
            [assets]
            files = ["favicon.ico"]
            directories = ["assets"]
        "#,
        )
        .unwrap();

        assert_eq!(config.assets.files, vec![PathBuf::from("favicon.ico")]);
        assert_eq!(config.assets.directories, vec![PathBuf::from("assets")]);
        assert_eq!(config.templates.directories, vec![PathBuf::from("templates")]);
    }

    #[test]
    fn test_group_unknown_field_rejection() {
        let result = SiteConfig::from_str("[groups.posts]\nsort = true");
        assert!(result.is_err());
    }
}
