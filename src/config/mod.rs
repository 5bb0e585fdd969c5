//! Site configuration management for `data.toml`.
//!
//! # Sections
//!
//! | Section             | Purpose                                         |
//! |---------------------|-------------------------------------------------|
//! | `[site]`            | Site metadata (title, author, url)              |
//! | `[build]`           | Output directory, page extension, indent unit   |
//! | `[templates]`       | Template directories                            |
//! | `[groups.<name>]`   | Page groups and their sort policy               |
//! | `[assets]`          | Files copied verbatim                           |
//! | `[feed]`            | Optional RSS/Atom feed                          |
//! | `[serve]`           | Development server (interface, port)            |
//! | `[extra]`           | User-defined custom fields                      |
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "My Blog"
//! url = "https://example.com"
//!
//! [groups.posts]
//! directories = ["posts"]
//! sortByDate = true
//! sortReverse = true
//!
//! [feed]
//! atom = "atom.xml"
//! ```

mod build;
mod content;
pub mod defaults;
mod error;
mod feed;
mod serve;
mod site;

pub use build::BuildConfig;
pub use content::{GroupConfig, SourceSpec, TemplatesConfig};
pub use feed::FeedConfig;
pub use serve::ServeConfig;
pub use site::SiteMeta;

use error::ConfigError;

use crate::cli::{BuildArgs, Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Component, Path, PathBuf},
};

/// Default config file name, relative to the site root.
pub const CONFIG_FILE: &str = "data.toml";

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing data.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute site root (set after loading)
    #[serde(skip)]
    #[educe(Default = PathBuf::from("./"))]
    pub root: PathBuf,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub site: SiteMeta,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub templates: TemplatesConfig,

    /// Page groups, iterated in name order
    #[serde(default)]
    pub groups: BTreeMap<String, GroupConfig>,

    #[serde(default)]
    pub assets: SourceSpec,

    #[serde(default)]
    pub feed: Option<FeedConfig>,

    #[serde(default)]
    pub serve: ServeConfig,

    /// User-defined extra fields
    #[serde(default)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Resolve a configured source path against the site root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let base = Self::normalize_path(cli.root.as_deref().unwrap_or(Path::new("./")));
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => Self::normalize_path(&base.join(name)),
            _ => base,
        };

        self.config_path = Self::normalize_path(&root.join(&cli.config));
        self.root = root;

        match &cli.command {
            Commands::Build { build_args } => self.apply_build_args(build_args),
            Commands::Serve {
                build_args,
                interface,
                port,
            } => {
                self.apply_build_args(build_args);
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
            }
            Commands::Init { .. } => {}
        }

        self.build.output = Self::normalize_path(&self.root.join(&self.build.output));
    }

    fn apply_build_args(&mut self, args: &BuildArgs) {
        Self::update_option(&mut self.build.output, args.output.as_ref());
        Self::update_option(&mut self.build.minify, args.minify.as_ref());
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// The output directory is replaced wholesale on every build, so it must
    /// not be the site root or one of its ancestors.
    pub fn check_output_dir(&self) -> Result<()> {
        let root = lexical_normalize(&self.root);
        let output = lexical_normalize(&self.resolve(&self.build.output));
        if root.starts_with(&output) {
            bail!(ConfigError::Validation(format!(
                "[build.output] `{}` must not contain the site root",
                self.build.output.display()
            )));
        }
        Ok(())
    }

    /// Validate configuration values that serde cannot check
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.site.url
            && !url.starts_with("http")
        {
            bail!(ConfigError::Validation(
                "[site.url] must start with http:// or https://".into()
            ));
        }

        if self.build.tab_length == 0 {
            bail!(ConfigError::Validation(
                "[build.tab_length] must be greater than 0".into()
            ));
        }

        if self.build.extension.starts_with('.') {
            bail!(ConfigError::Validation(
                "[build.extension] must not start with a dot".into()
            ));
        }

        self.check_output_dir()?;

        if let Some(feed) = &self.feed
            && let Some(unknown) = feed.groups.iter().find(|g| !self.groups.contains_key(*g))
        {
            bail!(ConfigError::Validation(format!(
                "[feed.groups] names unknown group `{unknown}`"
            )));
        }

        Ok(())
    }
}

/// Resolve `.` and `..` without touching the filesystem.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SiteConfig::from_str("").unwrap();

        assert!(config.groups.is_empty());
        assert!(config.assets.files.is_empty());
        assert!(config.feed.is_none());
        assert!(config.extra.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_section_rejection() {
        assert!(SiteConfig::from_str("[deploy]\nforce = true").is_err());
    }

    #[test]
    fn test_extra_fields() {
        let config = SiteConfig::from_str(
            r#"
            [extra]
            analytics_id = "UA-12345"
            nav = ["home", "posts"]
        "#,
        )
        .unwrap();

        assert_eq!(
            config.extra["analytics_id"].as_str(),
            Some("UA-12345")
        );
        assert_eq!(config.extra["nav"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_validate_site_url() {
        let config = SiteConfig::from_str("[site]\nurl = \"example.com\"").unwrap();
        assert!(config.validate().is_err());

        let config = SiteConfig::from_str("[site]\nurl = \"https://example.com\"").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_output_must_not_contain_root() {
        for output in [".", "", "..", "sub/..", "/"] {
            let mut config =
                SiteConfig::from_str(&format!("[build]\noutput = \"{output}\"")).unwrap();
            config.root = PathBuf::from("/srv/site");

            let err = config.validate().unwrap_err();
            assert!(
                matches!(err.downcast_ref::<ConfigError>(), Some(ConfigError::Validation(_))),
                "{output}: {err}"
            );
        }

        let mut config = SiteConfig::from_str("[build]\noutput = \"../site-public\"").unwrap();
        config.root = PathBuf::from("/srv/site");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_tab_length() {
        let config = SiteConfig::from_str("[build]\ntab_length = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_feed_groups() {
        let config = SiteConfig::from_str(
            r#"
            [groups.posts]
            directories = ["posts"]

            [feed]
            atom = "atom.xml"
            groups = ["news"]
        "#,
        )
        .unwrap();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("news"));
    }

    #[test]
    fn test_update_with_cli_overrides() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap();
        let cli = Cli::parse_from([
            "pagesmith", "--root", root, "serve", "--output", "dist", "--port", "9000",
        ]);

        let mut config = SiteConfig::from_str("[serve]\nport = 8001").unwrap();
        config.update_with_cli(&cli);

        let root = dir.path().canonicalize().unwrap();
        assert_eq!(config.root, root);
        assert_eq!(config.config_path, root.join(CONFIG_FILE));
        assert_eq!(config.build.output, root.join("dist"));
        assert_eq!(config.serve.port, 9000);
    }

    #[test]
    fn test_update_with_cli_init_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap();
        let cli = Cli::parse_from(["pagesmith", "--root", root, "init", "blog"]);

        let mut config = SiteConfig::default();
        config.update_with_cli(&cli);

        let root = dir.path().canonicalize().unwrap();
        assert_eq!(config.root, root.join("blog"));
        assert_eq!(config.build.output, root.join("blog").join("public"));
    }
}
