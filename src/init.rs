//! Site initialization module.
//!
//! Writes a small example site: config, templates, a home page, two posts
//! using callouts, and a stylesheet.

use crate::{config::SiteConfig, log};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Example site files, relative to the site root
const SITE_FILES: &[(&str, &str)] = &[
    ("index.md", include_str!("embed/site/index.md")),
    ("posts/hello.md", include_str!("embed/site/posts/hello.md")),
    ("posts/callouts.md", include_str!("embed/site/posts/callouts.md")),
    ("templates/base.html", include_str!("embed/site/templates/base.html")),
    ("templates/page.html", include_str!("embed/site/templates/page.html")),
    ("templates/post.html", include_str!("embed/site/templates/post.html")),
    ("assets/style.css", include_str!("embed/site/assets/style.css")),
];

const DEFAULT_CONFIG: &str = include_str!("embed/site/data.toml");

/// Ignore patterns written next to the config
const GITIGNORE: &str = ".gitignore";

/// Create the example site under `config.root`.
///
/// Refuses to touch a directory that already has a config file or any of
/// the example files.
pub fn new_site(config: &SiteConfig) -> Result<()> {
    let root = config.get_root();

    if config.config_path.exists() {
        bail!(
            "Config `{}` already exists. Try `pagesmith init <SITE_NAME>` instead.",
            config.config_path.display()
        );
    }
    if let Some((existing, _)) = SITE_FILES.iter().find(|(path, _)| root.join(path).exists()) {
        bail!(
            "Path `{}` already exists. Try `pagesmith init <SITE_NAME>` instead.",
            root.join(existing).display()
        );
    }

    for (path, content) in SITE_FILES {
        write_file(&root.join(path), content)?;
    }
    write_file(&config.config_path, DEFAULT_CONFIG)?;
    init_ignored_files(root, &config.build.output)?;

    log!("init"; "created site at {}", root.display());
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Ignore the output directory unless a `.gitignore` already exists.
fn init_ignored_files(root: &Path, output: &Path) -> Result<()> {
    let path = root.join(GITIGNORE);
    if path.exists() {
        return Ok(());
    }

    let output = output.strip_prefix(root).unwrap_or(output);
    let content = format!("/{}/\n", output.display());
    write_file(&path, &content)
}
