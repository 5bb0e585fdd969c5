//! Site building orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── load phase (nothing written)
//!     │       ├── SiteModel::load()       front matter, markup, groups, slugs
//!     │       ├── Renderer::load()        templates, check every page's template
//!     │       └── check_output_claims()   one source per output path
//!     │
//!     ├── write phase, into `.<output>.staging`
//!     │       ├── copy_assets()
//!     │       ├── Renderer::render_site()
//!     │       └── emit_feeds()
//!     │
//!     └── swap: staging replaces the output directory
//! ```
//!
//! Any error before the swap removes the staging directory and leaves the
//! previous output untouched.

use crate::{
    config::SiteConfig,
    error::BuildError,
    generator::emit_feeds,
    log,
    markup::Markdown,
    page::PageLoader,
    render::Renderer,
    site::SiteModel,
    utils::walk::collect_sources,
};
use anyhow::{Context, Result, bail};
use std::{
    collections::{HashMap, hash_map::Entry},
    fs,
    path::{Path, PathBuf},
};

/// Build the entire site. Returns the written files under the output
/// directory.
pub fn build_site(config: &SiteConfig) -> Result<Vec<PathBuf>> {
    config.check_output_dir()?;

    let markdown = Markdown::new(config.build.tab_length);
    let loader = PageLoader::new(&markdown, &config.root, &config.build.extension);

    let site = SiteModel::load(config, &loader)?;
    if site.is_empty() {
        log!("build"; "no pages found, check `[groups]`");
    } else {
        log!("build"; "loaded {} pages in {} groups", site.len(), config.groups.len());
    }

    let renderer = Renderer::load(config)?;
    renderer.check_templates(&site)?;
    log!("build"; "registered {} templates", renderer.template_count());
    check_output_claims(config, &site)?;

    let output = config.resolve(&config.build.output);
    let staging = staging_dir(&output)?;
    if staging.exists() {
        fs::remove_dir_all(&staging)
            .with_context(|| format!("Failed to remove stale {}", staging.display()))?;
    }
    fs::create_dir_all(&staging).map_err(|err| BuildError::io(&staging, err))?;

    let written = match write_site(config, &site, &renderer, &staging) {
        Ok(written) => written,
        Err(err) => {
            let _ = fs::remove_dir_all(&staging);
            return Err(err.into());
        }
    };

    swap(&staging, &output)?;
    log!("build"; "wrote {} files to {}", written.len(), output.display());

    Ok(written
        .into_iter()
        .map(|path| match path.strip_prefix(&staging) {
            Ok(relative) => output.join(relative),
            Err(_) => path,
        })
        .collect())
}

/// Pages, assets and feeds share one output directory; fail before writing
/// if two of them would land on the same path.
fn check_output_claims(config: &SiteConfig, site: &SiteModel) -> Result<(), BuildError> {
    let mut claims: HashMap<PathBuf, String> = HashMap::new();
    let mut claim = |dest: PathBuf, source: String| match claims.entry(dest) {
        Entry::Occupied(entry) if *entry.get() != source => Err(BuildError::OutputCollision {
            path: entry.key().clone(),
            first: entry.get().clone(),
            second: source,
        }),
        Entry::Occupied(_) => Ok(()),
        Entry::Vacant(entry) => {
            entry.insert(source);
            Ok(())
        }
    };

    for page in site.pages() {
        claim(
            PathBuf::from(&page.url),
            format!("page `{}`", page.path.display()),
        )?;
    }

    let assets = &config.assets;
    for relative in collect_sources(&config.root, &assets.files, &assets.directories)? {
        let source = format!("asset `{}`", relative.display());
        claim(relative, source)?;
    }

    if let Some(feed) = &config.feed {
        let targets = [("rss", &feed.rss), ("atom", &feed.atom)];
        for (key, path) in targets {
            if let Some(path) = path {
                claim(path.clone(), format!("`[feed].{key}`"))?;
            }
        }
    }

    Ok(())
}

/// Everything the build writes, in order: assets, pages, feeds.
fn write_site(
    config: &SiteConfig,
    site: &SiteModel,
    renderer: &Renderer,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, BuildError> {
    let mut written = copy_assets(config, out_dir)?;

    let pages = renderer.render_site(config, site, out_dir)?;
    log!("build"; "rendered {} pages", pages.len());
    written.extend(pages);

    written.extend(emit_feeds(config, site, out_dir)?);
    Ok(written)
}

/// Copy `[assets]` files to the same relative location under `out_dir`.
pub fn copy_assets(config: &SiteConfig, out_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let assets = &config.assets;
    let sources = collect_sources(&config.root, &assets.files, &assets.directories)?;

    let mut written = Vec::with_capacity(sources.len());
    for relative in sources {
        let source = config.resolve(&relative);
        let dest = out_dir.join(&relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|err| BuildError::io(parent, err))?;
        }
        fs::copy(&source, &dest).map_err(|err| BuildError::io(&source, err))?;
        written.push(dest);
    }

    if !written.is_empty() {
        log!("assets"; "copied {} files", written.len());
    }
    Ok(written)
}

/// Sibling of `output` named `.<name>.staging`.
fn staging_dir(output: &Path) -> Result<PathBuf> {
    let Some(name) = output.file_name() else {
        bail!("Output directory `{}` has no name", output.display());
    };
    let mut staging_name = std::ffi::OsString::from(".");
    staging_name.push(name);
    staging_name.push(".staging");
    Ok(output.with_file_name(staging_name))
}

/// Replace `output` with `staging`.
fn swap(staging: &Path, output: &Path) -> Result<()> {
    if output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to remove old output {}", output.display()))?;
    }
    fs::rename(staging, output).with_context(|| {
        format!(
            "Failed to move {} into place at {}",
            staging.display(),
            output.display()
        )
    })
}
