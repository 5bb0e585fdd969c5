//! Syndication feeds.
//!
//! The `[feed]` section selects pages (optionally by group) and names the
//! RSS and/or Atom files to write. Both formats are produced from the same
//! [`Feed`] projection.

mod atom;
mod rss;

use crate::config::{FeedConfig, SiteConfig};
use crate::error::BuildError;
use crate::log;
use crate::site::SiteModel;
use crate::utils::{
    date::DateTimeUtc,
    minify::{MinifyType, minify},
    slug::join_url,
};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Feed-level data shared by both output formats.
#[derive(Debug)]
pub struct Feed<'a> {
    pub id: String,
    pub title: &'a str,
    pub subtitle: Option<&'a str>,
    pub description: &'a str,
    /// Alternate (HTML) link of the whole feed
    pub link: Option<String>,
    pub icon: Option<&'a str>,
    pub logo: Option<&'a str>,
    pub author: Option<&'a str>,
    pub contributor: Option<&'a str>,
    pub rights: Option<&'a str>,
    pub language: &'a str,
    /// Latest page date, the build time when nothing is dated
    pub updated: DateTimeUtc,
    pub entries: Vec<FeedEntry<'a>>,
}

#[derive(Debug)]
pub struct FeedEntry<'a> {
    pub id: String,
    pub title: &'a str,
    pub link: Option<String>,
    pub updated: DateTimeUtc,
    pub published: Option<DateTimeUtc>,
    pub author: Option<&'a str>,
    pub rights: Option<&'a str>,
    pub summary: Option<&'a str>,
    pub contributor: Option<&'a str>,
    pub content: &'a str,
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

impl<'a> Feed<'a> {
    /// Project the site's pages into a feed.
    ///
    /// Entries follow site order: groups by name, pages in group order.
    pub fn project(
        config: &'a SiteConfig,
        feed: &'a FeedConfig,
        site: &'a SiteModel,
    ) -> Result<Self, BuildError> {
        let site_meta = &config.site;
        let id = feed
            .id
            .clone()
            .or_else(|| site_meta.url.clone())
            .ok_or_else(|| BuildError::Feed("set `[feed].id` or `[site].url`".into()))?;
        let base_url = site_meta.url.as_deref().or(feed.link.as_deref());

        let pages: Vec<_> = site
            .pages()
            .filter(|page| {
                feed.groups.is_empty()
                    || page.group.as_ref().is_some_and(|g| feed.groups.contains(g))
            })
            .collect();

        let updated = pages
            .iter()
            .filter_map(|page| page.date)
            .max()
            .unwrap_or_else(DateTimeUtc::now);

        let entries = pages
            .into_iter()
            .map(|page| FeedEntry {
                id: page
                    .feed_id
                    .clone()
                    .unwrap_or_else(|| join_url(&id, &page.url)),
                title: &page.title,
                link: base_url.map(|base| join_url(base, &page.url)),
                updated: page.updated.or(page.date).unwrap_or(updated),
                published: page.date,
                author: page.author.as_deref().or(non_empty(&site_meta.author)),
                rights: page.rights.as_deref().or(non_empty(&site_meta.rights)),
                summary: page.summary.as_deref(),
                contributor: page.contributor.as_deref(),
                content: &page.content,
            })
            .collect();

        Ok(Self {
            id,
            title: &site_meta.title,
            subtitle: non_empty(&site_meta.subtitle),
            description: &site_meta.description,
            link: feed.link.clone().or_else(|| site_meta.url.clone()),
            icon: feed.icon.as_deref(),
            logo: feed.logo.as_deref(),
            author: non_empty(&site_meta.author),
            contributor: feed.contributor.as_deref(),
            rights: non_empty(&site_meta.rights),
            language: feed.language.as_deref().unwrap_or(&site_meta.language),
            updated,
            entries,
        })
    }
}

/// Write the configured feeds into `out_dir`. Returns the written paths.
///
/// Does nothing without a `[feed]` section; fails with `NoOutputTarget`
/// when the section names neither an RSS nor an Atom file.
pub fn emit_feeds(
    config: &SiteConfig,
    site: &SiteModel,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, BuildError> {
    let Some(feed_config) = &config.feed else {
        return Ok(Vec::new());
    };
    if feed_config.rss.is_none() && feed_config.atom.is_none() {
        return Err(BuildError::NoOutputTarget);
    }

    let feed = Feed::project(config, feed_config, site)?;
    let mut written = Vec::new();

    if let Some(path) = &feed_config.rss {
        let xml = rss::to_xml(&feed)?;
        written.push(write_feed(out_dir, path, &xml, config.build.minify)?);
    }
    if let Some(path) = &feed_config.atom {
        let xml = atom::to_xml(&feed);
        written.push(write_feed(out_dir, path, &xml, config.build.minify)?);
    }

    Ok(written)
}

fn write_feed(out_dir: &Path, path: &Path, xml: &str, enabled: bool) -> Result<PathBuf, BuildError> {
    let dest = out_dir.join(path);
    let xml = minify(MinifyType::Xml(xml.as_bytes()), enabled);

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|err| BuildError::io(parent, err))?;
    }
    fs::write(&dest, &*xml).map_err(|err| BuildError::io(&dest, err))?;

    log!("feed"; "{}", path.display());
    Ok(dest)
}
