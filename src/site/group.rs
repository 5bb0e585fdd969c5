//! Expansion of `[groups.<name>]` into ordered page lists.

use crate::config::GroupConfig;
use crate::error::BuildError;
use crate::page::{PageLoader, PageRecord};
use crate::utils::walk::collect_sources;

/// Load every page of a group in final order.
///
/// Pages come in source order (files, then directory walks) and, with
/// `sort_by_date`, are stably re-sorted by date. Equal dates keep source
/// order in both directions.
pub fn expand(spec: &GroupConfig, loader: &PageLoader) -> Result<Vec<PageRecord>, BuildError> {
    let sources = collect_sources(loader.root(), &spec.files, &spec.directories)?;

    let mut pages = sources
        .iter()
        .map(|path| loader.load(path))
        .collect::<Result<Vec<_>, _>>()?;

    if spec.sort_by_date {
        sort_by_date(&mut pages, spec.sort_reverse);
    }
    Ok(pages)
}

/// Stable sort on `date`, missing dates counting as the earliest.
pub fn sort_by_date(pages: &mut [PageRecord], reverse: bool) {
    if reverse {
        pages.sort_by(|a, b| b.sort_date().cmp(&a.sort_date()));
    } else {
        pages.sort_by_key(PageRecord::sort_date);
    }
}
