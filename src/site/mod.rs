//! The assembled site: every group with its pages, a slug index, and the
//! site-wide tag set.
//!
//! Built once per run and read-only afterwards.

pub mod group;

use crate::config::SiteConfig;
use crate::error::BuildError;
use crate::page::{PageLoader, PageRecord};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default)]
pub struct SiteModel {
    groups: BTreeMap<String, Vec<PageRecord>>,
    /// slug → (group, index within group)
    slugs: BTreeMap<String, (String, usize)>,
    tags: BTreeSet<String>,
}

impl SiteModel {
    /// Load every configured group.
    pub fn load(config: &SiteConfig, loader: &PageLoader) -> Result<Self, BuildError> {
        let groups = config
            .groups
            .iter()
            .map(|(name, spec)| Ok((name.clone(), group::expand(spec, loader)?)))
            .collect::<Result<Vec<_>, BuildError>>()?;
        Self::from_groups(groups)
    }

    /// Assemble from loaded groups, attaching group names.
    ///
    /// Fails with `DuplicateSlug` if any two pages share a slug, wherever
    /// they live.
    pub fn from_groups(
        groups: impl IntoIterator<Item = (String, Vec<PageRecord>)>,
    ) -> Result<Self, BuildError> {
        let mut model = Self::default();

        for (name, mut pages) in groups {
            for index in 0..pages.len() {
                let page = &mut pages[index];
                page.group = Some(name.clone());
                let slug = page.slug.clone();

                if let Some((first_group, first_index)) = model.slugs.get(&slug) {
                    let earlier = if *first_group == name {
                        pages.get(*first_index)
                    } else {
                        model.group(first_group).and_then(|g| g.get(*first_index))
                    };
                    return Err(BuildError::DuplicateSlug {
                        slug,
                        first: earlier.map(|p| p.path.clone()).unwrap_or_default(),
                        second: pages[index].path.clone(),
                    });
                }

                model.tags.extend(pages[index].tags.iter().cloned());
                model.slugs.insert(slug, (name.clone(), index));
            }
            model.groups.insert(name, pages);
        }

        Ok(model)
    }

    pub fn group(&self, name: &str) -> Option<&[PageRecord]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Groups in name order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[PageRecord])> {
        self.groups
            .iter()
            .map(|(name, pages)| (name.as_str(), pages.as_slice()))
    }

    /// Every page, groups in name order, pages in group order.
    pub fn pages(&self) -> impl Iterator<Item = &PageRecord> {
        self.groups.values().flatten()
    }

    pub fn page(&self, slug: &str) -> Option<&PageRecord> {
        let (group, index) = self.slugs.get(slug)?;
        self.groups.get(group)?.get(*index)
    }

    pub fn pages_by_slug(&self) -> BTreeMap<&str, &PageRecord> {
        self.slugs
            .keys()
            .filter_map(|slug| Some((slug.as_str(), self.page(slug)?)))
            .collect()
    }

    /// Sorted union of all page tags.
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }
}
