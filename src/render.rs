//! Page rendering with Tera.
//!
//! Every file under the configured template directories is registered
//! under its path relative to that directory (`post.html`,
//! `partials/nav.html`). Page bodies are already HTML, so autoescaping is
//! off.
//!
//! # Template bindings
//!
//! | Name          | Value                                    |
//! |---------------|------------------------------------------|
//! | `site`        | `[site]` section                         |
//! | `pages`       | slug → page                              |
//! | `groups`      | group name → ordered list of pages       |
//! | `tags`        | sorted list of every tag                 |
//! | `extra`       | `[extra]` section                        |
//! | `currentPage` | the page being rendered                  |

use crate::config::SiteConfig;
use crate::error::BuildError;
use crate::page::PageRecord;
use crate::site::SiteModel;
use crate::utils::{
    minify::{MinifyType, minify},
    value::TomlMap,
    walk::collect_sources,
};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tera::{Context, Tera};

pub struct Renderer {
    tera: Tera,
    minify: bool,
}

impl Renderer {
    /// Register every template of every configured directory.
    ///
    /// A later directory overrides same-named templates of an earlier one.
    pub fn load(config: &SiteConfig) -> Result<Self, BuildError> {
        let mut templates = Vec::new();
        for dir in &config.templates.directories {
            for path in collect_sources(&config.root, &[], std::slice::from_ref(dir))? {
                let name = template_name(path.strip_prefix(dir).unwrap_or(&path));
                let source = config.resolve(&path);
                let content =
                    fs::read_to_string(&source).map_err(|err| BuildError::io(&source, err))?;
                templates.push((name, content));
            }
        }

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(templates)
            .map_err(|source| BuildError::TemplateLoad {
                path: config
                    .templates
                    .directories
                    .first()
                    .cloned()
                    .unwrap_or_default(),
                source,
            })?;

        Ok(Self {
            tera,
            minify: config.build.minify,
        })
    }

    pub fn template_count(&self) -> usize {
        self.tera.get_template_names().count()
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Fail on the first page naming a template that was never registered.
    pub fn check_templates(&self, site: &SiteModel) -> Result<(), BuildError> {
        match site.pages().find(|page| !self.has_template(&page.template)) {
            Some(page) => Err(unknown_template(page)),
            None => Ok(()),
        }
    }

    /// Bindings shared by every page.
    pub fn site_context(config: &SiteConfig, site: &SiteModel) -> Context {
        let groups: BTreeMap<&str, &[PageRecord]> = site.groups().collect();

        let mut context = Context::new();
        context.insert("site", &config.site);
        context.insert("pages", &site.pages_by_slug());
        context.insert("groups", &groups);
        context.insert("tags", site.tags());
        context.insert("extra", &TomlMap(&config.extra));
        context
    }

    pub fn render_page(&self, base: &Context, page: &PageRecord) -> Result<String, BuildError> {
        if !self.has_template(&page.template) {
            return Err(unknown_template(page));
        }

        let mut context = base.clone();
        context.insert("currentPage", page);

        self.tera
            .render(&page.template, &context)
            .map_err(|source| BuildError::TemplateRenderError {
                template: page.template.clone(),
                page: page.path.clone(),
                source,
            })
    }

    /// Render every page into `out_dir`. Returns the written paths.
    ///
    /// Each page is rendered in full before its file is created.
    pub fn render_site(
        &self,
        config: &SiteConfig,
        site: &SiteModel,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, BuildError> {
        let base = Self::site_context(config, site);
        let mut written = Vec::with_capacity(site.len());

        for page in site.pages() {
            let html = self.render_page(&base, page)?;
            let html = minify(MinifyType::Html(html.as_bytes()), self.minify);

            let dest = out_dir.join(&page.url);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|err| BuildError::io(parent, err))?;
            }
            fs::write(&dest, &html).map_err(|err| BuildError::io(&dest, err))?;
            written.push(dest);
        }

        Ok(written)
    }
}

fn unknown_template(page: &PageRecord) -> BuildError {
    BuildError::UnknownTemplate {
        template: page.template.clone(),
        page: page.path.clone(),
    }
}

/// `/`-separated template name for a path relative to its directory.
fn template_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
