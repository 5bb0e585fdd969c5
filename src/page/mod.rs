//! Page loading.
//!
//! A page is one source document: TOML front matter followed by a markup
//! body. [`PageLoader::load`] turns it into an immutable [`PageRecord`].
//!
//! # Front matter keys
//!
//! | Key           | Type            | Notes                                   |
//! |---------------|-----------------|-----------------------------------------|
//! | `template`    | string          | required                                |
//! | `title`       | string          | defaults to the slug                    |
//! | `slug`        | string          | overrides the file stem                 |
//! | `path`        | string          | overrides the output directory          |
//! | `date`        | date / string   | sort key, feed `published`              |
//! | `updated`     | date / string   | feed `updated`                          |
//! | `tags`        | list of strings |                                         |
//! | `description`, `author`, `rights`, `summary`, `contributor`, `feed_id` | string | |
//!
//! Any other key is kept in `extra`.

pub mod frontmatter;

use crate::error::BuildError;
use crate::markup::Markdown;
use crate::utils::{
    date::DateTimeUtc,
    slug::{dir_of, page_url, sanitize_text, slug_from_path},
    value::serialize_toml_map,
};
use serde::Serialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Component, Path, PathBuf},
};

/// One processed document. Only `group` is set after loading.
#[derive(Debug, Clone, Serialize)]
pub struct PageRecord {
    /// Source path relative to the site root
    pub path: PathBuf,
    pub slug: String,
    /// Output path relative to the output directory, `/`-separated
    pub url: String,
    pub title: String,
    pub date: Option<DateTimeUtc>,
    pub updated: Option<DateTimeUtc>,
    pub description: Option<String>,
    pub template: String,
    pub tags: BTreeSet<String>,
    /// Rendered body
    pub content: String,
    pub group: Option<String>,
    pub author: Option<String>,
    pub rights: Option<String>,
    pub summary: Option<String>,
    pub contributor: Option<String>,
    pub feed_id: Option<String>,
    #[serde(serialize_with = "serialize_toml_map")]
    pub extra: BTreeMap<String, toml::Value>,
}

impl PageRecord {
    /// Date used for ordering; undated pages count as the earliest date.
    pub fn sort_date(&self) -> DateTimeUtc {
        self.date.unwrap_or(DateTimeUtc::MIN)
    }
}

pub struct PageLoader<'a> {
    markdown: &'a Markdown,
    root: &'a Path,
    extension: &'a str,
}

impl<'a> PageLoader<'a> {
    pub fn new(markdown: &'a Markdown, root: &'a Path, extension: &'a str) -> Self {
        Self {
            markdown,
            root,
            extension,
        }
    }

    pub fn root(&self) -> &Path {
        self.root
    }

    /// Load the document at `path`, relative to the site root.
    pub fn load(&self, path: &Path) -> Result<PageRecord, BuildError> {
        let full = self.root.join(path);
        if !full.is_file() {
            return Err(BuildError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(&full).map_err(|err| BuildError::io(&full, err))?;
        self.load_str(path, &text)
    }

    /// Build a page from already-read text.
    pub fn load_str(&self, path: &Path, text: &str) -> Result<PageRecord, BuildError> {
        let malformed = |reason: String| BuildError::MalformedFrontMatter {
            path: path.to_path_buf(),
            reason,
        };

        let (mut meta, body) = frontmatter::parse(text).map_err(malformed)?;
        let mut fields = Fields {
            meta: &mut meta,
            path,
        };

        let template = fields
            .string("template")?
            .ok_or_else(|| BuildError::MissingRequiredMetadata {
                path: path.to_path_buf(),
                field: "template",
            })?;

        let slug = match fields.string("slug")? {
            Some(slug) => fields.file_name(&slug)?,
            None => slug_from_path(path),
        };
        let dir = match fields.string("path")? {
            Some(dir) => fields.relative_dir(&dir)?,
            None => dir_of(path),
        };
        let url = page_url(&dir, &slug, self.extension);

        let title = fields.string("title")?.unwrap_or_else(|| slug.clone());
        let date = fields.date("date")?;
        let updated = fields.date("updated")?;
        let tags = fields.tags()?;
        let description = fields.string("description")?;
        let author = fields.string("author")?;
        let rights = fields.string("rights")?;
        let summary = fields.string("summary")?;
        let contributor = fields.string("contributor")?;
        let feed_id = fields.string("feed_id")?;

        let content = self.markdown.convert(body);

        Ok(PageRecord {
            path: path.to_path_buf(),
            slug,
            url,
            title,
            date,
            updated,
            description,
            template,
            tags,
            content,
            group: None,
            author,
            rights,
            summary,
            contributor,
            feed_id,
            extra: meta.into_iter().collect(),
        })
    }
}

/// Removes well-known keys from the front matter table as they are read.
struct Fields<'m> {
    meta: &'m mut toml::Table,
    path: &'m Path,
}

impl Fields<'_> {
    fn malformed(&self, reason: String) -> BuildError {
        BuildError::MalformedFrontMatter {
            path: self.path.to_path_buf(),
            reason,
        }
    }

    fn string(&mut self, key: &str) -> Result<Option<String>, BuildError> {
        match self.meta.remove(key) {
            None => Ok(None),
            Some(toml::Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(self.malformed(format!(
                "`{key}` must be a string, found {}",
                other.type_str()
            ))),
        }
    }

    /// A `slug` override names a single file inside the page directory.
    fn file_name(&self, slug: &str) -> Result<String, BuildError> {
        if slug.contains(['/', '\\']) {
            return Err(self.malformed("`slug` must not contain path separators".into()));
        }
        let slug = sanitize_text(slug);
        if matches!(slug.as_str(), "" | "." | "..") {
            return Err(self.malformed(format!("`slug` `{slug}` is not a file name")));
        }
        Ok(slug)
    }

    /// A `path` override stays below the output directory. Surrounding
    /// slashes are ignored.
    fn relative_dir(&self, dir: &str) -> Result<String, BuildError> {
        let dir = dir.trim_matches('/');
        let escapes = dir.contains('\\')
            || Path::new(dir)
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(self.malformed(format!(
                "`path` `{dir}` must be a relative directory inside the output"
            )));
        }
        Ok(dir.to_owned())
    }

    fn date(&mut self, key: &str) -> Result<Option<DateTimeUtc>, BuildError> {
        let parsed = match self.meta.remove(key) {
            None => return Ok(None),
            Some(toml::Value::Datetime(dt)) => DateTimeUtc::from_toml(&dt),
            Some(toml::Value::String(s)) => DateTimeUtc::parse(&s),
            Some(_) => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| self.malformed(format!("`{key}` is not a valid date")))
    }

    fn tags(&mut self) -> Result<BTreeSet<String>, BuildError> {
        match self.meta.remove("tags") {
            None => Ok(BTreeSet::new()),
            Some(toml::Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    toml::Value::String(tag) => Ok(tag),
                    _ => Err(self.malformed("`tags` must be a list of strings".into())),
                })
                .collect(),
            Some(_) => Err(self.malformed("`tags` must be a list of strings".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(path: &str, text: &str) -> Result<PageRecord, BuildError> {
        let markdown = Markdown::new(4);
        let loader = PageLoader::new(&markdown, Path::new("."), "html");
        loader.load_str(Path::new(path), text)
    }

    #[test]
    fn test_load_derives_slug_and_url() {
        let page = load(
            "posts/first-post.md",
            "---\ntitle = \"A\"\ndate = 2024-01-01\ntemplate = \"post.html\"\n---\n!!! note\n    Tip text",
        )
        .unwrap();

        assert_eq!(page.slug, "first-post");
        assert_eq!(page.url, "posts/first-post.html");
        assert_eq!(page.title, "A");
        assert_eq!(page.template, "post.html");
        assert_eq!(page.date, Some(DateTimeUtc::from_ymd(2024, 1, 1)));
        assert!(page.content.contains("class=\"message note\""));
        assert!(page.content.contains("<p>Tip text</p>"));
        assert!(page.group.is_none());
    }

    #[test]
    fn test_slug_and_path_overrides() {
        let page = load(
            "posts/2024-01-01-x.md",
            "---\ntemplate = \"post.html\"\nslug = \"hello world\"\npath = \"blog\"\n---\n",
        )
        .unwrap();

        assert_eq!(page.slug, "hello_world");
        assert_eq!(page.url, "blog/hello_world.html");
        assert_eq!(page.title, "hello_world");
    }

    #[test]
    fn test_slug_with_separators_is_rejected() {
        for slug in ["../../pwned", "a/b", "..\\\\x", ".."] {
            let text = format!("---\ntemplate = \"p.html\"\nslug = '{slug}'\n---\n");
            match load("posts/a.md", &text).unwrap_err() {
                BuildError::MalformedFrontMatter { reason, .. } => {
                    assert!(reason.contains("`slug`"), "{reason}")
                }
                other => panic!("unexpected error for {slug}: {other}"),
            }
        }
    }

    #[test]
    fn test_path_outside_output_is_rejected() {
        for dir in ["../outside", "blog/../../x", "./blog", "a\\\\b"] {
            let text = format!("---\ntemplate = \"p.html\"\npath = '{dir}'\n---\n");
            match load("posts/a.md", &text).unwrap_err() {
                BuildError::MalformedFrontMatter { reason, .. } => {
                    assert!(reason.contains("`path`"), "{reason}")
                }
                other => panic!("unexpected error for {dir}: {other}"),
            }
        }
    }

    #[test]
    fn test_path_slashes_are_trimmed() {
        let page = load(
            "a.md",
            "---\ntemplate = \"p.html\"\npath = \"/notes/2024/\"\n---\n",
        )
        .unwrap();
        assert_eq!(page.url, "notes/2024/a.html");
    }

    #[test]
    fn test_missing_template() {
        let err = load("index.md", "---\ntitle = \"Home\"\n---\nHello").unwrap_err();
        assert!(matches!(
            err,
            BuildError::MissingRequiredMetadata { field: "template", .. }
        ));
    }

    #[test]
    fn test_no_front_matter_is_missing_template() {
        let err = load("index.md", "Hello").unwrap_err();
        assert!(matches!(err, BuildError::MissingRequiredMetadata { .. }));
    }

    #[test]
    fn test_malformed_front_matter() {
        let err = load("bad.md", "---\ntitle = \n---\n").unwrap_err();
        match err {
            BuildError::MalformedFrontMatter { path, .. } => assert_eq!(path, Path::new("bad.md")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_date_is_malformed() {
        let err = load("a.md", "---\ntemplate = \"p.html\"\ndate = \"soon\"\n---\n").unwrap_err();
        assert!(matches!(err, BuildError::MalformedFrontMatter { .. }));
    }

    #[test]
    fn test_string_dates_and_tags() {
        let page = load(
            "a.md",
            "---\ntemplate = \"p.html\"\ndate = \"2024-03-01\"\nupdated = \"2024-03-02T10:00:00Z\"\ntags = [\"rust\", \"ssg\", \"rust\"]\n---\n",
        )
        .unwrap();

        assert_eq!(page.date, Some(DateTimeUtc::from_ymd(2024, 3, 1)));
        assert_eq!(page.updated, Some(DateTimeUtc::new(2024, 3, 2, 10, 0, 0)));
        assert_eq!(page.tags.iter().collect::<Vec<_>>(), ["rust", "ssg"]);
    }

    #[test]
    fn test_bad_tags() {
        let err = load("a.md", "---\ntemplate = \"p.html\"\ntags = \"rust\"\n---\n").unwrap_err();
        assert!(matches!(err, BuildError::MalformedFrontMatter { .. }));

        let err = load("a.md", "---\ntemplate = \"p.html\"\ntags = [1]\n---\n").unwrap_err();
        assert!(matches!(err, BuildError::MalformedFrontMatter { .. }));
    }

    #[test]
    fn test_unknown_keys_go_to_extra() {
        let page = load(
            "a.md",
            "---\ntemplate = \"p.html\"\nhero = \"img.png\"\nweight = 3\n---\n",
        )
        .unwrap();

        assert_eq!(page.extra.len(), 2);
        assert_eq!(page.extra["hero"].as_str(), Some("img.png"));
        assert!(!page.extra.contains_key("template"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let markdown = Markdown::new(4);
        let loader = PageLoader::new(&markdown, dir.path(), "html");

        let err = loader.load(Path::new("nope.md")).unwrap_err();
        assert!(matches!(err, BuildError::SourceNotFound { .. }));
    }

    #[test]
    fn test_serialized_record() {
        let page = load(
            "a.md",
            "---\ntemplate = \"p.html\"\ndate = 2024-01-01\nreleased = 2023-05-05\n---\n",
        )
        .unwrap();
        let value = tera::to_value(&page).unwrap();

        assert_eq!(value["date"], tera::Value::from("2024-01-01"));
        assert_eq!(value["extra"]["released"], tera::Value::from("2023-05-05"));
        assert_eq!(value["url"], tera::Value::from("a.html"));
    }
}
