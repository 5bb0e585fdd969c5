//! Build error types.
//!
//! Every variant is fatal: the build stops at the first one and the
//! previous output directory is left as it was.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("malformed front matter in `{path}`: {reason}")]
    MalformedFrontMatter { path: PathBuf, reason: String },

    #[error("`{path}` is missing required metadata `{field}`")]
    MissingRequiredMetadata { path: PathBuf, field: &'static str },

    #[error("slug `{slug}` is used by both `{first}` and `{second}`")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("output `{path}` is claimed by both {first} and {second}")]
    OutputCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("source `{path}` does not exist")]
    SourceNotFound { path: PathBuf },

    #[error("unknown template `{template}` requested by `{page}`")]
    UnknownTemplate { template: String, page: PathBuf },

    #[error("failed to render template `{template}` for `{page}`")]
    TemplateRenderError {
        template: String,
        page: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("failed to load template `{path}`")]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("feed has no output target, set `[feed].rss` or `[feed].atom`")]
    NoOutputTarget,

    #[error("invalid feed: {0}")]
    Feed(String),

    #[error("IO error at `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
