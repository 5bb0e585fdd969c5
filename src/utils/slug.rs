//! Slug and URL helpers.
//!
//! Page slugs come from file stems, page URLs are slash-separated and
//! relative to the output directory.

use std::path::Path;

/// Characters forbidden in file paths and fragments
const FORBIDDEN_CHARS: &[char] = &[
    '<', '>', ':', '|', '?', '*', '#', '\\', '(', ')', '[', ']', '\t', '\r', '\n',
];

/// Remove forbidden characters and replace whitespace with underscores
pub fn sanitize_text(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Derive a slug from the file stem: `posts/Hello World.md` → `Hello_World`.
pub fn slug_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| sanitize_text(&stem.to_string_lossy()))
        .unwrap_or_default()
}

/// Sanitized, `/`-joined directory part of a relative path.
///
/// `posts/2024/hello.md` → `posts/2024`, `index.md` → ``.
pub fn dir_of(path: &Path) -> String {
    path.parent()
        .map(|parent| {
            parent
                .components()
                .map(|c| sanitize_text(&c.as_os_str().to_string_lossy()))
                .filter(|c| !c.is_empty())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}

/// Build a page URL from its directory, slug and output extension.
///
/// ```ignore
/// page_url("posts", "hello", "html") // → "posts/hello.html"
/// page_url("", "index", "html")      // → "index.html"
/// ```
pub fn page_url(dir: &str, slug: &str, extension: &str) -> String {
    let file = if extension.is_empty() {
        slug.to_owned()
    } else {
        format!("{slug}.{extension}")
    };
    let dir = dir.trim_matches('/');
    if dir.is_empty() {
        file
    } else {
        format!("{dir}/{file}")
    }
}

/// Join two URL parts with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_text_removes_forbidden_chars() {
        assert_eq!(sanitize_text("a<b>c:d|e?f*g#h\\i(j)k[l]m"), "abcdefghijklm");
    }

    #[test]
    fn test_sanitize_text_replaces_whitespace() {
        assert_eq!(sanitize_text("  Hello World  "), "Hello_World");
    }

    #[test]
    fn test_sanitize_text_preserves_unicode() {
        assert_eq!(sanitize_text("你好世界"), "你好世界");
    }

    #[test]
    fn test_slug_from_path() {
        assert_eq!(slug_from_path(Path::new("posts/first-post.md")), "first-post");
        assert_eq!(slug_from_path(Path::new("My Notes.md")), "My_Notes");
        assert_eq!(slug_from_path(Path::new("archive.tar.md")), "archive.tar");
    }

    #[test]
    fn test_dir_of() {
        assert_eq!(dir_of(Path::new("posts/2024/hello.md")), "posts/2024");
        assert_eq!(dir_of(Path::new("index.md")), "");
        assert_eq!(dir_of(Path::new("my posts/a.md")), "my_posts");
    }

    #[test]
    fn test_page_url() {
        assert_eq!(page_url("posts", "hello", "html"), "posts/hello.html");
        assert_eq!(page_url("", "index", "html"), "index.html");
        assert_eq!(page_url("/blog/", "a", "htm"), "blog/a.htm");
        assert_eq!(page_url("", "raw", ""), "raw");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://a.com/", "/x.html"), "https://a.com/x.html");
        assert_eq!(join_url("https://a.com", "x.html"), "https://a.com/x.html");
        assert_eq!(join_url("tag:a.com,2024:", "x"), "tag:a.com,2024:/x");
    }
}
