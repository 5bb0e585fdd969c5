//! TOML front matter.
//!
//! ```text
//! ---
//! title = "Hello"
//! template = "post.html"
//! ---
//! Body starts here.
//! ```
//!
//! The header opens with a `---` line and closes with a `---` or `...`
//! line. Without a closing line the header runs to the end of the file.

use regex::Regex;
use std::sync::LazyLock;

static BEGIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-{3}(\s.*)?$").unwrap());
static END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(-{3}|\.{3})(\s.*)?$").unwrap());

/// Split `text` into `(header, body)` without parsing the header.
///
/// Returns `None` for the header when the first line is not a begin marker.
pub fn split(text: &str) -> (Option<&str>, &str) {
    let Some((first, after_first)) = next_line(text) else {
        return (None, text);
    };
    if !BEGIN.is_match(first.trim_end_matches('\r')) {
        return (None, text);
    }

    let mut cursor = after_first;
    let header_start = text.len() - after_first.len();
    while let Some((line, rest)) = next_line(cursor) {
        if END.is_match(line.trim_end_matches('\r')) {
            let header_end = text.len() - cursor.len();
            return (Some(&text[header_start..header_end]), rest);
        }
        cursor = rest;
    }

    (Some(&text[header_start..]), "")
}

/// Parse the front matter of `text` into a table and return it with the body.
///
/// The error string describes why the header is not valid TOML.
pub fn parse(text: &str) -> Result<(toml::Table, &str), String> {
    match split(text) {
        (None, body) => Ok((toml::Table::new(), body)),
        (Some(header), body) => {
            let table = header
                .parse::<toml::Table>()
                .map_err(|err| err.message().to_owned())?;
            Ok((table, body))
        }
    }
}

/// First line (without its `\n`) and the text after it.
fn next_line(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    Some(match text.split_once('\n') {
        Some((line, rest)) => (line, rest),
        None => (text, ""),
    })
}
