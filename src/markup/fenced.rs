//! Fenced code blocks.
//!
//! A fence may contain blank lines, so it spans several pipeline blocks.
//! This processor runs ahead of callouts and pulls in blocks until the
//! closing fence, keeping `!!!` lines inside code untouched.

use super::cmark::render_commonmark;
use super::pipeline::{BlockParser, BlockProcessor};
use super::tree::Element;
use regex::Regex;
use std::{collections::VecDeque, sync::LazyLock};

static OPENING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})([^\n]*)").unwrap());

pub struct FencedCodeProcessor;

impl FencedCodeProcessor {
    pub const PRIORITY: u32 = 110;
}

/// Fence characters and length of the opening line, if `block` opens one.
fn opening_fence(block: &str) -> Option<(char, usize)> {
    let caps = OPENING.captures(block.trim_start_matches('\n'))?;
    let fence = &caps[1];
    let info = &caps[2];
    let ch = fence.chars().next()?;
    if ch == '`' && info.contains('`') {
        return None;
    }
    Some((ch, fence.len()))
}

fn is_closing(line: &str, ch: char, len: usize) -> bool {
    let indent = line.len() - line.trim_start_matches(' ').len();
    let line = line.trim();
    indent <= 3 && line.len() >= len && line.chars().all(|c| c == ch)
}

/// Whether `text` ends inside a fence that was opened but never closed.
pub fn leaves_fence_open(text: &str) -> bool {
    let mut open = None;
    for line in text.split('\n') {
        open = match open {
            Some((ch, len)) if is_closing(line, ch, len) => None,
            Some(fence) => Some(fence),
            None => opening_fence(line),
        };
    }
    open.is_some()
}

/// Byte offset just past the closing fence line, searched after the
/// opening line.
fn closing_end(text: &str, ch: char, len: usize) -> Option<usize> {
    let start = text.len() - text.trim_start_matches('\n').len();
    let mut offset = start;
    for (index, line) in text[start..].split('\n').enumerate() {
        let end = offset + line.len();
        if index > 0 && is_closing(line, ch, len) {
            return Some(end);
        }
        offset = end + 1;
    }
    None
}

impl BlockProcessor for FencedCodeProcessor {
    fn name(&self) -> &'static str {
        "fenced"
    }

    fn priority(&self) -> u32 {
        Self::PRIORITY
    }

    fn test(&self, _sibling: Option<&Element>, block: &str) -> bool {
        opening_fence(block).is_some()
    }

    fn run(&self, _parser: &BlockParser, parent: &mut Element, blocks: &mut VecDeque<String>) -> bool {
        let Some((ch, len)) = blocks.front().and_then(|b| opening_fence(b)) else {
            return false;
        };
        let Some(mut text) = blocks.pop_front() else {
            return false;
        };

        // Unclosed fences run to the end of the chunk
        let end = loop {
            if let Some(end) = closing_end(&text, ch, len) {
                break end;
            }
            match blocks.pop_front() {
                Some(next) => {
                    text.push_str("\n\n");
                    text.push_str(&next);
                }
                None => break text.len(),
            }
        };

        let rest = text[end..].trim_start_matches('\n').to_owned();
        text.truncate(end);
        parent.push_raw(render_commonmark(&text));

        if !rest.trim().is_empty() {
            blocks.push_front(rest);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Markdown;

    #[test]
    fn test_opening_fence() {
        assert_eq!(opening_fence("```rust\nfn main() {}"), Some(('`', 3)));
        assert_eq!(opening_fence("~~~~\nx"), Some(('~', 4)));
        assert_eq!(opening_fence("``` a`b"), None);
        assert_eq!(opening_fence("    ```"), None);
        assert_eq!(opening_fence("text"), None);
    }

    #[test]
    fn test_leaves_fence_open() {
        assert!(leaves_fence_open("```\na"));
        assert!(leaves_fence_open("text\n~~~~\n~~~"));
        assert!(!leaves_fence_open("```\na\n```"));
        assert!(!leaves_fence_open("```\na\n```\n~~~\nb\n~~~"));
        assert!(!leaves_fence_open("plain text"));
    }

    #[test]
    fn test_closing_end() {
        let text = "```\na\n```\nafter";
        assert_eq!(closing_end(text, '`', 3), Some(9));
        assert_eq!(closing_end("````\na\n```", '`', 4), None);
    }

    #[test]
    fn test_fence_spans_blank_lines() {
        let html = Markdown::new(4).convert("```\nfirst\n\n!!! note\n    not a callout\n```");

        assert!(!html.contains("message"));
        assert!(html.contains("<pre><code>first\n\n!!! note\n    not a callout\n</code></pre>"));
    }

    #[test]
    fn test_text_after_closing_fence_is_requeued() {
        let html = Markdown::new(4).convert("~~~\ncode\n~~~\n!!! tip\n    after");

        assert!(html.contains("<pre><code>code\n</code></pre>"));
        assert!(html.contains("class=\"message tip\""));
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let html = Markdown::new(4).convert("```\nopen\n\nstill code");
        assert!(html.contains("open\n\nstill code"));
        assert!(!html.contains("<p>"));
    }
}
