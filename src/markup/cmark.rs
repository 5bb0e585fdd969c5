//! CommonMark leaf rendering.
//!
//! Anything no other processor claims ends up here. Consecutive unclaimed
//! blocks are joined back together before rendering so that lists, indented
//! code and raw HTML spanning blank lines reach pulldown-cmark intact.

use super::pipeline::{BlockParser, BlockProcessor};
use super::tree::Element;
use pulldown_cmark::{Options, Parser, html::push_html};
use std::collections::VecDeque;

/// Render CommonMark with GFM tables, strikethrough and task lists.
pub fn render_commonmark(text: &str) -> String {
    let options =
        Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS | Options::ENABLE_TABLES;
    let parser = Parser::new_ext(text, options);

    let mut html = String::with_capacity(text.len() * 2);
    push_html(&mut html, parser);
    html
}

pub struct CommonMarkProcessor;

impl CommonMarkProcessor {
    pub const PRIORITY: u32 = 0;
}

impl BlockProcessor for CommonMarkProcessor {
    fn name(&self) -> &'static str {
        "commonmark"
    }

    fn priority(&self) -> u32 {
        Self::PRIORITY
    }

    fn test(&self, _sibling: Option<&Element>, _block: &str) -> bool {
        true
    }

    fn run(&self, parser: &BlockParser, parent: &mut Element, blocks: &mut VecDeque<String>) -> bool {
        let Some(mut text) = blocks.pop_front() else {
            return false;
        };

        // The run is rendered as one raw node, so nothing follows an element
        while let Some(next) = blocks.front() {
            if parser.claimant(None, next) != Some(self.name()) {
                break;
            }
            text.push_str("\n\n");
            text.push_str(next);
            blocks.pop_front();
        }

        parent.push_raw(render_commonmark(&text));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Markdown;

    #[test]
    fn test_render_commonmark_extensions() {
        let html = render_commonmark("~~gone~~\n\n- [x] done\n\n| a |\n|---|\n| 1 |");

        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("checkbox"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_loose_list_stays_one_list() {
        let html = Markdown::new(4).convert("- one\n\n- two\n\n      continued");

        assert_eq!(html.matches("<ul>").count(), 1);
        assert!(html.contains("continued"));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = Markdown::new(4).convert("<div class=\"hero\">\n\n*hi*\n\n</div>");
        assert!(html.contains("<div class=\"hero\">"));
        assert!(html.contains("<em>hi</em>"));
    }
}
