//! Callout blocks (`!!! note "Title"` directives).
//!
//! ```text
//! !!! warning "Mind the gap"
//!     Indented lines form the body and may hold any block content,
//!     including further callouts.
//! ```
//!
//! renders as
//!
//! ```html
//! <div class="message warning">
//! <p class="message-header">Mind the gap</p>
//! <div class="message-body">...</div>
//! </div>
//! ```
//!
//! An indented block directly after a callout continues that callout's
//! body. Lines that lose the indent end the body and are parsed again as
//! ordinary blocks.

use super::fenced::leaves_fence_open;
use super::pipeline::{BlockParser, BlockProcessor};
use super::tree::Element;
use regex::Regex;
use std::{collections::VecDeque, sync::LazyLock};

pub const CONTAINER_CLASS: &str = "message";
pub const HEADER_CLASS: &str = "message-header";
pub const BODY_CLASS: &str = "message-body";

/// Directive line at the start of a block, optionally after one blank line.
static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\n?!!! ?([\w\-]+(?: +[\w\-]+)*)(?: +"(.*?)")? *(?:\n|$)"#).unwrap()
});

static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").unwrap());

pub struct CalloutProcessor {
    tab_length: usize,
}

impl CalloutProcessor {
    pub const PRIORITY: u32 = 105;

    pub fn new(tab_length: usize) -> Self {
        Self { tab_length }
    }

    fn indent(&self) -> String {
        " ".repeat(self.tab_length)
    }

    /// Strip one indent unit from each line.
    ///
    /// Returns the body and whatever follows the first line that is neither
    /// indented nor blank.
    fn detab(&self, text: &str) -> (String, String) {
        let indent = self.indent();
        let lines: Vec<&str> = text.split('\n').collect();
        let mut body = Vec::new();

        for line in &lines {
            if let Some(stripped) = line.strip_prefix(indent.as_str()) {
                body.push(stripped);
            } else if line.trim().is_empty() {
                body.push("");
            } else {
                break;
            }
        }

        let rest = lines[body.len()..].join("\n");
        (body.join("\n"), rest)
    }

    /// Detab `text`, then keep pulling indented blocks into the body while a
    /// fence inside it is still open.
    fn detab_body(&self, text: &str, blocks: &mut VecDeque<String>) -> (String, String) {
        let (mut body, mut rest) = self.detab(text);
        let indent = self.indent();

        while rest.is_empty() && leaves_fence_open(&body) {
            if !blocks
                .front()
                .is_some_and(|b| b.trim_start_matches('\n').starts_with(indent.as_str())) {
                break;
            }
            let Some(next) = blocks.pop_front() else {
                break;
            };
            let (more, more_rest) = self.detab(&next);
            body.push_str("\n\n");
            body.push_str(&more);
            rest = more_rest;
        }

        (body, rest)
    }
}

/// `(class, title)` from a directive match.
///
/// The class is lowercased with runs of spaces collapsed. A missing title
/// defaults to the capitalized first word of the class; an explicit empty
/// title suppresses the header.
fn class_and_title(names: &str, title: Option<&str>) -> (String, Option<String>) {
    let class = SPACES.replace_all(&names.to_lowercase(), " ").into_owned();
    let title = match title {
        None => Some(capitalize(class.split(' ').next().unwrap_or_default())),
        Some("") => None,
        Some(title) => Some(title.to_owned()),
    };
    (class, title)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl BlockProcessor for CalloutProcessor {
    fn name(&self) -> &'static str {
        "callout"
    }

    fn priority(&self) -> u32 {
        Self::PRIORITY
    }

    fn test(&self, sibling: Option<&Element>, block: &str) -> bool {
        DIRECTIVE.is_match(block)
            || (block.starts_with(&self.indent())
                && sibling.is_some_and(|s| s.has_class(CONTAINER_CLASS)))
    }

    fn run(
        &self,
        parser: &BlockParser,
        parent: &mut Element,
        blocks: &mut VecDeque<String>,
    ) -> bool {
        let Some(block) = blocks.front() else {
            return false;
        };

        let directive = DIRECTIVE.captures(block).map(|caps| {
            let end = caps.get(0).map_or(0, |m| m.end());
            let (class, title) = class_and_title(&caps[1], caps.get(2).map(|m| m.as_str()));
            (end, class, title)
        });

        // A continuation needs a body to append to
        if directive.is_none()
            && !parent
                .last_element()
                .is_some_and(|s| s.has_class(CONTAINER_CLASS) && s.elements().any(|c| c.has_class(BODY_CLASS)))
        {
            return false;
        }

        let Some(block) = blocks.pop_front() else {
            return false;
        };

        match directive {
            Some((end, class, title)) => {
                let (body, rest) = self.detab_body(&block[end..], blocks);

                let mut container = Element::with_class("div", format!("{CONTAINER_CLASS} {class}"));
                if let Some(title) = title {
                    let mut header = Element::with_class("p", HEADER_CLASS);
                    header.push_text(title);
                    container.push_element(header);
                }
                let mut content = Element::with_class("div", BODY_CLASS);
                parser.parse_chunk(&mut content, &body);
                container.push_element(content);
                parent.push_element(container);

                requeue(blocks, rest);
            }
            None => {
                let (body, rest) = self.detab_body(&block, blocks);
                if let Some(content) = parent
                    .last_element_mut()
                    .and_then(|s| s.child_with_class_mut(BODY_CLASS))
                {
                    parser.parse_chunk(content, &body);
                }
                requeue(blocks, rest);
            }
        }

        true
    }
}

fn requeue(blocks: &mut VecDeque<String>, rest: String) {
    if !rest.trim().is_empty() {
        blocks.push_front(rest);
    }
}
