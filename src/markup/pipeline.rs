//! Block-level parsing pipeline.
//!
//! Text is split into blocks on blank lines. Each block is offered to the
//! registered processors in descending priority order; the first processor
//! whose [`BlockProcessor::test`] passes and whose [`BlockProcessor::run`]
//! does not decline consumes it.
//!
//! Processors receive the parser itself in `run`, so a processor that
//! holds nested content (a callout body) can feed it back through the
//! whole pipeline.

use super::tree::Element;
use std::collections::VecDeque;

/// A block-level processor.
///
/// Contract for `run`: the block under consideration is at the front of
/// `blocks`. A processor that claims it pops it, may pop more blocks, and
/// may push unconsumed lines back to the front. Returning `false` declines,
/// in which case `blocks` must be left unchanged.
pub trait BlockProcessor {
    fn name(&self) -> &'static str;

    /// Higher runs first.
    fn priority(&self) -> u32;

    /// `sibling` is the element directly preceding the block in its parent.
    fn test(&self, sibling: Option<&Element>, block: &str) -> bool;

    fn run(&self, parser: &BlockParser, parent: &mut Element, blocks: &mut VecDeque<String>)
    -> bool;
}

pub struct BlockParser {
    processors: Vec<Box<dyn BlockProcessor>>,
    tab_length: usize,
}

impl BlockParser {
    pub fn new(tab_length: usize) -> Self {
        Self {
            processors: Vec::new(),
            tab_length,
        }
    }

    /// Add a processor, keeping the list sorted by priority.
    ///
    /// Equal priorities keep registration order.
    pub fn register(&mut self, processor: Box<dyn BlockProcessor>) {
        let at = self
            .processors
            .iter()
            .position(|p| p.priority() < processor.priority())
            .unwrap_or(self.processors.len());
        self.processors.insert(at, processor);
    }

    pub fn tab_length(&self) -> usize {
        self.tab_length
    }

    /// Name of the processor that would claim `block` after `sibling`.
    pub fn claimant(&self, sibling: Option<&Element>, block: &str) -> Option<&'static str> {
        self.processors
            .iter()
            .find(|p| p.test(sibling, block))
            .map(|p| p.name())
    }

    /// Split `text` into blocks and parse them into `parent`.
    pub fn parse_chunk(&self, parent: &mut Element, text: &str) {
        let blocks = text.split("\n\n").map(str::to_owned).collect();
        self.parse_blocks(parent, blocks);
    }

    pub fn parse_blocks(&self, parent: &mut Element, mut blocks: VecDeque<String>) {
        while let Some(block) = blocks.front() {
            if block.trim().is_empty() {
                blocks.pop_front();
                continue;
            }

            let block = block.clone();
            let claimed = self.processors.iter().any(|processor| {
                processor.test(parent.last_element(), &block)
                    && processor.run(self, parent, &mut blocks)
            });

            // No processor took it; drop the block rather than loop forever
            if !claimed {
                blocks.pop_front();
            }
        }
    }
}

/// Normalize source text before block splitting.
///
/// Line endings become `\n`, tabs expand to `tab_length` columns,
/// whitespace-only lines are emptied, and surrounding blank lines go.
pub fn normalize(source: &str, tab_length: usize) -> String {
    let source = source.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<String> = source
        .split('\n')
        .map(|line| {
            let line = expand_tabs(line, tab_length);
            if line.trim().is_empty() {
                String::new()
            } else {
                line
            }
        })
        .collect();
    lines.join("\n").trim_matches('\n').to_owned()
}

fn expand_tabs(line: &str, tab_length: usize) -> String {
    if !line.contains('\t') {
        return line.to_owned();
    }
    let mut out = String::with_capacity(line.len() + tab_length);
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = tab_length - column % tab_length;
            out.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}
