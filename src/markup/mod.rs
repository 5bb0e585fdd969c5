//! Page body markup: CommonMark extended with callout blocks.
//!
//! | Processor               | Priority | Claims                                 |
//! |-------------------------|----------|----------------------------------------|
//! | [`FencedCodeProcessor`] | 110      | ```` ``` ```` / `~~~` fences            |
//! | [`CalloutProcessor`]    | 105      | `!!!` directives and their continuations |
//! | [`CommonMarkProcessor`] | 0        | everything else                        |

mod callout;
mod cmark;
mod fenced;
mod pipeline;
mod tree;

pub use tree::Element;

use callout::CalloutProcessor;
use cmark::CommonMarkProcessor;
use fenced::FencedCodeProcessor;
use pipeline::{BlockParser, normalize};

/// Converts page bodies to HTML.
pub struct Markdown {
    parser: BlockParser,
}

impl Markdown {
    pub fn new(tab_length: usize) -> Self {
        let mut parser = BlockParser::new(tab_length);
        parser.register(Box::new(FencedCodeProcessor));
        parser.register(Box::new(CalloutProcessor::new(tab_length)));
        parser.register(Box::new(CommonMarkProcessor));
        Self { parser }
    }

    /// Parse into an element tree rooted at a bare `div`.
    pub fn parse(&self, source: &str) -> Element {
        let mut root = Element::new("div");
        let text = normalize(source, self.parser.tab_length());
        self.parser.parse_chunk(&mut root, &text);
        root
    }

    pub fn convert(&self, source: &str) -> String {
        self.parse(source).inner_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::tree::Node;

    #[test]
    fn test_empty_source() {
        assert_eq!(Markdown::new(4).convert(""), "");
        assert_eq!(Markdown::new(4).convert("\n\n  \n"), "");
    }

    #[test]
    fn test_callout_tree_shape() {
        let root = Markdown::new(4).parse("!!! note \"Heads up\"\n    body");

        let container = root.last_element().unwrap();
        assert!(container.has_class("message"));
        assert!(container.has_class("note"));

        let children: Vec<&Element> = container.elements().collect();
        assert_eq!(children.len(), 2);
        assert!(children[0].has_class("message-header"));
        assert_eq!(children[0].children, vec![Node::Text("Heads up".into())]);
        assert!(children[1].has_class("message-body"));
    }

    #[test]
    fn test_custom_tab_length() {
        let html = Markdown::new(2).convert("!!! note\n  two-space body");
        assert!(html.contains("<p>two-space body</p>"));
    }

    #[test]
    fn test_crlf_and_tabs() {
        let html = Markdown::new(4).convert("!!! note\r\n\tTabbed body\r\n");
        assert!(html.contains("<p>Tabbed body</p>"));
    }

    #[test]
    fn test_content_around_callout() {
        let html = Markdown::new(4).convert("# Title\n\n!!! info\n    inside\n\nOutro");

        let title = html.find("<h1>Title</h1>").unwrap();
        let callout = html.find("class=\"message info\"").unwrap();
        let outro = html.find("<p>Outro</p>").unwrap();
        assert!(title < callout && callout < outro);
    }
}
