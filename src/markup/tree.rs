//! Owned element tree built by the block pipeline.
//!
//! Leaf markup rendered by pulldown-cmark is stored as [`Node::Raw`] and
//! written out untouched; [`Node::Text`] is escaped on output.

use quick_xml::escape::escape;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_class(tag: impl Into<String>, class: impl Into<String>) -> Self {
        let mut element = Self::new(tag);
        element.set_attr("class", class);
        element
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Whether the whitespace-separated `class` attribute contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn push_element(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    pub fn push_raw(&mut self, html: impl Into<String>) {
        self.children.push(Node::Raw(html.into()));
    }

    /// The last child, if it is an element.
    ///
    /// Text or raw markup in last position yields `None`: only an element
    /// directly before a block counts as its sibling.
    pub fn last_element(&self) -> Option<&Element> {
        match self.children.last() {
            Some(Node::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn last_element_mut(&mut self) -> Option<&mut Element> {
        match self.children.last_mut() {
            Some(Node::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// First direct child element carrying `class`.
    pub fn child_with_class_mut(&mut self, class: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element) if element.has_class(class) => Some(element),
            _ => None,
        })
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Serialize the children only.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_html(&mut out);
        }
        out
    }

    /// Elements holding only text stay on one line, containers put their
    /// children on separate lines.
    pub fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        out.push('>');

        let is_container = self
            .children
            .iter()
            .any(|child| !matches!(child, Node::Text(_)));
        if is_container {
            out.push('\n');
        }
        for child in &self.children {
            child.write_html(out);
        }
        if is_container && !out.ends_with('\n') {
            out.push('\n');
        }

        out.push_str("</");
        out.push_str(&self.tag);
        out.push_str(">\n");
    }
}

impl Node {
    pub fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_html(out),
            Node::Text(text) => out.push_str(&escape(text.as_str())),
            Node::Raw(html) => out.push_str(html),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_class() {
        let element = Element::with_class("div", "message  note warning");
        assert!(element.has_class("message"));
        assert!(element.has_class("warning"));
        assert!(!element.has_class("mess"));
        assert!(!Element::new("div").has_class("message"));
    }

    #[test]
    fn test_set_attr_replaces() {
        let mut element = Element::with_class("p", "a");
        element.set_attr("class", "b");
        assert_eq!(element.attrs.len(), 1);
        assert_eq!(element.attr("class"), Some("b"));
    }

    #[test]
    fn test_last_element_ignores_trailing_raw() {
        let mut parent = Element::new("div");
        parent.push_element(Element::with_class("div", "message"));
        assert!(parent.last_element().is_some());

        parent.push_raw("<p>after</p>\n");
        assert!(parent.last_element().is_none());
    }

    fn to_html(element: &Element) -> String {
        let mut out = String::new();
        element.write_html(&mut out);
        out
    }

    #[test]
    fn test_write_html_escapes_text_not_raw() {
        let mut div = Element::with_class("div", "message note");
        let mut title = Element::with_class("p", "message-header");
        title.push_text("a < b & c");
        div.push_element(title);
        div.push_raw("<p><em>raw</em></p>\n");

        assert_eq!(
            to_html(&div),
            "<div class=\"message note\">\n\
             <p class=\"message-header\">a &lt; b &amp; c</p>\n\
             <p><em>raw</em></p>\n\
             </div>\n"
        );
    }

    #[test]
    fn test_empty_element() {
        assert_eq!(to_html(&Element::new("div")), "<div></div>\n");
    }
}
