//! Atom 1.0 output.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <feed xmlns="http://www.w3.org/2005/Atom" xml:lang="en">
//!   <id>https://example.com/</id>
//!   <title>My Site</title>
//!   <updated>2024-01-01T00:00:00Z</updated>
//!   <entry>
//!     <id>https://example.com/posts/a.html</id>
//!     ...
//!   </entry>
//! </feed>
//! ```

use super::{Feed, FeedEntry};
use quick_xml::escape::escape;
use std::fmt::Write;

// ============================================================================
// Constants
// ============================================================================

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

// ============================================================================
// Serialization
// ============================================================================

/// Serialize `feed` as an Atom document.
pub fn to_xml(feed: &Feed) -> String {
    let mut xml = String::with_capacity(4096);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    let _ = writeln!(
        xml,
        r#"<feed xmlns="{ATOM_NS}" xml:lang="{}">"#,
        escape(feed.language)
    );

    element(&mut xml, 2, "id", &feed.id);
    element(&mut xml, 2, "title", feed.title);
    if let Some(subtitle) = feed.subtitle {
        element(&mut xml, 2, "subtitle", subtitle);
    }
    element(&mut xml, 2, "updated", &feed.updated.to_rfc3339());
    if let Some(link) = &feed.link {
        link_element(&mut xml, 2, link);
    }
    if let Some(author) = feed.author {
        person(&mut xml, 2, "author", author);
    }
    if let Some(contributor) = feed.contributor {
        person(&mut xml, 2, "contributor", contributor);
    }
    if let Some(icon) = feed.icon {
        element(&mut xml, 2, "icon", icon);
    }
    if let Some(logo) = feed.logo {
        element(&mut xml, 2, "logo", logo);
    }
    if let Some(rights) = feed.rights {
        element(&mut xml, 2, "rights", rights);
    }
    let _ = writeln!(
        xml,
        r#"  <generator>{}</generator>"#,
        env!("CARGO_PKG_NAME")
    );

    for entry in &feed.entries {
        write_entry(&mut xml, entry);
    }

    xml.push_str("</feed>\n");
    xml
}

fn write_entry(xml: &mut String, entry: &FeedEntry) {
    xml.push_str("  <entry>\n");
    element(xml, 4, "id", &entry.id);
    element(xml, 4, "title", entry.title);
    element(xml, 4, "updated", &entry.updated.to_rfc3339());
    if let Some(published) = entry.published {
        element(xml, 4, "published", &published.to_rfc3339());
    }
    if let Some(link) = &entry.link {
        link_element(xml, 4, link);
    }
    if let Some(author) = entry.author {
        person(xml, 4, "author", author);
    }
    if let Some(contributor) = entry.contributor {
        person(xml, 4, "contributor", contributor);
    }
    if let Some(rights) = entry.rights {
        element(xml, 4, "rights", rights);
    }
    if let Some(summary) = entry.summary {
        element(xml, 4, "summary", summary);
    }
    let _ = writeln!(
        xml,
        r#"    <content type="html">{}</content>"#,
        escape(entry.content)
    );
    xml.push_str("  </entry>\n");
}

// ============================================================================
// Helper Functions
// ============================================================================

fn element(xml: &mut String, indent: usize, tag: &str, text: &str) {
    let _ = writeln!(xml, "{:indent$}<{tag}>{}</{tag}>", "", escape(text));
}

fn link_element(xml: &mut String, indent: usize, href: &str) {
    let _ = writeln!(
        xml,
        r#"{:indent$}<link rel="alternate" href="{}"/>"#,
        "",
        escape(href)
    );
}

fn person(xml: &mut String, indent: usize, tag: &str, name: &str) {
    let _ = writeln!(
        xml,
        "{:indent$}<{tag}><name>{}</name></{tag}>",
        "",
        escape(name)
    );
}

// ============================================================================
// Tests
// ============================================================================
