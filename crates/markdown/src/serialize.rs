//! HTML serialization of a finished document.
//!
//! Output is one dense string: no whitespace between tags, void elements as a
//! lone open tag, attributes sorted by name. Text escapes `&` and `<`;
//! attribute values additionally escape `>` and `"`.

use crate::dom::{Document, NodeId, NodeKind, Tag};
use std::borrow::Cow;
use std::fmt::Write;

enum Visit {
    Enter(NodeId),
    Exit(Tag),
}

/// Serialize `document`; elements still open in the tree are closed here.
pub fn to_html(document: &Document) -> String {
    let mut out = String::new();
    let mut pending = vec![Visit::Enter(document.root())];
    while let Some(visit) = pending.pop() {
        let id = match visit {
            Visit::Exit(tag) => {
                let _ = write!(out, "</{}>", tag.name());
                continue;
            }
            Visit::Enter(id) => id,
        };
        let Some(node) = document.get(id) else {
            continue;
        };
        match &node.kind {
            NodeKind::Root => {}
            NodeKind::Text(text) => {
                out.push_str(&escape_text(text));
                continue;
            }
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(element.name());
                for (name, value) in &element.attributes {
                    let _ = write!(out, " {name}=\"{}\"", escape_attribute(value));
                }
                out.push('>');
                if element.is_void() {
                    continue;
                }
                pending.push(Visit::Exit(element.tag));
            }
        }
        pending.extend(node.children().iter().rev().map(|&child| Visit::Enter(child)));
    }
    out
}

/// Escape body text: `&` first, then `<`.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if memchr::memchr2(b'&', b'<', text.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace('&', "&amp;").replace('<', "&lt;"))
}

/// Escape an attribute value: `&`, `<`, `>` and `"`.
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    let bytes = value.as_bytes();
    if memchr::memchr3(b'&', b'<', b'>', bytes).is_none() && memchr::memchr(b'"', bytes).is_none()
    {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}
