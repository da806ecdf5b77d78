//! Deterministic tree outline for tests.
//! Not a stable public format.
//!
//! One line per node, indented two spaces per level: `#root`, elements as
//! `<name attr="value">` with attributes in key order, text as a quoted,
//! escaped string.

use crate::dom::{Document, NodeId, NodeKind};
use std::fmt;

#[derive(Debug)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new(document: &Document) -> Self {
        let mut lines = Vec::new();
        walk_snapshot(document, document.root(), 0, &mut lines);
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn walk_snapshot(document: &Document, id: NodeId, depth: usize, out: &mut Vec<String>) {
    const INDENT_STEP: usize = 2;
    let Some(node) = document.get(id) else {
        return;
    };
    let mut line = " ".repeat(depth * INDENT_STEP);
    match &node.kind {
        NodeKind::Root => line.push_str("#root"),
        NodeKind::Element(element) => {
            line.push('<');
            line.push_str(element.name());
            for (name, value) in &element.attributes {
                line.push(' ');
                line.push_str(name);
                line.push_str("=\"");
                write_escaped(&mut line, value);
                line.push('"');
            }
            line.push('>');
        }
        NodeKind::Text(text) => {
            line.push('"');
            write_escaped(&mut line, text);
            line.push('"');
        }
    }
    out.push(line);
    for &child in node.children() {
        walk_snapshot(document, child, depth + 1, out);
    }
}

fn write_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
}
