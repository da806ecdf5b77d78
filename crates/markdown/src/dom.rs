//! Arena-backed document tree.
//!
//! Nodes live in one `Vec`; children are stored as indices and every node keeps
//! its parent's index for upward walks. Pruned nodes stay in the arena but are
//! detached, so they are unreachable from the root.

use crate::shared::Error;
use std::collections::BTreeMap;

pub type NodeId = usize;

/// Classification used by the close/reopen algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    Block,
    Formatting,
    Inline,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    P,
    Heading(u8),
    Blockquote,
    Ul,
    Ol,
    Li,
    Em,
    Strong,
    A,
    Code,
    Br,
    Hr,
    Img,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::P => "p",
            Tag::Heading(1) => "h1",
            Tag::Heading(2) => "h2",
            Tag::Heading(3) => "h3",
            Tag::Heading(4) => "h4",
            Tag::Heading(5) => "h5",
            Tag::Heading(_) => "h6",
            Tag::Blockquote => "blockquote",
            Tag::Ul => "ul",
            Tag::Ol => "ol",
            Tag::Li => "li",
            Tag::Em => "em",
            Tag::Strong => "strong",
            Tag::A => "a",
            Tag::Code => "code",
            Tag::Br => "br",
            Tag::Hr => "hr",
            Tag::Img => "img",
        }
    }

    pub fn element_type(self) -> ElementType {
        match self {
            Tag::P | Tag::Heading(_) | Tag::Blockquote | Tag::Ul | Tag::Ol | Tag::Li => {
                ElementType::Block
            }
            Tag::Em | Tag::Strong | Tag::A => ElementType::Formatting,
            Tag::Code | Tag::Br | Tag::Hr | Tag::Img => ElementType::Inline,
        }
    }

    /// Void elements have no children and no closing tag.
    pub fn is_void(self) -> bool {
        matches!(self, Tag::Br | Tag::Hr | Tag::Img)
    }

    /// Paragraphs, headings and list items: the elements that hold inline content.
    pub fn is_leaf_block(self) -> bool {
        matches!(self, Tag::P | Tag::Heading(_) | Tag::Li)
    }

    pub fn is_list(self) -> bool {
        matches!(self, Tag::Ul | Tag::Ol)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub tag: Tag,
    /// Sorted by key; last write wins.
    pub attributes: BTreeMap<String, String>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attributes: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.tag.name()
    }

    pub fn element_type(&self) -> ElementType {
        self.tag.element_type()
    }

    pub fn is_void(&self) -> bool {
        self.tag.is_void()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Element(Element),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn tag(&self) -> Option<Tag> {
        self.element().map(|element| element.tag)
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// A rooted, ordered tree; read-only once the builder hands it out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub const ROOT: NodeId = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Root, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, Error> {
        self.nodes.get(id).ok_or(Error::NodeOutOfRange {
            node: id,
            len: self.nodes.len(),
        })
    }

    /// Arena size, detached nodes included.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    pub fn tag(&self, id: NodeId) -> Option<Tag> {
        self.get(id).and_then(Node::tag)
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.children.last().copied())
    }

    pub(crate) fn append_element(&mut self, parent: NodeId, element: Element) -> Result<NodeId, Error> {
        self.append(parent, NodeKind::Element(element))
    }

    /// Append text, coalescing into a trailing text child.
    pub(crate) fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, Error> {
        if let Some(last) = self.last_child(parent)
            && let NodeKind::Text(existing) = &mut self.node_mut(last)?.kind
        {
            existing.push_str(text);
            return Ok(last);
        }
        self.append(parent, NodeKind::Text(text.to_string()))
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> Result<&mut Element, Error> {
        let len = self.nodes.len();
        match self.nodes.get_mut(id).map(|node| &mut node.kind) {
            Some(NodeKind::Element(element)) => Ok(element),
            _ => Err(Error::NodeOutOfRange { node: id, len }),
        }
    }

    /// Remove `id` from its parent's children. The node stays in the arena.
    pub(crate) fn detach(&mut self, id: NodeId) -> Result<(), Error> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        self.node_mut(parent)?.children.retain(|&child| child != id);
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    fn append(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId, Error> {
        let id = self.nodes.len();
        self.node_mut(parent)?.children.push(id);
        self.nodes.push(Node::new(kind, Some(parent)));
        Ok(id)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, Error> {
        let len = self.nodes.len();
        self.nodes
            .get_mut(id)
            .ok_or(Error::NodeOutOfRange { node: id, len })
    }
}
