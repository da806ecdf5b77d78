//! Markdown tree builder public API.
//!
//! Consumes the token list in order and builds a `Document`. The builder owns
//! all tree-construction state: the insertion cursor, the stack of open
//! elements, the insertion mode and the pending list indentation.
//!
//! Invariants:
//! - The open-element stack is exactly the path from the root to the cursor.
//! - Closing an element prunes every element it leaves without children, then
//!   reopens the formatting elements it implicitly closed.
//! - Elements still open when the tokens run out stay open.

use crate::dom::{Document, Element, ElementType, NodeId, Tag};
use crate::shared::{Cursor, Error, Token, TokenKind};
use formatting::ReopenList;
use modes::InsertionMode;
use stack::{OpenElement, OpenElementsStack};

mod formatting;
mod lists;
mod modes;
mod stack;

#[derive(Clone, Debug)]
pub struct TreeBuilderConfig {
    /// Collapse runs of spaces in text outside `<code>`.
    pub collapse_spaces: bool,
    /// Maximum revisits of one token position before aborting.
    pub loop_guard_limit: u32,
}

impl Default for TreeBuilderConfig {
    fn default() -> Self {
        Self {
            collapse_spaces: true,
            loop_guard_limit: 5,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeBuilderStats {
    pub tokens_processed: u64,
    pub mode_transitions: u64,
    pub nodes_pruned: u64,
    pub max_open_depth: u32,
}

/// Markdown tree builder.
pub struct TreeBuilder {
    config: TreeBuilderConfig,
    mode: InsertionMode,
    document: Document,
    current: NodeId,
    open: OpenElementsStack,
    pending_indent: usize,
    stats: TreeBuilderStats,
}

impl TreeBuilder {
    pub fn new(config: TreeBuilderConfig) -> Self {
        Self {
            config,
            mode: InsertionMode::Data,
            document: Document::new(),
            current: Document::ROOT,
            open: OpenElementsStack::default(),
            pending_indent: 0,
            stats: TreeBuilderStats::default(),
        }
    }

    /// Consume `tokens` in order.
    pub fn run(&mut self, tokens: Vec<Token>) -> Result<(), Error> {
        let mut cursor = Cursor::new(tokens, self.config.loop_guard_limit);
        while !cursor.is_at_end() {
            cursor.check_progress()?;
            let token = cursor.consume_one()?;
            self.stats.tokens_processed = self.stats.tokens_processed.saturating_add(1);
            self.process(&token, &mut cursor)?;
        }
        self.stats.max_open_depth = self.open.max_depth();
        Ok(())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn stats(&self) -> TreeBuilderStats {
        TreeBuilderStats {
            max_open_depth: self.open.max_depth(),
            ..self.stats
        }
    }

    fn transition_to(&mut self, next: InsertionMode) {
        if self.mode == next {
            return;
        }
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "markdown.tree_builder",
            "mode {:?} -> {:?}",
            self.mode,
            next
        );
        self.mode = next;
        self.stats.mode_transitions = self.stats.mode_transitions.saturating_add(1);
    }

    fn process(&mut self, token: &Token, cursor: &mut Cursor<Token>) -> Result<(), Error> {
        match self.mode {
            InsertionMode::Data => self.process_data(token, cursor),
            InsertionMode::InImage => match token.kind {
                TokenKind::ImageAlt => {
                    self.set_image_attribute("alt", token)?;
                    self.transition_to(InsertionMode::InImageUrl);
                    Ok(())
                }
                TokenKind::ImageUrl => {
                    self.set_image_attribute("src", token)?;
                    self.transition_to(InsertionMode::InImageTitle);
                    Ok(())
                }
                _ => Err(self.invalid_state(token)),
            },
            InsertionMode::InImageUrl => match token.kind {
                TokenKind::ImageUrl => {
                    self.set_image_attribute("src", token)?;
                    self.transition_to(InsertionMode::InImageTitle);
                    Ok(())
                }
                _ => Err(self.invalid_state(token)),
            },
            InsertionMode::InImageTitle => match token.kind {
                TokenKind::ImageTitle => self.set_image_attribute("title", token),
                TokenKind::EndImage => {
                    self.transition_to(InsertionMode::Data);
                    Ok(())
                }
                _ => Err(self.invalid_state(token)),
            },
        }
    }

    fn process_data(&mut self, token: &Token, cursor: &mut Cursor<Token>) -> Result<(), Error> {
        if token.kind == TokenKind::Indent {
            self.pending_indent += 1;
            return Ok(());
        }
        if self.pending_indent > 0 && token.kind.is_inline_content() {
            let depth = std::mem::take(&mut self.pending_indent);
            self.continue_list_item(depth)?;
        }

        match token.kind {
            TokenKind::Character => {
                self.ensure_block()?;
                self.append_text(token.value())?;
            }
            TokenKind::Newline => {
                if self.in_block() {
                    self.append_text(" ")?;
                }
            }
            TokenKind::Linebreak => {
                if self.in_block() {
                    self.append_element(Element::new(Tag::Br))?;
                }
            }
            TokenKind::StartParagraph => {
                self.close_open_leaf()?;
                self.open_element(Tag::P)?;
            }
            TokenKind::EndParagraph => self.close_element(Tag::P)?,
            TokenKind::NewBlock => {
                let container = matches!(
                    self.current_tag(),
                    None | Some(Tag::Ul | Tag::Ol | Tag::Blockquote)
                );
                if !container {
                    self.close_block()?;
                }
            }
            TokenKind::EndBlock => {
                while !matches!(self.current_tag(), None | Some(Tag::Blockquote)) {
                    self.close_block()?;
                }
            }
            TokenKind::Rule => {
                self.close_open_leaf()?;
                self.append_element(Element::new(Tag::Hr))?;
            }
            TokenKind::AtxHeader => {
                let level = token
                    .value()
                    .parse::<u8>()
                    .ok()
                    .filter(|level| (1..=6).contains(level))
                    .ok_or_else(|| Error::InvalidArgument {
                        what: "header level",
                        value: token.value().to_string(),
                    })?;
                self.close_open_leaf()?;
                self.open_element(Tag::Heading(level))?;
            }
            TokenKind::StartBlockquote => {
                let mut level = 1;
                while cursor
                    .peek(1)
                    .is_some_and(|next| next.kind == TokenKind::StartBlockquote)
                {
                    cursor.consume_one()?;
                    level += 1;
                }
                self.set_blockquote_level(level)?;
            }
            TokenKind::EndBlockquotes => {
                while self.open.contains(Tag::Blockquote) {
                    self.close_element(Tag::Blockquote)?;
                }
            }
            TokenKind::Ul => self.start_list_item(Tag::Ul, false)?,
            TokenKind::UlParagraph => self.start_list_item(Tag::Ul, true)?,
            TokenKind::Ol => self.start_list_item(Tag::Ol, false)?,
            TokenKind::OlParagraph => self.start_list_item(Tag::Ol, true)?,
            TokenKind::StartCode => {
                self.ensure_block()?;
                if !self.open.contains(Tag::Code) {
                    self.open_element(Tag::Code)?;
                }
            }
            TokenKind::CloseCode => self.close_element(Tag::Code)?,
            TokenKind::StartLink => {
                if !self.open.contains(Tag::A) {
                    self.ensure_block()?;
                    self.open_element(Tag::A)?;
                }
            }
            TokenKind::LinkUrl => self.set_link_attribute("href", token)?,
            TokenKind::LinkTitle => self.set_link_attribute("title", token)?,
            TokenKind::EndLink => self.close_element(Tag::A)?,
            TokenKind::StartImage => {
                self.ensure_block()?;
                self.append_element(Element::new(Tag::Img))?;
                self.transition_to(InsertionMode::InImage);
            }
            TokenKind::StartEm => self.start_formatting(Tag::Em, token)?,
            TokenKind::EndEm => self.end_formatting(Tag::Em, token)?,
            TokenKind::ToggleEm => self.toggle_formatting(Tag::Em)?,
            TokenKind::StartStrong => self.start_formatting(Tag::Strong, token)?,
            TokenKind::EndStrong => self.end_formatting(Tag::Strong, token)?,
            TokenKind::ToggleStrong => self.toggle_formatting(Tag::Strong)?,
            TokenKind::Indent
            | TokenKind::ImageAlt
            | TokenKind::ImageUrl
            | TokenKind::ImageTitle
            | TokenKind::EndImage => return Err(self.invalid_state(token)),
        }

        if !matches!(
            token.kind,
            TokenKind::NewBlock | TokenKind::StartBlockquote | TokenKind::EndBlockquotes
        ) {
            self.pending_indent = 0;
        }
        Ok(())
    }

    /// An opening marker while the element is already open is literal text.
    fn start_formatting(&mut self, tag: Tag, token: &Token) -> Result<(), Error> {
        self.ensure_block()?;
        if self.open.contains(tag) {
            self.append_text(token.value())
        } else {
            self.open_element(tag)
        }
    }

    /// A closing marker with nothing to close is literal text.
    fn end_formatting(&mut self, tag: Tag, token: &Token) -> Result<(), Error> {
        if self.open.contains(tag) {
            self.close_element(tag)
        } else {
            self.ensure_block()?;
            self.append_text(token.value())
        }
    }

    fn toggle_formatting(&mut self, tag: Tag) -> Result<(), Error> {
        self.ensure_block()?;
        if self.open.contains(tag) {
            self.close_element(tag)
        } else {
            self.open_element(tag)
        }
    }

    fn set_blockquote_level(&mut self, level: usize) -> Result<(), Error> {
        let open_level = self.open.count(Tag::Blockquote);
        if level > open_level {
            self.close_open_leaf()?;
            for _ in open_level..level {
                self.open_element(Tag::Blockquote)?;
            }
        } else {
            for _ in level..open_level {
                self.close_element(Tag::Blockquote)?;
            }
        }
        Ok(())
    }

    fn set_link_attribute(&mut self, name: &str, token: &Token) -> Result<(), Error> {
        match self.get_ancestor(Tag::A) {
            Some(link) => {
                self.document
                    .element_mut(link)?
                    .attributes
                    .insert(name.to_string(), token.value().to_string());
            }
            None => {
                #[cfg(any(test, feature = "debug-stats"))]
                log::trace!(target: "markdown.tree_builder", "{name} outside a link ignored");
            }
        }
        Ok(())
    }

    fn set_image_attribute(&mut self, name: &str, token: &Token) -> Result<(), Error> {
        let image = self
            .document
            .last_child(self.current)
            .filter(|&node| self.document.tag(node) == Some(Tag::Img))
            .ok_or_else(|| self.invalid_state(token))?;
        self.document
            .element_mut(image)?
            .attributes
            .insert(name.to_string(), token.value().to_string());
        Ok(())
    }

    fn current_tag(&self) -> Option<Tag> {
        self.open.current().map(|entry| entry.tag)
    }

    /// Nearest element named `tag` on the path from the cursor to the root.
    fn get_ancestor(&self, tag: Tag) -> Option<NodeId> {
        let mut node = self.current;
        loop {
            let entry = self.document.get(node)?;
            if entry.tag() == Some(tag) {
                return Some(node);
            }
            node = entry.parent()?;
        }
    }

    /// Whether inline content would land in a paragraph, heading or list item.
    fn in_block(&self) -> bool {
        self.open
            .innermost_block()
            .is_some_and(|(_, entry)| entry.tag.is_leaf_block())
    }

    fn ensure_block(&mut self) -> Result<(), Error> {
        if !self.in_block() {
            self.open_element(Tag::P)?;
        }
        Ok(())
    }

    /// Close the paragraph or heading the cursor is in, if any.
    fn close_open_leaf(&mut self) -> Result<(), Error> {
        if let Some((index, entry)) = self.open.innermost_block()
            && matches!(entry.tag, Tag::P | Tag::Heading(_))
        {
            self.close_at(index)?;
        }
        Ok(())
    }

    fn open_element(&mut self, tag: Tag) -> Result<(), Error> {
        let node = self.document.append_element(self.current, Element::new(tag))?;
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "markdown.tree_builder", "open <{}> #{node}", tag.name());
        self.open.push(OpenElement { node, tag });
        self.current = node;
        Ok(())
    }

    /// Re-enter an existing child of the cursor.
    fn reopen_node(&mut self, node: NodeId) -> Result<(), Error> {
        let entry = self.document.node(node)?;
        let (Some(tag), Some(parent)) = (entry.tag(), entry.parent()) else {
            return Err(Error::NodeOutOfRange {
                node,
                len: self.document.arena_len(),
            });
        };
        debug_assert_eq!(parent, self.current, "reopened node must be a child of the cursor");
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "markdown.tree_builder", "reopen <{}> #{node}", tag.name());
        self.open.push(OpenElement { node, tag });
        self.current = node;
        Ok(())
    }

    fn append_element(&mut self, element: Element) -> Result<NodeId, Error> {
        self.document.append_element(self.current, element)
    }

    fn append_text(&mut self, text: &str) -> Result<(), Error> {
        if !self.config.collapse_spaces || self.open.contains(Tag::Code) {
            self.document.append_text(self.current, text)?;
            return Ok(());
        }
        let after_space = self
            .document
            .last_child(self.current)
            .and_then(|node| self.document.get(node))
            .and_then(|node| node.text())
            .is_some_and(|text| text.ends_with(' '));
        let collapsed = collapse_spaces(text, after_space);
        if !collapsed.is_empty() {
            self.document.append_text(self.current, &collapsed)?;
        }
        Ok(())
    }

    /// Close the innermost open element named `tag`; no-op if none is open.
    fn close_element(&mut self, tag: Tag) -> Result<(), Error> {
        match self.open.position_of(tag) {
            Some(index) => self.close_at(index),
            None => Ok(()),
        }
    }

    /// Close elements until a block element has been closed or the root is reached.
    fn close_block(&mut self) -> Result<(), Error> {
        while let Some(entry) = self.open.current() {
            self.close_at(self.open.len() - 1)?;
            if entry.tag.element_type() == ElementType::Block {
                break;
            }
        }
        Ok(())
    }

    /// Pop the stack down to and including `index`.
    ///
    /// Formatting elements popped above the target are reopened afterwards in
    /// pop order; popping a block element discards the ones collected so far.
    /// Elements left without children are pruned innermost first.
    fn close_at(&mut self, index: usize) -> Result<(), Error> {
        let mut reopen = ReopenList::default();
        let mut visited = Vec::with_capacity(self.open.len().saturating_sub(index));
        while self.open.len() > index {
            let Some(entry) = self.open.pop() else {
                break;
            };
            let is_target = self.open.len() == index;
            match entry.tag.element_type() {
                ElementType::Block => reopen.clear(),
                ElementType::Formatting if !is_target => reopen.push(entry.tag),
                ElementType::Formatting | ElementType::Inline => {}
            }
            visited.push(entry.node);
        }
        self.current = self.open.current().map_or(Document::ROOT, |entry| entry.node);

        for node in visited {
            if self.document.node(node)?.children().is_empty() {
                self.document.detach(node)?;
                self.stats.nodes_pruned = self.stats.nodes_pruned.saturating_add(1);
                #[cfg(any(test, feature = "debug-stats"))]
                log::trace!(target: "markdown.tree_builder", "prune empty #{node}");
            }
        }

        if !reopen.is_empty() {
            for tag in reopen.into_tags() {
                self.open_element(tag)?;
            }
        }
        Ok(())
    }

    fn invalid_state(&self, token: &Token) -> Error {
        log::error!(
            target: "markdown.tree_builder",
            "no rule for {token} in {:?}",
            self.mode
        );
        Error::InvalidState {
            state: self.mode.name(),
            token: token.to_string(),
        }
    }
}

/// Drop every space that follows another space.
fn collapse_spaces(text: &str, after_space: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_space = after_space;
    for ch in text.chars() {
        let is_space = ch == ' ';
        if !(is_space && previous_space) {
            out.push(ch);
        }
        previous_space = is_space;
    }
    out
}

/// Build a document from `tokens` with the default configuration.
pub fn build_tree(tokens: Vec<Token>) -> Result<Document, Error> {
    let mut builder = TreeBuilder::new(TreeBuilderConfig::default());
    builder.run(tokens)?;
    Ok(builder.into_document())
}
