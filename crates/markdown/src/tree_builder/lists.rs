//! List nesting.
//!
//! List depth counts the `ul`/`ol` elements open inside the innermost
//! blockquote. `indent` tokens before a list marker or a continuation select
//! the depth; closed list items and nested lists are re-entered as needed so
//! that later items and paragraphs land in the right container.

use crate::dom::{NodeKind, Tag};
use crate::shared::Error;
use crate::tree_builder::TreeBuilder;

impl TreeBuilder {
    /// Handle `ul`/`ol`/`ulParagraph`/`olParagraph` at `pending_indent + 1`.
    pub(super) fn start_list_item(&mut self, list: Tag, paragraph: bool) -> Result<(), Error> {
        let target = std::mem::take(&mut self.pending_indent) + 1;
        self.unwind_to_container()?;
        self.close_lists_deeper_than(target)?;

        let mut depth = self.open.list_indices().len();
        if depth == target {
            let lists = self.open.list_indices();
            if let Some(&index) = lists.last()
                && self.open_tag_at(index) != Some(list)
            {
                self.close_at(index)?;
                depth -= 1;
            }
        }

        if depth == target {
            if self.current_tag() == Some(Tag::Li) {
                self.close_at(self.open.len() - 1)?;
            }
        } else {
            depth = self.descend_lists(depth, target - 1)?;
            if depth > 0 {
                self.reopen_list_item()?;
            }
            self.open_element(list)?;
        }

        self.open_element(Tag::Li)?;
        if paragraph {
            self.open_element(Tag::P)?;
        }
        Ok(())
    }

    /// Start a new paragraph inside the list item at `target` depth.
    pub(super) fn continue_list_item(&mut self, target: usize) -> Result<(), Error> {
        self.unwind_to_container()?;
        self.close_lists_deeper_than(target)?;
        let depth = self.open.list_indices().len();
        let depth = self.descend_lists(depth, target)?;
        if depth > 0 {
            self.reopen_list_item()?;
        }
        self.open_element(Tag::P)
    }

    /// Close inline and leaf elements until the cursor is a container.
    fn unwind_to_container(&mut self) -> Result<(), Error> {
        while let Some(tag) = self.current_tag() {
            if matches!(tag, Tag::Li | Tag::Ul | Tag::Ol | Tag::Blockquote) {
                break;
            }
            self.close_at(self.open.len() - 1)?;
        }
        Ok(())
    }

    fn close_lists_deeper_than(&mut self, depth: usize) -> Result<(), Error> {
        let lists = self.open.list_indices();
        if let Some(&index) = lists.get(depth) {
            self.close_at(index)?;
        }
        Ok(())
    }

    /// Re-enter closed list items and their trailing nested lists until
    /// `target` lists are open or no deeper list exists. Returns the depth reached.
    fn descend_lists(&mut self, mut depth: usize, target: usize) -> Result<usize, Error> {
        while depth < target {
            if depth > 0 && !self.reopen_list_item()? {
                break;
            }
            let Some(list) = self.last_child_list() else {
                break;
            };
            self.reopen_node(list)?;
            depth += 1;
        }
        Ok(depth)
    }

    /// Make sure the cursor is a list item of the innermost list, reopening the
    /// list's last item if it was closed.
    fn reopen_list_item(&mut self) -> Result<bool, Error> {
        match self.current_tag() {
            Some(Tag::Li) => Ok(true),
            Some(Tag::Ul | Tag::Ol) => match self.document.last_child(self.current) {
                Some(item) if self.document.tag(item) == Some(Tag::Li) => {
                    self.reopen_node(item)?;
                    Ok(true)
                }
                _ => Ok(false),
            },
            _ => Ok(false),
        }
    }

    /// The cursor's last child, if it is a list nested in a list item.
    fn last_child_list(&self) -> Option<usize> {
        if self.current_tag() != Some(Tag::Li) {
            return None;
        }
        let child = self.document.last_child(self.current)?;
        match &self.document.get(child)?.kind {
            NodeKind::Element(element) if element.tag.is_list() => Some(child),
            _ => None,
        }
    }

    fn open_tag_at(&self, index: usize) -> Option<Tag> {
        self.open.get(index).map(|entry| entry.tag)
    }
}
