//! Stack of open elements.

use crate::dom::{NodeId, Tag};

/// Entry in the stack of open elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct OpenElement {
    pub(crate) node: NodeId,
    pub(crate) tag: Tag,
}

/// Path from the root to the insertion cursor, innermost last.
#[derive(Clone, Debug, Default)]
pub(crate) struct OpenElementsStack {
    items: Vec<OpenElement>,
    max_depth: u32,
}

impl OpenElementsStack {
    pub(crate) fn push(&mut self, entry: OpenElement) {
        self.items.push(entry);
        self.max_depth = self.max_depth.max(self.items.len() as u32);
    }

    pub(crate) fn pop(&mut self) -> Option<OpenElement> {
        self.items.pop()
    }

    pub(crate) fn current(&self) -> Option<OpenElement> {
        self.items.last().copied()
    }

    pub(crate) fn get(&self, index: usize) -> Option<OpenElement> {
        self.items.get(index).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub(crate) fn contains(&self, tag: Tag) -> bool {
        self.items.iter().any(|entry| entry.tag == tag)
    }

    /// Index of the innermost entry with `tag`.
    pub(crate) fn position_of(&self, tag: Tag) -> Option<usize> {
        self.items.iter().rposition(|entry| entry.tag == tag)
    }

    pub(crate) fn count(&self, tag: Tag) -> usize {
        self.items.iter().filter(|entry| entry.tag == tag).count()
    }

    /// Indices of open `ul`/`ol` entries inside the innermost blockquote.
    pub(crate) fn list_indices(&self) -> Vec<usize> {
        let floor = self
            .items
            .iter()
            .rposition(|entry| entry.tag == Tag::Blockquote)
            .map_or(0, |index| index + 1);
        (floor..self.items.len())
            .filter(|&index| self.items[index].tag.is_list())
            .collect()
    }

    /// Innermost entry that is a block (not formatting or inline).
    pub(crate) fn innermost_block(&self) -> Option<(usize, OpenElement)> {
        self.items
            .iter()
            .enumerate()
            .rev()
            .find(|(_, entry)| entry.tag.element_type() == crate::dom::ElementType::Block)
            .map(|(index, entry)| (index, *entry))
    }

    #[cfg(test)]
    pub(crate) fn iter_tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.items.iter().map(|entry| entry.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(tags: &[Tag]) -> OpenElementsStack {
        let mut stack = OpenElementsStack::default();
        for (node, tag) in tags.iter().enumerate() {
            stack.push(OpenElement {
                node: node + 1,
                tag: *tag,
            });
        }
        stack
    }

    #[test]
    fn list_indices_stop_at_the_innermost_blockquote() {
        let stack = stack(&[Tag::Ul, Tag::Li, Tag::Blockquote, Tag::Ol, Tag::Li, Tag::Ul]);
        assert_eq!(stack.list_indices(), vec![3, 5]);
        assert_eq!(stack.count(Tag::Li), 2);
        assert_eq!(stack.position_of(Tag::Li), Some(4));
    }

    #[test]
    fn innermost_block_skips_formatting() {
        let stack = stack(&[Tag::P, Tag::Em, Tag::Strong]);
        assert_eq!(stack.innermost_block().map(|(index, _)| index), Some(0));
        assert_eq!(stack.max_depth(), 3);
    }
}
