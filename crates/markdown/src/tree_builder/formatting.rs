//! Formatting elements waiting to be reopened after a close.

use crate::dom::Tag;

/// Formatting tags popped while closing an element, in pop order.
///
/// Popping a block element clears the list: formatting never carries across a
/// block boundary.
#[derive(Clone, Debug, Default)]
pub(crate) struct ReopenList {
    items: Vec<Tag>,
}

impl ReopenList {
    pub(crate) fn push(&mut self, tag: Tag) {
        self.items.push(tag);
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn into_tags(self) -> Vec<Tag> {
        self.items
    }
}
