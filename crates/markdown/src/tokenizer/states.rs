//! Tokenizer state machine definitions.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenizerState {
    /// Start of a physical line: blank runs, quote markers, block markers.
    LineStart,
    /// A header prefix was recognized; emit the level and continue inline.
    AtxHeader,
    /// A `*`, `+` or `-` list marker is under the cursor.
    ListBullet,
    /// A `1.` style list marker is under the cursor.
    ListOrdered,
    /// Inline text of a paragraph, header or list item.
    InText,
    /// Inside a code span; only a backtick run of the fence width closes it.
    InCode,
    /// Inside the bracketed text of a link whose full syntax already matched.
    LinkText,
}

/// What kind of line is being tokenized, decided at `LineStart`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum LineKind {
    #[default]
    Text,
    Header,
    Bullet,
    Ordered,
    Rule,
}

impl LineKind {
    pub(crate) fn is_list_item(self) -> bool {
        matches!(self, LineKind::Bullet | LineKind::Ordered)
    }
}

impl TokenizerState {
    pub(crate) fn name(self) -> &'static str {
        match self {
            TokenizerState::LineStart => "LineStart",
            TokenizerState::AtxHeader => "AtxHeader",
            TokenizerState::ListBullet => "ListBullet",
            TokenizerState::ListOrdered => "ListOrdered",
            TokenizerState::InText => "InText",
            TokenizerState::InCode => "InCode",
            TokenizerState::LinkText => "LinkText",
        }
    }
}
