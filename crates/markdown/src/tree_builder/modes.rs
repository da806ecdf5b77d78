//! Insertion modes used by the tree builder state machine.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum InsertionMode {
    #[default]
    Data,
    /// `startImage` appended an `<img>`; expecting `imageAlt` or `imageUrl`.
    InImage,
    /// Alt text is set; expecting `imageUrl`.
    InImageUrl,
    /// Source is set; expecting `imageTitle` or `endImage`.
    InImageTitle,
}

impl InsertionMode {
    pub(crate) fn name(self) -> &'static str {
        match self {
            InsertionMode::Data => "Data",
            InsertionMode::InImage => "InImage",
            InsertionMode::InImageUrl => "InImageUrl",
            InsertionMode::InImageTitle => "InImageTitle",
        }
    }
}
