//! Token model shared by the tokenizer and tree builder.
//!
//! The ordered token list is the only interface between the two stages.

/// Closed set of token kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Literal text; the value holds one or more characters.
    Character,
    /// Soft line break inside a paragraph.
    Newline,
    /// Hard line break (two or more trailing spaces).
    Linebreak,
    StartParagraph,
    EndParagraph,
    /// Block separator (blank-line run or end of a header line).
    NewBlock,
    /// Leave the current list.
    EndBlock,
    Rule,
    /// ATX header; the value holds the level digit.
    AtxHeader,
    StartBlockquote,
    EndBlockquotes,
    Ul,
    UlParagraph,
    Ol,
    OlParagraph,
    Indent,
    StartCode,
    CloseCode,
    StartLink,
    LinkUrl,
    LinkTitle,
    EndLink,
    StartImage,
    ImageAlt,
    ImageUrl,
    ImageTitle,
    EndImage,
    StartEm,
    EndEm,
    ToggleEm,
    StartStrong,
    EndStrong,
    ToggleStrong,
}

impl TokenKind {
    /// Stable name used in token snapshots.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Character => "character",
            TokenKind::Newline => "newline",
            TokenKind::Linebreak => "linebreak",
            TokenKind::StartParagraph => "startParagraph",
            TokenKind::EndParagraph => "endParagraph",
            TokenKind::NewBlock => "newBlock",
            TokenKind::EndBlock => "endBlock",
            TokenKind::Rule => "rule",
            TokenKind::AtxHeader => "atxHeader",
            TokenKind::StartBlockquote => "startBlockquote",
            TokenKind::EndBlockquotes => "endBlockquotes",
            TokenKind::Ul => "ul",
            TokenKind::UlParagraph => "ulParagraph",
            TokenKind::Ol => "ol",
            TokenKind::OlParagraph => "olParagraph",
            TokenKind::Indent => "indent",
            TokenKind::StartCode => "startCode",
            TokenKind::CloseCode => "closeCode",
            TokenKind::StartLink => "startLink",
            TokenKind::LinkUrl => "linkUrl",
            TokenKind::LinkTitle => "linkTitle",
            TokenKind::EndLink => "endLink",
            TokenKind::StartImage => "startImage",
            TokenKind::ImageAlt => "imageAlt",
            TokenKind::ImageUrl => "imageUrl",
            TokenKind::ImageTitle => "imageTitle",
            TokenKind::EndImage => "endImage",
            TokenKind::StartEm => "startEm",
            TokenKind::EndEm => "endEm",
            TokenKind::ToggleEm => "toggleEm",
            TokenKind::StartStrong => "startStrong",
            TokenKind::EndStrong => "endStrong",
            TokenKind::ToggleStrong => "toggleStrong",
        }
    }

    /// Kinds that carry inline content and therefore need an enclosing block.
    pub(crate) fn is_inline_content(self) -> bool {
        matches!(
            self,
            TokenKind::Character
                | TokenKind::StartCode
                | TokenKind::StartLink
                | TokenKind::StartImage
                | TokenKind::StartEm
                | TokenKind::EndEm
                | TokenKind::ToggleEm
                | TokenKind::StartStrong
                | TokenKind::EndStrong
                | TokenKind::ToggleStrong
        )
    }
}

/// A single token; immutable once emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<String>,
}

impl Token {
    pub fn new(kind: TokenKind) -> Self {
        Self { kind, value: None }
    }

    pub fn with_value(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: Some(value.into()),
        }
    }

    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}
