//! Markdown to HTML conversion.
//!
//! Two explicit state machines do the work: the tokenizer turns text into an
//! ordered token list, and the tree builder turns tokens into a `Document`,
//! which `to_html` serializes. `Markdown` runs all three stages.
//!
//! ```
//! let markdown = markdown::Markdown::new("**foo *bar***", None)?;
//! assert_eq!(
//!     markdown.to_html()?,
//!     "<p><strong>foo <em>bar</em></strong></p>"
//! );
//! # Ok::<(), markdown::Error>(())
//! ```

pub mod dom;
#[cfg(any(test, feature = "dom-snapshot"))]
pub mod dom_snapshot;

mod serialize;
mod session;
mod shared;
mod tokenizer;
mod tree_builder;

pub use crate::dom::{Document, Element, ElementType, Node, NodeId, NodeKind, Tag};
pub use crate::serialize::{escape_attribute, escape_text, to_html};
pub use crate::session::{Conversion, Markdown, Options};
pub use crate::shared::{Counters, Error, ErrorKind, ScanError, Token, TokenKind};
pub use crate::tokenizer::{
    TokenTestFormatExt, Tokenizer, TokenizerConfig, TokenizerStats, format_tokens, tokenize,
};
pub use crate::tree_builder::{TreeBuilder, TreeBuilderConfig, TreeBuilderStats, build_tree};
