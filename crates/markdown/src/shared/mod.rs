//! Shared types for the tokenizer and tree builder.
//!
//! This module is `pub(crate)`; downstream consumers import these types via
//! `markdown::{Token, TokenKind, Error, ...}`.

mod counters;
mod cursor;
mod error;
mod token;

pub use counters::Counters;
pub(crate) use cursor::{Cursor, Scanner};
pub use error::{Error, ErrorKind, ScanError};
pub use token::{Token, TokenKind};
