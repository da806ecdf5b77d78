//! Deterministic token formatting for golden tests.
//!
//! One token per line: the kind name, then the value as a quoted, escaped
//! string when the token carries one.

use crate::shared::Token;
use std::fmt::{self, Write};

pub trait TokenTestFormatExt {
    fn to_test_string(&self) -> String;
}

impl TokenTestFormatExt for Token {
    fn to_test_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        if let Some(value) = &self.value {
            f.write_str(" \"")?;
            for ch in value.chars() {
                match ch {
                    '\\' => f.write_str("\\\\")?,
                    '"' => f.write_str("\\\"")?,
                    '\n' => f.write_str("\\n")?,
                    ch if ch < ' ' => write!(f, "\\u{{{:02X}}}", ch as u32)?,
                    _ => f.write_char(ch)?,
                }
            }
            f.write_char('"')?;
        }
        Ok(())
    }
}

/// Format a token list as snapshot lines.
pub fn format_tokens(tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(TokenTestFormatExt::to_test_string).collect()
}
