//! Lookahead helpers.
//!
//! Every structural construct is matched against the remaining suffix before
//! anything is consumed, so a failed match leaves the cursor where it was and
//! the character falls through to literal text.

use crate::tokenizer::Tokenizer;
use regex::Regex;
use std::sync::LazyLock;

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("tokenizer patterns are valid")
}

static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| pattern(r"^ *(?:\n|$)"));
static RULE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^(?:-(?: *-){2,}|\*(?: *\*){2,}) *(?:\n|$)"));
static HEADER_PREFIX: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(?:#+ +)+"));
static BULLET: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[*+-] +"));
static ORDERED: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[0-9]+\. +"));
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r#"^\[([^\]\n]+)\]\(([^"\)\n]*)(?:"((?:[^"\\\n]|\\.)+)")?\)"#)
});
static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r#"^!\[([^\]\n]*)\]\(([^"\)\n]+)(?:"((?:[^"\\\n]|\\.)+)")?\)"#)
});

/// Maximum ATX header level; further `#` are literal text.
pub(super) const MAX_HEADER_LEVEL: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct LinkMatch {
    /// Code points of bracketed text.
    pub(super) text_len: usize,
    /// Code points of the whole construct, brackets and parentheses included.
    pub(super) len: usize,
    pub(super) url: String,
    pub(super) title: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct ImageMatch {
    pub(super) len: usize,
    pub(super) alt: String,
    pub(super) url: String,
    pub(super) title: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct HeaderPrefix {
    pub(super) level: usize,
    /// Code points to consume; stops before a `#` past the maximum level.
    pub(super) len: usize,
}

impl Tokenizer {
    /// Length in code points of a blank line (including its newline), if any.
    pub(super) fn match_blank_line(&self) -> Option<usize> {
        self.match_len(&BLANK_LINE)
    }

    pub(super) fn match_rule(&self) -> Option<usize> {
        self.match_len(&RULE)
    }

    pub(super) fn match_bullet(&self) -> bool {
        self.scanner.match_prefix(&BULLET).is_some()
    }

    pub(super) fn match_ordered(&self) -> bool {
        self.scanner.match_prefix(&ORDERED).is_some()
    }

    pub(super) fn match_header_prefix(&self) -> Option<HeaderPrefix> {
        let caps = self.scanner.match_prefix(&HEADER_PREFIX)?;
        let prefix = caps.get(0)?.as_str();
        let mut level = 0;
        let mut len = 0;
        for ch in prefix.chars() {
            if ch == '#' {
                if level == MAX_HEADER_LEVEL {
                    break;
                }
                level += 1;
            }
            len += 1;
        }
        Some(HeaderPrefix { level, len })
    }

    pub(super) fn match_link(&self) -> Option<LinkMatch> {
        let caps = self.scanner.match_prefix(&LINK)?;
        let whole = caps.get(0)?;
        Some(LinkMatch {
            text_len: caps.get(1)?.as_str().chars().count(),
            len: self.scanner.char_count(whole.end()),
            url: caps.get(2).map_or("", |m| m.as_str()).trim().to_string(),
            title: caps.get(3).map(|m| unescape_title(m.as_str())),
        })
    }

    pub(super) fn match_image(&self) -> Option<ImageMatch> {
        let caps = self.scanner.match_prefix(&IMAGE)?;
        let whole = caps.get(0)?;
        Some(ImageMatch {
            len: self.scanner.char_count(whole.end()),
            alt: caps.get(1).map_or("", |m| m.as_str()).to_string(),
            url: caps.get(2)?.as_str().trim().to_string(),
            title: caps.get(3).map(|m| unescape_title(m.as_str())),
        })
    }

    /// Whether a backtick run of exactly `width` follows before the paragraph ends.
    pub(super) fn has_code_close(&self, width: usize) -> bool {
        let rest = self.scanner.remaining();
        let mut i = 0;
        while i < rest.len() {
            match rest[i] {
                '`' => {
                    let start = i;
                    while i < rest.len() && rest[i] == '`' {
                        i += 1;
                    }
                    if i - start == width {
                        return true;
                    }
                }
                '\n' => {
                    let mut j = i + 1;
                    while j < rest.len() && rest[j] == ' ' {
                        j += 1;
                    }
                    if j == rest.len() || rest[j] == '\n' {
                        return false;
                    }
                    i += 1;
                }
                _ => i += 1,
            }
        }
        false
    }

    /// Length of the run of `ch` starting at the cursor, counting at most `max`.
    pub(super) fn run_length(&self, ch: char, max: usize) -> usize {
        self.scanner
            .remaining()
            .iter()
            .take_while(|&&c| c == ch)
            .take(max)
            .count()
    }

    fn match_len(&self, pattern: &Regex) -> Option<usize> {
        let caps = self.scanner.match_prefix(pattern)?;
        let whole = caps.get(0)?;
        Some(self.scanner.char_count(whole.end()))
    }
}

/// Resolve backslash escapes inside a quoted title.
fn unescape_title(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::unescape_title;

    #[test]
    fn title_escapes_resolve_to_the_escaped_char() {
        assert_eq!(unescape_title(r#"world<\">"#), r#"world<">"#);
        assert_eq!(unescape_title(r"a\\b"), r"a\b");
    }
}
