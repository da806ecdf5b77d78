//! Cursor primitives shared by both state machines.
//!
//! `Cursor<T>` walks a fixed slice of items (code points for the tokenizer,
//! tokens for the tree builder). `Scanner` layers UTF-8 text access and
//! anchored pattern matching on top of a `Cursor<char>`.
//!
//! Invariants:
//! - The position always lies in `0..=len`.
//! - No single position is consumed more than `limit` times, and the owning
//!   state machine never runs more than `limit` consecutive steps without the
//!   position changing. Either violation is reported as `InfiniteLoop`.

use super::error::ScanError;
use regex::{Captures, Regex};

#[derive(Clone, Debug)]
pub(crate) struct Cursor<T> {
    items: Vec<T>,
    position: usize,
    visits: Vec<u32>,
    limit: u32,
    stall_position: Option<usize>,
    stalls: u32,
}

impl<T: Clone> Cursor<T> {
    pub(crate) fn new(items: Vec<T>, limit: u32) -> Self {
        let visits = vec![0; items.len()];
        Self {
            items,
            position: 0,
            visits,
            limit,
            stall_position: None,
            stalls: 0,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.items.len()
    }

    /// Items from the cursor to the end of input.
    pub(crate) fn remaining(&self) -> &[T] {
        &self.items[self.position.min(self.items.len())..]
    }

    /// Returns the item `offset - 1` positions ahead of the cursor.
    ///
    /// `peek(1)` is the item under the cursor; offset `0` never names an item.
    pub(crate) fn peek(&self, offset: usize) -> Option<&T> {
        let index = self.position.checked_add(offset)?.checked_sub(1)?;
        self.items.get(index)
    }

    /// The item just behind the cursor.
    pub(crate) fn previous(&self) -> Option<&T> {
        self.position
            .checked_sub(1)
            .and_then(|index| self.items.get(index))
    }

    pub(crate) fn consume_one(&mut self) -> Result<T, ScanError> {
        let position = self.position;
        let Some(item) = self.items.get(position).cloned() else {
            return Err(ScanError::EndOfInput { position });
        };
        self.record_visit(position)?;
        self.position += 1;
        Ok(item)
    }

    /// Consume exactly `count` items.
    pub(crate) fn advance(&mut self, count: usize) -> Result<(), ScanError> {
        for _ in 0..count {
            self.consume_one()?;
        }
        Ok(())
    }

    pub(crate) fn backup(&mut self, count: usize) -> Result<(), ScanError> {
        if count == 0 {
            return Err(ScanError::InvalidArgument("backup count must be positive"));
        }
        match self.position.checked_sub(count) {
            Some(position) => {
                self.position = position;
                Ok(())
            }
            None => Err(ScanError::InvalidBacktrack {
                position: self.position,
                count,
            }),
        }
    }

    /// Step-level guard: call once per state-machine step.
    pub(crate) fn check_progress(&mut self) -> Result<(), ScanError> {
        if self.stall_position == Some(self.position) {
            self.stalls += 1;
            if self.stalls > self.limit {
                return Err(ScanError::InfiniteLoop {
                    position: self.position,
                    visits: self.stalls,
                });
            }
        } else {
            self.stall_position = Some(self.position);
            self.stalls = 0;
        }
        Ok(())
    }

    fn record_visit(&mut self, position: usize) -> Result<(), ScanError> {
        let visits = &mut self.visits[position];
        *visits = visits.saturating_add(1);
        if *visits > self.limit {
            return Err(ScanError::InfiniteLoop {
                position,
                visits: *visits,
            });
        }
        Ok(())
    }
}

impl<T: Clone + PartialEq> Cursor<T> {
    /// Consume zero or more consecutive copies of `item`.
    pub(crate) fn consume_run(&mut self, item: &T) -> Result<usize, ScanError> {
        let mut count = 0;
        while self.peek(1) == Some(item) {
            self.consume_one()?;
            count += 1;
        }
        Ok(count)
    }
}

/// Code-point scanner over normalized Markdown text.
#[derive(Clone, Debug)]
pub(crate) struct Scanner {
    text: String,
    /// Byte offset of every code point, plus one trailing entry for `text.len()`.
    offsets: Vec<usize>,
    cursor: Cursor<char>,
}

impl Scanner {
    pub(crate) fn new(input: &str, tab_width: usize, limit: u32) -> Self {
        let text = normalize(input, tab_width);
        let mut offsets = Vec::with_capacity(text.len() + 1);
        let mut chars = Vec::with_capacity(text.len());
        for (offset, ch) in text.char_indices() {
            offsets.push(offset);
            chars.push(ch);
        }
        offsets.push(text.len());
        Self {
            text,
            offsets,
            cursor: Cursor::new(chars, limit),
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.cursor.position()
    }

    pub(crate) fn len(&self) -> usize {
        self.cursor.len()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    pub(crate) fn peek(&self, offset: usize) -> Option<char> {
        self.cursor.peek(offset).copied()
    }

    pub(crate) fn previous(&self) -> Option<char> {
        self.cursor.previous().copied()
    }

    pub(crate) fn remaining(&self) -> &[char] {
        self.cursor.remaining()
    }

    pub(crate) fn consume_one(&mut self) -> Result<char, ScanError> {
        self.cursor.consume_one()
    }

    pub(crate) fn consume_run(&mut self, ch: char) -> Result<usize, ScanError> {
        self.cursor.consume_run(&ch)
    }

    pub(crate) fn advance(&mut self, count: usize) -> Result<(), ScanError> {
        self.cursor.advance(count)
    }

    pub(crate) fn backup(&mut self, count: usize) -> Result<(), ScanError> {
        self.cursor.backup(count)
    }

    pub(crate) fn check_progress(&mut self) -> Result<(), ScanError> {
        self.cursor.check_progress()
    }

    /// Text from the cursor to the end of input.
    pub(crate) fn remaining_str(&self) -> &str {
        let start = self.offsets[self.position().min(self.len())];
        &self.text[start..]
    }

    /// Match an anchored pattern against the remaining suffix without consuming.
    ///
    /// Patterns must start with `^`; capture offsets are relative to the cursor.
    pub(crate) fn match_prefix<'s>(&'s self, pattern: &Regex) -> Option<Captures<'s>> {
        pattern.captures(self.remaining_str())
    }

    /// Number of code points in the first `byte_len` bytes of the remaining suffix.
    pub(crate) fn char_count(&self, byte_len: usize) -> usize {
        let rest = self.remaining_str();
        rest[..byte_len.min(rest.len())].chars().count()
    }
}

/// Expand tabs and fold `\r\n` / `\r` line endings into `\n`.
fn normalize(input: &str, tab_width: usize) -> String {
    if memchr::memchr2(b'\t', b'\r', input.as_bytes()).is_none() {
        return input.to_string();
    }
    let tab = " ".repeat(tab_width);
    let mut out = String::with_capacity(input.len() + tab_width);
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\t' => out.push_str(&tab),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_and_peek_walk_code_points() {
        let mut scanner = Scanner::new("héllo", 4, 5);
        assert_eq!(scanner.peek(1), Some('h'));
        assert_eq!(scanner.peek(2), Some('é'));
        assert_eq!(scanner.peek(0), None);
        assert_eq!(scanner.consume_one(), Ok('h'));
        assert_eq!(scanner.consume_one(), Ok('é'));
        assert_eq!(scanner.position(), 2);
        assert_eq!(scanner.previous(), Some('é'));
        assert_eq!(scanner.remaining_str(), "llo");
        assert_eq!(scanner.peek(4), None);
    }

    #[test]
    fn consume_one_at_end_is_end_of_input() {
        let mut scanner = Scanner::new("a", 4, 5);
        assert_eq!(scanner.consume_one(), Ok('a'));
        assert_eq!(
            scanner.consume_one(),
            Err(ScanError::EndOfInput { position: 1 })
        );
    }

    #[test]
    fn consume_run_counts_zero_or_more() {
        let mut scanner = Scanner::new("***a", 4, 5);
        assert_eq!(scanner.consume_run('_'), Ok(0));
        assert_eq!(scanner.consume_run('*'), Ok(3));
        assert_eq!(scanner.peek(1), Some('a'));
    }

    #[test]
    fn backup_rejects_moving_before_start() {
        let mut scanner = Scanner::new("ab", 4, 5);
        scanner.advance(1).unwrap();
        assert_eq!(
            scanner.backup(2),
            Err(ScanError::InvalidBacktrack {
                position: 1,
                count: 2
            })
        );
        assert!(matches!(
            scanner.backup(0),
            Err(ScanError::InvalidArgument(_))
        ));
        scanner.backup(1).unwrap();
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn repeated_consumption_of_one_position_trips_the_guard() {
        let mut cursor = Cursor::new(vec!['x', 'y'], 2);
        cursor.consume_one().unwrap();
        cursor.backup(1).unwrap();
        cursor.consume_one().unwrap();
        cursor.backup(1).unwrap();
        assert_eq!(
            cursor.consume_one(),
            Err(ScanError::InfiniteLoop {
                position: 0,
                visits: 3
            })
        );
    }

    #[test]
    fn visit_counts_do_not_saturate_below_large_limits() {
        let mut cursor = Cursor::new(vec!['x'], 300);
        for _ in 0..300 {
            cursor.consume_one().unwrap();
            cursor.backup(1).unwrap();
        }
        assert_eq!(
            cursor.consume_one(),
            Err(ScanError::InfiniteLoop {
                position: 0,
                visits: 301
            })
        );
    }

    #[test]
    fn stalled_steps_trip_the_guard() {
        let mut cursor = Cursor::new(vec!['x'], 2);
        cursor.check_progress().unwrap();
        cursor.check_progress().unwrap();
        cursor.check_progress().unwrap();
        assert!(matches!(
            cursor.check_progress(),
            Err(ScanError::InfiniteLoop { position: 0, .. })
        ));
        cursor.consume_one().unwrap();
        cursor.check_progress().unwrap();
    }

    #[test]
    fn match_prefix_is_anchored_and_does_not_consume() {
        let pattern = Regex::new(r"^b+").unwrap();
        let mut scanner = Scanner::new("abbbc", 4, 5);
        assert!(scanner.match_prefix(&pattern).is_none());
        scanner.advance(1).unwrap();
        let caps = scanner.match_prefix(&pattern).unwrap();
        assert_eq!(&caps[0], "bbb");
        assert_eq!(scanner.position(), 1);
    }

    #[test]
    fn char_count_converts_byte_lengths() {
        let scanner = Scanner::new("ééx", 4, 5);
        assert_eq!(scanner.char_count(4), 2);
    }

    #[test]
    fn tabs_and_carriage_returns_are_normalized() {
        let scanner = Scanner::new("\tfoo\r\nbar\rbaz", 4, 5);
        assert_eq!(scanner.remaining_str(), "    foo\nbar\nbaz");
    }
}
