//! Inline states: paragraph text, code spans and link text.

use crate::shared::{Error, Token, TokenKind};
use crate::tokenizer::states::{LineKind, TokenizerState};
use crate::tokenizer::{LinkTail, Step, Tokenizer};

/// Longest emphasis marker run taken at once; the rest is rescanned.
const MAX_MARKER_RUN: usize = 2;

impl Tokenizer {
    pub(super) fn step_in_text(&mut self) -> Result<Step, Error> {
        let Some(ch) = self.scanner.peek(1) else {
            return Ok(Step::Done);
        };
        match ch {
            '\n' => {
                self.scanner.consume_one()?;
                self.end_line(false);
            }
            ' ' => self.consume_spaces()?,
            '\\' => self.consume_escape()?,
            '`' => self.consume_backticks()?,
            '!' => self.consume_image()?,
            '[' => self.consume_link()?,
            '*' | '_' => self.consume_emphasis(ch)?,
            _ => {
                self.scanner.consume_one()?;
                self.push_char(ch);
            }
        }
        Ok(Step::Progress)
    }

    pub(super) fn step_in_code(&mut self) -> Result<Step, Error> {
        let Some(ch) = self.scanner.peek(1) else {
            return Ok(Step::Done);
        };
        match ch {
            '`' => {
                let run = self.scanner.consume_run('`')?;
                if run == self.code_fence {
                    self.emit_kind(TokenKind::CloseCode);
                    self.code_fence = 0;
                    self.transition_to(TokenizerState::InText);
                } else {
                    self.push_text(&"`".repeat(run));
                }
            }
            '\n' => {
                self.scanner.consume_one()?;
                self.push_char(' ');
            }
            _ => {
                self.scanner.consume_one()?;
                self.push_char(ch);
            }
        }
        Ok(Step::Progress)
    }

    pub(super) fn step_link_text(&mut self) -> Result<Step, Error> {
        let Some(text_end) = self.link.as_ref().map(|link| link.text_end) else {
            return Err(self.invalid_state());
        };
        if self.scanner.position() >= text_end {
            return self.close_link();
        }
        let Some(ch) = self.scanner.peek(1) else {
            return Err(self.invalid_state());
        };
        // Link text is literal apart from escapes.
        if ch == '\\' {
            self.consume_escape()?;
        } else {
            self.scanner.consume_one()?;
            self.push_char(ch);
        }
        Ok(Step::Progress)
    }

    fn close_link(&mut self) -> Result<Step, Error> {
        let Some(LinkTail {
            resume, url, title, ..
        }) = self.link.take()
        else {
            return Err(self.invalid_state());
        };
        let skip = resume.saturating_sub(self.scanner.position());
        self.scanner.advance(skip)?;
        self.emit_token(Token::with_value(TokenKind::LinkUrl, url));
        if let Some(title) = title {
            self.emit_token(Token::with_value(TokenKind::LinkTitle, title));
        }
        self.emit_kind(TokenKind::EndLink);
        self.transition_to(TokenizerState::InText);
        Ok(Step::Progress)
    }

    /// Stage the break that ends a line and return to `LineStart`.
    fn end_line(&mut self, hard: bool) {
        if self.line == LineKind::Header {
            self.emit_new_block();
            self.blocks.block_start = true;
        } else if hard {
            self.stage_break(TokenKind::Linebreak);
        } else {
            self.stage_break(TokenKind::Newline);
        }
        self.line = LineKind::Text;
        self.transition_to(TokenizerState::LineStart);
    }

    fn consume_spaces(&mut self) -> Result<(), Error> {
        let count = self.scanner.consume_run(' ')?;
        match self.scanner.peek(1) {
            Some('\n') => {
                self.scanner.consume_one()?;
                self.end_line(count >= 2);
            }
            // Trailing spaces at the end of input are dropped.
            None => {}
            Some(_) => self.push_text(&" ".repeat(count)),
        }
        Ok(())
    }

    fn consume_escape(&mut self) -> Result<(), Error> {
        self.scanner.consume_one()?;
        let at_link_end = self
            .link
            .as_ref()
            .is_some_and(|link| link.text_end == self.scanner.position());
        if self.scanner.is_at_end() || at_link_end {
            self.push_char('\\');
            return Ok(());
        }
        let escaped = self.scanner.consume_one()?;
        if escaped == '\n' {
            self.scanner.backup(1)?;
            self.push_char('\\');
        } else {
            self.push_char(escaped);
        }
        Ok(())
    }

    fn consume_backticks(&mut self) -> Result<(), Error> {
        let width = self.scanner.consume_run('`')?;
        if self.has_code_close(width) {
            self.emit_token(Token::with_value(TokenKind::StartCode, "`".repeat(width)));
            self.code_fence = width;
            self.transition_to(TokenizerState::InCode);
        } else {
            self.push_text(&"`".repeat(width));
        }
        Ok(())
    }

    fn consume_image(&mut self) -> Result<(), Error> {
        let Some(image) = self.match_image() else {
            self.scanner.consume_one()?;
            self.push_char('!');
            return Ok(());
        };
        self.scanner.advance(image.len)?;
        self.emit_kind(TokenKind::StartImage);
        if !image.alt.is_empty() {
            self.emit_token(Token::with_value(TokenKind::ImageAlt, image.alt));
        }
        self.emit_token(Token::with_value(TokenKind::ImageUrl, image.url));
        if let Some(title) = image.title {
            self.emit_token(Token::with_value(TokenKind::ImageTitle, title));
        }
        self.emit_kind(TokenKind::EndImage);
        Ok(())
    }

    fn consume_link(&mut self) -> Result<(), Error> {
        let found = self.match_link();
        self.scanner.consume_one()?;
        let Some(link) = found else {
            self.push_char('[');
            return Ok(());
        };
        let start = self.scanner.position() - 1;
        self.link = Some(LinkTail {
            text_end: self.scanner.position() + link.text_len,
            resume: start + link.len,
            url: link.url,
            title: link.title,
        });
        self.emit_kind(TokenKind::StartLink);
        self.transition_to(TokenizerState::LinkText);
        Ok(())
    }

    /// Classify a `*`/`_` run by its neighbours.
    ///
    /// Whitespace on both sides is literal; whitespace only after closes;
    /// whitespace only before opens; otherwise the tree builder toggles.
    fn consume_emphasis(&mut self, marker: char) -> Result<(), Error> {
        let before = self.scanner.previous();
        let count = self.run_length(marker, MAX_MARKER_RUN);
        self.scanner.advance(count)?;
        let after = self.scanner.peek(1);
        let text = marker.to_string().repeat(count);

        let left_space = before.is_none_or(char::is_whitespace);
        let right_space = after.is_none_or(char::is_whitespace);
        let strong = count == MAX_MARKER_RUN;
        let kind = match (left_space, right_space) {
            (true, true) => {
                self.push_text(&text);
                return Ok(());
            }
            (false, true) if strong => TokenKind::EndStrong,
            (false, true) => TokenKind::EndEm,
            (true, false) if strong => TokenKind::StartStrong,
            (true, false) => TokenKind::StartEm,
            (false, false) if strong => TokenKind::ToggleStrong,
            (false, false) => TokenKind::ToggleEm,
        };
        self.emit_token(Token::with_value(kind, text));
        Ok(())
    }
}
