//! Token emission helpers.
//!
//! Literal characters accumulate in `pending_text` and are flushed as a single
//! `character` token before any structural token. A soft or hard break at the
//! end of a line is staged, then committed or discarded once the next line's
//! role is known.

use crate::shared::{Token, TokenKind};
use crate::tokenizer::Tokenizer;

impl Tokenizer {
    pub(super) fn emit_token(&mut self, token: Token) {
        self.flush_text();
        self.push_token(token);
    }

    pub(super) fn emit_kind(&mut self, kind: TokenKind) {
        self.emit_token(Token::new(kind));
    }

    pub(super) fn push_text(&mut self, text: &str) {
        self.pending_text.push_str(text);
    }

    pub(super) fn push_char(&mut self, ch: char) {
        self.pending_text.push(ch);
    }

    pub(super) fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending_text);
        self.push_token(Token::with_value(TokenKind::Character, text));
    }

    /// Emit a block separator unless one was just emitted.
    pub(super) fn emit_new_block(&mut self) {
        self.flush_text();
        if self
            .tokens
            .last()
            .is_some_and(|token| token.kind == TokenKind::NewBlock)
        {
            return;
        }
        self.push_token(Token::new(TokenKind::NewBlock));
    }

    pub(super) fn stage_break(&mut self, kind: TokenKind) {
        debug_assert!(matches!(kind, TokenKind::Newline | TokenKind::Linebreak));
        self.flush_text();
        self.staged = Some(Token::new(kind));
    }

    pub(super) fn commit_staged(&mut self) {
        if let Some(token) = self.staged.take() {
            self.push_token(token);
        }
    }

    pub(super) fn discard_staged(&mut self) {
        if let Some(_token) = self.staged.take() {
            #[cfg(any(test, feature = "debug-stats"))]
            log::trace!(target: "markdown.tokenizer", "discard staged token: {_token:?}");
        }
    }

    fn push_token(&mut self, token: Token) {
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "markdown.tokenizer", "emit token: {token:?}");
        self.tokens.push(token);
        self.stats.tokens_emitted = self.stats.tokens_emitted.saturating_add(1);
    }
}
