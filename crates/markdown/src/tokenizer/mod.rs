//! Markdown tokenizer public API.
//!
//! The tokenizer is an explicit state machine over code points. It runs once
//! over a complete in-memory string and produces the ordered token list consumed
//! by the tree builder.
//!
//! Invariants:
//! - Totality: every input string tokenizes; syntax that does not match a
//!   construct degrades to `character` tokens.
//! - Lookahead first: links, images, code spans, rules and list markers are
//!   matched against the remaining suffix before any character is consumed.
//! - Line-end breaks are staged and only reach the token list when the next
//!   line continues the same paragraph.

use crate::shared::{Error, Scanner, Token, TokenKind};
use states::{LineKind, TokenizerState};

mod emit;
mod inline;
mod input;
mod states;
mod token_fmt;

pub use token_fmt::{TokenTestFormatExt, format_tokens};

/// Configuration for the tokenizer.
#[derive(Clone, Debug)]
pub struct TokenizerConfig {
    /// Spaces substituted for each tab before scanning.
    pub tab_width: usize,
    /// Maximum revisits of one input position before aborting.
    pub loop_guard_limit: u32,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            loop_guard_limit: 5,
        }
    }
}

/// Minimal tokenizer instrumentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenizerStats {
    pub steps: u64,
    pub state_transitions: u64,
    pub tokens_emitted: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Progress,
    Done,
}

/// Block-level context carried from one line to the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BlockContext {
    seen_content: bool,
    /// A blank-line run separates the previous content line from the next one.
    pending_blank: bool,
    /// Start of input, or the previous line was a header or a rule.
    block_start: bool,
    in_list: bool,
    /// The next list marker starts a loose item (`ulParagraph`/`olParagraph`).
    loose_item: bool,
    quote_depth: usize,
}

impl Default for BlockContext {
    fn default() -> Self {
        Self {
            seen_content: false,
            pending_blank: false,
            block_start: true,
            in_list: false,
            loose_item: false,
            quote_depth: 0,
        }
    }
}

/// Indentation and quote markers consumed at the start of a line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct LinePrefix {
    indent: usize,
    quote_level: usize,
}

/// The remainder of a link whose bracketed text is being tokenized.
#[derive(Clone, Debug, PartialEq, Eq)]
struct LinkTail {
    text_end: usize,
    resume: usize,
    url: String,
    title: Option<String>,
}

/// Markdown tokenizer.
pub struct Tokenizer {
    config: TokenizerConfig,
    state: TokenizerState,
    scanner: Scanner,
    tokens: Vec<Token>,
    pending_text: String,
    staged: Option<Token>,
    blocks: BlockContext,
    line: LineKind,
    code_fence: usize,
    link: Option<LinkTail>,
    stats: TokenizerStats,
}

impl Tokenizer {
    pub fn new(input: &str, config: TokenizerConfig) -> Self {
        let scanner = Scanner::new(input, config.tab_width, config.loop_guard_limit);
        Self {
            config,
            state: TokenizerState::LineStart,
            scanner,
            tokens: Vec::new(),
            pending_text: String::new(),
            staged: None,
            blocks: BlockContext::default(),
            line: LineKind::Text,
            code_fence: 0,
            link: None,
            stats: TokenizerStats::default(),
        }
    }

    /// Run the state machine to the end of input.
    pub fn run(&mut self) -> Result<(), Error> {
        loop {
            self.scanner.check_progress()?;
            self.stats.steps = self.stats.steps.saturating_add(1);
            match self.step()? {
                Step::Progress => {}
                Step::Done => break,
            }
        }
        self.finish();
        Ok(())
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Return a copy of current instrumentation counters.
    pub fn stats(&self) -> TokenizerStats {
        self.stats
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    fn finish(&mut self) {
        self.flush_text();
        self.discard_staged();
    }

    fn transition_to(&mut self, next: TokenizerState) {
        if self.state == next {
            return;
        }
        #[cfg(any(test, feature = "debug-stats"))]
        {
            log::trace!(
                target: "markdown.tokenizer",
                "state {:?} -> {:?} @{}",
                self.state,
                next,
                self.scanner.position()
            );
        }
        self.state = next;
        self.stats.state_transitions = self.stats.state_transitions.saturating_add(1);
    }

    fn step(&mut self) -> Result<Step, Error> {
        match self.state {
            TokenizerState::LineStart => self.step_line_start(),
            TokenizerState::AtxHeader => self.step_atx_header(),
            TokenizerState::ListBullet => self.step_list_bullet(),
            TokenizerState::ListOrdered => self.step_list_ordered(),
            TokenizerState::InText => self.step_in_text(),
            TokenizerState::InCode => self.step_in_code(),
            TokenizerState::LinkText => self.step_link_text(),
        }
    }

    fn step_line_start(&mut self) -> Result<Step, Error> {
        if self.scanner.is_at_end() {
            return Ok(Step::Done);
        }
        if let Some(len) = self.match_blank_line() {
            self.scanner.advance(len)?;
            self.end_blank_line();
            return Ok(Step::Progress);
        }

        let prefix = self.consume_line_prefix()?;
        if prefix.quote_level > 0 && matches!(self.scanner.peek(1), None | Some('\n')) {
            // A line of bare quote markers separates blocks like a blank line.
            if !self.scanner.is_at_end() {
                self.scanner.consume_one()?;
            }
            self.end_blank_line();
            return Ok(Step::Progress);
        }

        let kind = self.classify_line(prefix);
        self.open_line(prefix, kind);
        self.line = kind;
        match kind {
            LineKind::Rule => {
                if let Some(len) = self.match_rule() {
                    self.scanner.advance(len)?;
                }
                self.emit_kind(TokenKind::Rule);
                self.blocks.block_start = true;
                self.line = LineKind::Text;
            }
            LineKind::Header => self.transition_to(TokenizerState::AtxHeader),
            LineKind::Bullet => self.transition_to(TokenizerState::ListBullet),
            LineKind::Ordered => self.transition_to(TokenizerState::ListOrdered),
            LineKind::Text => self.transition_to(TokenizerState::InText),
        }
        Ok(Step::Progress)
    }

    fn end_blank_line(&mut self) {
        self.discard_staged();
        if self.blocks.seen_content {
            self.blocks.pending_blank = true;
        }
    }

    /// Consume leading spaces and `>` markers.
    ///
    /// Inside a quote, one space after the last marker belongs to the marker and
    /// the rest is indentation.
    fn consume_line_prefix(&mut self) -> Result<LinePrefix, Error> {
        let mut prefix = LinePrefix {
            indent: self.scanner.consume_run(' ')?,
            quote_level: 0,
        };
        while self.scanner.peek(1) == Some('>') {
            self.scanner.consume_one()?;
            prefix.quote_level += 1;
            let spaces = self.scanner.consume_run(' ')?;
            prefix.indent = spaces.saturating_sub(1);
        }
        Ok(prefix)
    }

    fn classify_line(&self, prefix: LinePrefix) -> LineKind {
        let blocks = self.blocks;
        if self.match_rule().is_some() {
            return LineKind::Rule;
        }
        if self.match_header_prefix().is_some() {
            return LineKind::Header;
        }
        let list_allowed = blocks.pending_blank
            || blocks.block_start
            || blocks.in_list
            || prefix.quote_level != blocks.quote_depth;
        if list_allowed && self.match_bullet() {
            return LineKind::Bullet;
        }
        if list_allowed && self.match_ordered() {
            return LineKind::Ordered;
        }
        LineKind::Text
    }

    /// Emit the block-context tokens that precede a content line.
    fn open_line(&mut self, prefix: LinePrefix, kind: LineKind) {
        let blocks = self.blocks;
        let lazy = prefix.quote_level == 0
            && blocks.quote_depth > 0
            && !blocks.pending_blank
            && kind == LineKind::Text;
        let quote_level = if lazy {
            blocks.quote_depth
        } else {
            prefix.quote_level
        };

        if !blocks.pending_blank && kind == LineKind::Text && quote_level == blocks.quote_depth
        {
            self.commit_staged();
        } else {
            self.discard_staged();
        }

        let mut in_list = blocks.in_list;
        if quote_level == 0 && blocks.quote_depth > 0 {
            self.emit_kind(TokenKind::EndBlockquotes);
            in_list = false;
        } else if blocks.pending_blank {
            if in_list && !(kind.is_list_item() || prefix.indent >= 4) {
                self.emit_kind(TokenKind::EndBlock);
                in_list = false;
            } else {
                self.emit_new_block();
            }
        }

        if prefix.quote_level > 0 {
            for _ in 0..prefix.quote_level {
                self.emit_kind(TokenKind::StartBlockquote);
            }
        }

        if in_list && matches!(kind, LineKind::Header | LineKind::Rule) {
            self.emit_kind(TokenKind::EndBlock);
            in_list = false;
        }

        let continuation = blocks.pending_blank && kind == LineKind::Text;
        if in_list && (kind.is_list_item() || continuation) {
            for _ in 0..prefix.indent / 4 {
                self.emit_kind(TokenKind::Indent);
            }
        }

        self.blocks = BlockContext {
            seen_content: true,
            pending_blank: false,
            block_start: false,
            in_list: in_list || kind.is_list_item(),
            loose_item: in_list && blocks.pending_blank,
            quote_depth: quote_level,
        };
    }

    fn step_atx_header(&mut self) -> Result<Step, Error> {
        let Some(prefix) = self.match_header_prefix() else {
            return Err(self.invalid_state());
        };
        self.scanner.advance(prefix.len)?;
        self.emit_token(Token::with_value(
            TokenKind::AtxHeader,
            prefix.level.to_string(),
        ));
        self.transition_to(TokenizerState::InText);
        Ok(Step::Progress)
    }

    fn step_list_bullet(&mut self) -> Result<Step, Error> {
        let marker = self.scanner.consume_one()?;
        self.scanner.consume_run(' ')?;
        let kind = if self.blocks.loose_item {
            TokenKind::UlParagraph
        } else {
            TokenKind::Ul
        };
        self.emit_token(Token::with_value(kind, marker.to_string()));
        self.transition_to(TokenizerState::InText);
        Ok(Step::Progress)
    }

    fn step_list_ordered(&mut self) -> Result<Step, Error> {
        let mut number = String::new();
        while let Some(ch) = self.scanner.peek(1).filter(char::is_ascii_digit) {
            self.scanner.consume_one()?;
            number.push(ch);
        }
        if self.scanner.consume_one()? != '.' {
            return Err(self.invalid_state());
        }
        self.scanner.consume_run(' ')?;
        let kind = if self.blocks.loose_item {
            TokenKind::OlParagraph
        } else {
            TokenKind::Ol
        };
        self.emit_token(Token::with_value(kind, number));
        self.transition_to(TokenizerState::InText);
        Ok(Step::Progress)
    }

    fn invalid_state(&self) -> Error {
        let found = self
            .scanner
            .peek(1)
            .map_or_else(|| "end of input".to_string(), |ch| format!("{ch:?}"));
        log::error!(
            target: "markdown.tokenizer",
            "no rule for {found} in {:?} @{}",
            self.state,
            self.scanner.position()
        );
        Error::InvalidState {
            state: self.state.name(),
            token: found,
        }
    }
}

/// Tokenize `input` with the default configuration.
pub fn tokenize(input: &str) -> Result<Vec<Token>, Error> {
    let mut tokenizer = Tokenizer::new(input, TokenizerConfig::default());
    tokenizer.run()?;
    Ok(tokenizer.into_tokens())
}
