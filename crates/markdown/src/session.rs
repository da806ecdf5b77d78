//! Library entry point.
//!
//! `Markdown` owns the input text and runs the full pipeline on demand:
//! tokenize, build the tree, serialize. Each call runs from scratch; nothing is
//! cached between calls.

use crate::dom::Document;
use crate::serialize::to_html;
use crate::shared::{Counters, Error, Token};
use crate::tokenizer::{Tokenizer, TokenizerConfig};
use crate::tree_builder::{TreeBuilder, TreeBuilderConfig};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Caller-supplied options. No option is recognized yet, so only an empty map
/// is accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Options(BTreeMap<String, String>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl FromIterator<(String, String)> for Options {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// HTML output together with the counters collected while producing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversion {
    pub html: String,
    pub counters: Counters,
}

#[derive(Clone, Debug)]
pub struct Markdown {
    text: String,
    tokenizer_config: TokenizerConfig,
    tree_builder_config: TreeBuilderConfig,
}

impl Markdown {
    /// Any non-empty `options` fails with `UnsupportedConfiguration`.
    pub fn new(text: impl Into<String>, options: Option<&Options>) -> Result<Self, Error> {
        if let Some((key, _)) = options.and_then(|options| options.iter().next()) {
            log::error!(target: "markdown.session", "rejecting option {key:?}");
            return Err(Error::UnsupportedConfiguration(key.to_string()));
        }
        Ok(Self::with_config(
            text,
            TokenizerConfig::default(),
            TreeBuilderConfig::default(),
        ))
    }

    pub fn with_config(
        text: impl Into<String>,
        tokenizer_config: TokenizerConfig,
        tree_builder_config: TreeBuilderConfig,
    ) -> Self {
        Self {
            text: text.into(),
            tokenizer_config,
            tree_builder_config,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> Result<Vec<Token>, Error> {
        let mut tokenizer = Tokenizer::new(&self.text, self.tokenizer_config.clone());
        tokenizer.run()?;
        Ok(tokenizer.into_tokens())
    }

    pub fn document(&self) -> Result<Document, Error> {
        let mut builder = TreeBuilder::new(self.tree_builder_config.clone());
        builder.run(self.tokens()?)?;
        Ok(builder.into_document())
    }

    pub fn to_html(&self) -> Result<String, Error> {
        self.convert().map(|conversion| conversion.html)
    }

    /// Run the whole pipeline and report what it did.
    pub fn convert(&self) -> Result<Conversion, Error> {
        let mut tokenizer = Tokenizer::new(&self.text, self.tokenizer_config.clone());
        tokenizer.run()?;
        let tokens_emitted = tokenizer.stats().tokens_emitted;
        let tokens = tokenizer.into_tokens();
        let token_count = tokens.len();

        let mut builder = TreeBuilder::new(self.tree_builder_config.clone());
        builder.run(tokens)?;
        let stats = builder.stats();
        let document = builder.into_document();

        let counters = Counters {
            tokens_emitted,
            nodes_created: document.arena_len().saturating_sub(1) as u64,
            nodes_pruned: stats.nodes_pruned,
            max_open_depth: stats.max_open_depth,
        };
        log::debug!(
            target: "markdown.session",
            "converted {} bytes: {token_count} tokens, {} nodes ({} pruned), depth {}",
            self.text.len(),
            counters.nodes_created,
            counters.nodes_pruned,
            counters.max_open_depth
        );
        Ok(Conversion {
            html: to_html(&document),
            counters,
        })
    }
}
