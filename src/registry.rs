//! Grammar registry
//!
//! The registry owns every registered grammar, resolves lookups
//! through aliases, caches compiled grammars, and carries the renderer
//! configuration. It is the front door for tokenization: explicit
//! language, auto-detected, or markup-preserving block highlighting.

use std::collections::HashMap;
use std::sync::Arc;

use crate::builtin;
use crate::compile::{self, CompiledGrammar};
use crate::config::{Config, ConfigPatch};
use crate::detect;
use crate::error::{HighlightError, Result};
use crate::grammar::Grammar;
use crate::grammar_file;
use crate::render;
use crate::token::Highlight;
use crate::tokenizer;

/// The grammar registry and tokenization entry point
pub struct Registry {
    grammars: HashMap<String, Grammar>,
    compiled: HashMap<String, Arc<CompiledGrammar>>,
    aliases: HashMap<String, String>,
    /// Registration order, for deterministic auto-detection
    order: Vec<String>,
    config: Config,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            grammars: HashMap::new(),
            compiled: HashMap::new(),
            aliases: HashMap::new(),
            order: Vec::new(),
            config: Config::default(),
        }
    }

    /// Create a registry with all builtin grammars registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for grammar in builtin::all_grammars() {
            registry
                .register(grammar)
                .expect("builtin grammar names are unique");
        }
        registry
    }

    /// Register a grammar
    ///
    /// Names and aliases are matched case-insensitively. Registration
    /// is append-only: a name or alias that is already taken fails with
    /// `DuplicateName` and leaves the registry unchanged.
    pub fn register(&mut self, grammar: Grammar) -> Result<()> {
        let name = grammar.name().to_lowercase();
        let aliases: Vec<String> = grammar.aliases().iter().map(|a| a.to_lowercase()).collect();

        for candidate in std::iter::once(&name).chain(aliases.iter()) {
            if self.grammars.contains_key(candidate) || self.aliases.contains_key(candidate) {
                return Err(HighlightError::DuplicateName(candidate.clone()));
            }
        }

        tracing::debug!(language = %name, aliases = ?aliases, "registered grammar");
        for alias in aliases {
            self.aliases.insert(alias, name.clone());
        }
        self.order.push(name.clone());
        self.grammars.insert(name, grammar);
        Ok(())
    }

    /// Register a grammar from a TOML definition document
    pub fn register_toml(&mut self, document: &str) -> Result<()> {
        let grammar = grammar_file::parse(document)?;
        self.register(grammar)
    }

    /// Check whether a name or alias is registered
    pub fn has_language(&self, name: &str) -> bool {
        self.canonical_name(name).is_some()
    }

    /// Registered language identifiers, in registration order
    pub fn list_languages(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Apply a configuration patch
    pub fn configure(&mut self, patch: ConfigPatch) {
        self.config.apply(patch);
    }

    /// The current renderer configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Tokenize with an explicitly named grammar
    ///
    /// Fails with `UnknownLanguage` for unregistered names and with
    /// `IllegalLexeme` when the input trips the grammar's illegal
    /// guard.
    pub fn tokenize(&mut self, language: &str, text: &str) -> Result<Highlight> {
        let compiled = self.compiled(language)?;
        let output = tokenizer::run(self, &compiled, text, false)?;
        let markup = render::render_tokens(&output.tokens, &self.config);
        Ok(Highlight {
            language: Some(compiled.name.clone()),
            relevance: output.relevance,
            tokens: output.tokens,
            markup,
            second_best: None,
        })
    }

    /// Tokenize with the best-matching registered grammar
    ///
    /// Returns the highest-relevance result with the runner-up attached
    /// as `second_best`. `candidates` restricts the search.
    pub fn tokenize_auto(&mut self, text: &str, candidates: Option<&[&str]>) -> Highlight {
        detect::tokenize_auto(self, text, candidates)
    }

    /// Highlight input that may already contain markup
    ///
    /// Existing tags are preserved around the inserted classification
    /// spans; the configured text transforms are applied to the result.
    pub fn highlight_block(&mut self, source: &str, language: Option<&str>) -> Result<Highlight> {
        render::highlight_block(self, source, language)
    }

    /// Resolve a name or alias to its canonical registered name
    pub(crate) fn canonical_name(&self, name: &str) -> Option<String> {
        let lowered = name.to_lowercase();
        if self.grammars.contains_key(&lowered) {
            return Some(lowered);
        }
        self.aliases.get(&lowered).cloned()
    }

    /// Registered names in registration order, owned for iteration
    /// while tokenizing
    pub(crate) fn language_names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Look up a grammar and compile it on first use
    ///
    /// Compilation is cached, so repeated lookups are cheap and
    /// idempotent.
    pub(crate) fn compiled(&mut self, name: &str) -> Result<Arc<CompiledGrammar>> {
        let canonical = self
            .canonical_name(name)
            .ok_or_else(|| HighlightError::UnknownLanguage(name.to_string()))?;
        if let Some(compiled) = self.compiled.get(&canonical) {
            return Ok(Arc::clone(compiled));
        }
        let grammar = self
            .grammars
            .get(&canonical)
            .ok_or_else(|| HighlightError::UnknownLanguage(name.to_string()))?;
        let compiled = Arc::new(compile::compile(grammar)?);
        tracing::debug!(
            language = %canonical,
            modes = compiled.modes.len(),
            "compiled grammar"
        );
        self.compiled.insert(canonical, Arc::clone(&compiled));
        Ok(compiled)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
