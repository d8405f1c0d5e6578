//! Declarative grammar definitions
//!
//! A grammar describes a language's lexical structure as a tree of
//! modes. Definitions are built with consuming builder methods and are
//! immutable once registered; reuse across a grammar is expressed as
//! clone-plus-override rather than shared references, and mutually
//! recursive modes (nested objects, nested arrays) go through named
//! definitions resolved at compile time.

use crate::token::TokenType;

/// Keyword classification groups
///
/// Each group maps a classification to a space-separated word list.
/// A word may carry a relevance weight suffix (`"nonlocal|10"`); the
/// default weight is 1.
#[derive(Debug, Clone, Default)]
pub struct Keywords {
    pub(crate) groups: Vec<(TokenType, String)>,
}

impl Keywords {
    /// Create an empty keyword set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a classification group
    pub fn group(mut self, class: TokenType, words: &str) -> Self {
        self.groups.push((class, words.to_string()));
        self
    }

    /// Shorthand for a single `keyword` group
    pub fn keyword(words: &str) -> Self {
        Self::new().group(TokenType::Keyword, words)
    }
}

/// A child entry in a mode's `contains` list
#[derive(Debug, Clone)]
pub enum ModeRef {
    /// A mode defined in place
    Inline(Mode),
    /// A reference to one of the grammar's named definitions
    Named(String),
    /// A reference to the containing mode itself (for direct nesting)
    SelfRef,
}

impl ModeRef {
    /// Reference a named definition
    pub fn named(name: &str) -> Self {
        ModeRef::Named(name.to_string())
    }
}

impl From<Mode> for ModeRef {
    fn from(mode: Mode) -> Self {
        ModeRef::Inline(mode)
    }
}

/// A lexical sub-state within a grammar
///
/// A mode is entered when its begin pattern matches and left when its
/// end pattern matches (or when the parent ends, for
/// `ends_with_parent` modes). While active, its children, keywords,
/// and illegal guard drive tokenization.
#[derive(Debug, Clone, Default)]
pub struct Mode {
    pub(crate) class: Option<TokenType>,
    pub(crate) begin: Option<String>,
    pub(crate) end: Option<String>,
    pub(crate) begin_keywords: Option<String>,
    pub(crate) lexemes: Option<String>,
    pub(crate) keywords: Option<Keywords>,
    pub(crate) illegal: Option<String>,
    pub(crate) contains: Vec<ModeRef>,
    pub(crate) ends_with_parent: bool,
    pub(crate) ends_parent: bool,
    pub(crate) exclude_begin: bool,
    pub(crate) exclude_end: bool,
    pub(crate) return_begin: bool,
    pub(crate) return_end: bool,
    pub(crate) skip: bool,
    pub(crate) relevance: Option<u32>,
    pub(crate) sub_language: Option<String>,
}

impl Mode {
    /// Create an empty mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the classification for text matched by this mode
    pub fn class(mut self, class: TokenType) -> Self {
        self.class = Some(class);
        self
    }

    /// Set the begin pattern
    pub fn begin(mut self, pattern: &str) -> Self {
        self.begin = Some(pattern.to_string());
        self
    }

    /// Set the end pattern
    pub fn end(mut self, pattern: &str) -> Self {
        self.end = Some(pattern.to_string());
        self
    }

    /// Begin on any of the given keywords, which also populate the
    /// mode's keyword table
    pub fn begin_keywords(mut self, words: &str) -> Self {
        self.begin_keywords = Some(words.to_string());
        self
    }

    /// Set the lexeme pattern used by keyword matching (default `\w+`)
    pub fn lexemes(mut self, pattern: &str) -> Self {
        self.lexemes = Some(pattern.to_string());
        self
    }

    /// Set the keyword classification groups
    pub fn keywords(mut self, keywords: Keywords) -> Self {
        self.keywords = Some(keywords);
        self
    }

    /// Set the illegal-pattern guard
    pub fn illegal(mut self, pattern: &str) -> Self {
        self.illegal = Some(pattern.to_string());
        self
    }

    /// Set the child modes
    pub fn contains(mut self, children: Vec<ModeRef>) -> Self {
        self.contains = children;
        self
    }

    /// End this mode when its parent ends
    pub fn ends_with_parent(mut self) -> Self {
        self.ends_with_parent = true;
        self
    }

    /// Ending this mode also ends its parent
    pub fn ends_parent(mut self) -> Self {
        self.ends_parent = true;
        self
    }

    /// Leave the begin match in the surrounding mode's text
    pub fn exclude_begin(mut self) -> Self {
        self.exclude_begin = true;
        self
    }

    /// Leave the end match in the surrounding mode's text
    pub fn exclude_end(mut self) -> Self {
        self.exclude_end = true;
        self
    }

    /// Do not consume the begin match; re-scan it inside this mode
    pub fn return_begin(mut self) -> Self {
        self.return_begin = true;
        self
    }

    /// Do not consume the end match; re-scan it in the parent
    pub fn return_end(mut self) -> Self {
        self.return_end = true;
        self
    }

    /// Fold this mode's text into the surrounding buffer unclassified
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Set the relevance weight added when this mode ends (default 1)
    pub fn relevance(mut self, weight: u32) -> Self {
        self.relevance = Some(weight);
        self
    }

    /// Delegate this mode's text to another grammar
    pub fn sub_language(mut self, name: &str) -> Self {
        self.sub_language = Some(name.to_string());
        self
    }
}

/// A complete language grammar
///
/// The grammar's own keyword/contains/illegal fields form the root
/// mode of the compiled tree.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) case_insensitive: bool,
    pub(crate) defs: Vec<(String, Mode)>,
    pub(crate) root: Mode,
}

impl Grammar {
    /// Create a new grammar with the given identifier
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            case_insensitive: false,
            defs: Vec::new(),
            root: Mode::new(),
        }
    }

    /// The grammar's identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The grammar's alias list
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Add lookup aliases
    pub fn alias(mut self, names: &[&str]) -> Self {
        self.aliases.extend(names.iter().map(|n| n.to_string()));
        self
    }

    /// Match patterns and keywords case-insensitively
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// Set the root illegal-pattern guard
    pub fn illegal(mut self, pattern: &str) -> Self {
        self.root.illegal = Some(pattern.to_string());
        self
    }

    /// Set the root lexeme pattern
    pub fn lexemes(mut self, pattern: &str) -> Self {
        self.root.lexemes = Some(pattern.to_string());
        self
    }

    /// Set the root keyword groups
    pub fn keywords(mut self, keywords: Keywords) -> Self {
        self.root.keywords = Some(keywords);
        self
    }

    /// Set the root child modes
    pub fn contains(mut self, children: Vec<ModeRef>) -> Self {
        self.root.contains = children;
        self
    }

    /// Add a named mode definition for use with [`ModeRef::named`]
    pub fn define(mut self, name: &str, mode: Mode) -> Self {
        self.defs.push((name.to_string(), mode));
        self
    }
}
