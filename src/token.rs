//! Token types for syntax highlighting
//!
//! This module defines the classification labels that can be attached
//! to spans of input text, the token itself, and the result of a
//! tokenization run.

/// Classification labels for highlighted spans
///
/// Each label corresponds to a styling class in the rendered markup
/// (`keyword` becomes `hljs-keyword` under the default class prefix).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// Language keywords (if, else, def, etc.)
    Keyword,
    /// Built-in names (functions, objects provided by the language)
    BuiltIn,
    /// Literal words (true, false, null, on, off)
    Literal,
    /// Numeric literals
    Number,
    /// String literals
    String,
    /// Comments
    Comment,
    /// Documentation tags inside comments (TODO, FIXME, ...)
    Doctag,
    /// Meta directives (shebangs, doctypes, decorators)
    Meta,
    /// Section headings (ini sections, markdown headings)
    Section,
    /// Attribute names in key/value syntax
    Attr,
    /// Attribute names in declaration syntax
    Attribute,
    /// Variables and interpolations
    Variable,
    /// Names of declared entities (function or class being defined)
    Title,
    /// Parameter lists
    Params,
    /// Function declarations
    Function,
    /// Class declarations
    Class,
    /// Interpolated substitutions inside strings
    Subst,
    /// Symbols and link references
    Symbol,
    /// List bullets
    Bullet,
    /// Strong emphasis
    Strong,
    /// Emphasis
    Emphasis,
    /// Block quotes
    Quote,
    /// Code spans and blocks
    Code,
    /// Hyperlinks
    Link,
    /// Tag names
    Name,
    /// Markup tags
    Tag,
    /// Added lines in diffs
    Addition,
    /// Removed lines in diffs
    Deletion,
}

impl TokenType {
    /// Get the styling class suffix for this token type
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::Keyword => "keyword",
            TokenType::BuiltIn => "built_in",
            TokenType::Literal => "literal",
            TokenType::Number => "number",
            TokenType::String => "string",
            TokenType::Comment => "comment",
            TokenType::Doctag => "doctag",
            TokenType::Meta => "meta",
            TokenType::Section => "section",
            TokenType::Attr => "attr",
            TokenType::Attribute => "attribute",
            TokenType::Variable => "variable",
            TokenType::Title => "title",
            TokenType::Params => "params",
            TokenType::Function => "function",
            TokenType::Class => "class",
            TokenType::Subst => "subst",
            TokenType::Symbol => "symbol",
            TokenType::Bullet => "bullet",
            TokenType::Strong => "strong",
            TokenType::Emphasis => "emphasis",
            TokenType::Quote => "quote",
            TokenType::Code => "code",
            TokenType::Link => "link",
            TokenType::Name => "name",
            TokenType::Tag => "tag",
            TokenType::Addition => "addition",
            TokenType::Deletion => "deletion",
        }
    }

    /// Parse a token type from its class suffix (for TOML grammar documents)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "keyword" => Some(TokenType::Keyword),
            "built_in" => Some(TokenType::BuiltIn),
            "literal" => Some(TokenType::Literal),
            "number" => Some(TokenType::Number),
            "string" => Some(TokenType::String),
            "comment" => Some(TokenType::Comment),
            "doctag" => Some(TokenType::Doctag),
            "meta" => Some(TokenType::Meta),
            "section" => Some(TokenType::Section),
            "attr" => Some(TokenType::Attr),
            "attribute" => Some(TokenType::Attribute),
            "variable" => Some(TokenType::Variable),
            "title" => Some(TokenType::Title),
            "params" => Some(TokenType::Params),
            "function" => Some(TokenType::Function),
            "class" => Some(TokenType::Class),
            "subst" => Some(TokenType::Subst),
            "symbol" => Some(TokenType::Symbol),
            "bullet" => Some(TokenType::Bullet),
            "strong" => Some(TokenType::Strong),
            "emphasis" => Some(TokenType::Emphasis),
            "quote" => Some(TokenType::Quote),
            "code" => Some(TokenType::Code),
            "link" => Some(TokenType::Link),
            "name" => Some(TokenType::Name),
            "tag" => Some(TokenType::Tag),
            "addition" => Some(TokenType::Addition),
            "deletion" => Some(TokenType::Deletion),
            _ => None,
        }
    }
}

/// A classified span of input text
///
/// Spans are emitted in strictly increasing offset order and never
/// overlap; concatenating the `text` of every token reproduces the
/// input exactly. Unclassified runs carry `kind: None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Classification, or `None` for plain text
    pub kind: Option<TokenType>,
    /// The literal text of the span
    pub text: String,
    /// Byte offset where this span starts (inclusive)
    pub start: usize,
    /// Byte offset where this span ends (exclusive)
    pub end: usize,
}

impl Token {
    /// Length of this token in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the token is empty
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// The result of a tokenization run
#[derive(Debug, Clone)]
pub struct Highlight {
    /// The grammar that produced this result (`None` when auto-detection
    /// found no scoring candidate)
    pub language: Option<String>,
    /// Accumulated relevance score
    pub relevance: u32,
    /// The classified token stream
    pub tokens: Vec<Token>,
    /// Rendered markup for the token stream
    pub markup: String,
    /// Runner-up candidate from auto-detection
    pub second_best: Option<Box<Highlight>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_roundtrip() {
        let types = [
            TokenType::Keyword,
            TokenType::BuiltIn,
            TokenType::Section,
            TokenType::Attr,
            TokenType::Deletion,
        ];
        for token_type in types {
            assert_eq!(TokenType::from_name(token_type.name()), Some(token_type));
        }
    }

    #[test]
    fn test_from_name_invalid() {
        assert_eq!(TokenType::from_name("not-a-class"), None);
        assert_eq!(TokenType::from_name(""), None);
    }

    #[test]
    fn test_token_len() {
        let token = Token {
            kind: None,
            text: "abc".to_string(),
            start: 2,
            end: 5,
        };
        assert_eq!(token.len(), 3);
        assert!(!token.is_empty());
    }
}
