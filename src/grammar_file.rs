//! TOML grammar documents
//!
//! Grammars can be defined declaratively in TOML and registered with
//! [`crate::Registry::register_toml`]. The document mirrors the
//! builder API field-for-field:
//!
//! ```toml
//! name = "shouting"
//! aliases = ["loud"]
//! case_insensitive = true
//!
//! [keywords]
//! keyword = "stop go"
//!
//! [[contains]]
//! class = "string"
//! begin = '"'
//! end = '"'
//! ```
//!
//! Child modes nest through `contains`; `reference = "name"` points at
//! a `[define.name]` table (or `"self"` for direct nesting) instead of
//! an inline definition.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{HighlightError, Result};
use crate::grammar::{Grammar, Keywords, Mode, ModeRef};
use crate::token::TokenType;

#[derive(Deserialize)]
struct GrammarDoc {
    name: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    case_insensitive: bool,
    illegal: Option<String>,
    lexemes: Option<String>,
    #[serde(default)]
    keywords: HashMap<String, String>,
    #[serde(default)]
    contains: Vec<ModeDoc>,
    #[serde(default)]
    define: HashMap<String, ModeDoc>,
}

#[derive(Deserialize)]
struct ModeDoc {
    reference: Option<String>,
    class: Option<String>,
    begin: Option<String>,
    end: Option<String>,
    begin_keywords: Option<String>,
    lexemes: Option<String>,
    illegal: Option<String>,
    #[serde(default)]
    keywords: HashMap<String, String>,
    #[serde(default)]
    contains: Vec<ModeDoc>,
    #[serde(default)]
    ends_with_parent: bool,
    #[serde(default)]
    ends_parent: bool,
    #[serde(default)]
    exclude_begin: bool,
    #[serde(default)]
    exclude_end: bool,
    #[serde(default)]
    return_begin: bool,
    #[serde(default)]
    return_end: bool,
    #[serde(default)]
    skip: bool,
    relevance: Option<u32>,
    sub_language: Option<String>,
}

/// Parse a TOML grammar document into a grammar definition
pub(crate) fn parse(document: &str) -> Result<Grammar> {
    let doc: GrammarDoc = toml::from_str(document)?;

    let alias_refs: Vec<&str> = doc.aliases.iter().map(String::as_str).collect();
    let mut grammar = Grammar::new(&doc.name).alias(&alias_refs);
    if doc.case_insensitive {
        grammar = grammar.case_insensitive();
    }
    if let Some(pattern) = &doc.illegal {
        grammar = grammar.illegal(pattern);
    }
    if let Some(pattern) = &doc.lexemes {
        grammar = grammar.lexemes(pattern);
    }
    if !doc.keywords.is_empty() {
        grammar = grammar.keywords(build_keywords(&doc.name, &doc.keywords)?);
    }

    // Named definitions first, so references resolve no matter where
    // they appear.
    let mut defs: Vec<(&String, &ModeDoc)> = doc.define.iter().collect();
    defs.sort_by_key(|(name, _)| name.as_str());
    for (def_name, def) in defs {
        grammar = grammar.define(def_name, build_mode(&doc.name, def)?);
    }

    let mut children = Vec::new();
    for child in &doc.contains {
        children.push(build_mode_ref(&doc.name, child)?);
    }
    Ok(grammar.contains(children))
}

fn build_mode_ref(grammar_name: &str, doc: &ModeDoc) -> Result<ModeRef> {
    if let Some(reference) = &doc.reference {
        if reference == "self" {
            return Ok(ModeRef::SelfRef);
        }
        return Ok(ModeRef::named(reference));
    }
    Ok(ModeRef::Inline(build_mode(grammar_name, doc)?))
}

fn build_mode(grammar_name: &str, doc: &ModeDoc) -> Result<Mode> {
    let mut mode = Mode::new();
    if let Some(class) = &doc.class {
        mode = mode.class(parse_class(grammar_name, class)?);
    }
    if let Some(pattern) = &doc.begin {
        mode = mode.begin(pattern);
    }
    if let Some(pattern) = &doc.end {
        mode = mode.end(pattern);
    }
    if let Some(words) = &doc.begin_keywords {
        mode = mode.begin_keywords(words);
    }
    if let Some(pattern) = &doc.lexemes {
        mode = mode.lexemes(pattern);
    }
    if let Some(pattern) = &doc.illegal {
        mode = mode.illegal(pattern);
    }
    if !doc.keywords.is_empty() {
        mode = mode.keywords(build_keywords(grammar_name, &doc.keywords)?);
    }
    if doc.ends_with_parent {
        mode = mode.ends_with_parent();
    }
    if doc.ends_parent {
        mode = mode.ends_parent();
    }
    if doc.exclude_begin {
        mode = mode.exclude_begin();
    }
    if doc.exclude_end {
        mode = mode.exclude_end();
    }
    if doc.return_begin {
        mode = mode.return_begin();
    }
    if doc.return_end {
        mode = mode.return_end();
    }
    if doc.skip {
        mode = mode.skip();
    }
    if let Some(weight) = doc.relevance {
        mode = mode.relevance(weight);
    }
    if let Some(delegate) = &doc.sub_language {
        mode = mode.sub_language(delegate);
    }

    let mut children = Vec::new();
    for child in &doc.contains {
        children.push(build_mode_ref(grammar_name, child)?);
    }
    if !children.is_empty() {
        mode = mode.contains(children);
    }
    Ok(mode)
}

/// Build keyword groups from the document's class → word-list table,
/// sorted by class for deterministic results
fn build_keywords(grammar_name: &str, table: &HashMap<String, String>) -> Result<Keywords> {
    let mut groups: Vec<(&String, &String)> = table.iter().collect();
    groups.sort_by_key(|(class, _)| class.as_str());

    let mut keywords = Keywords::new();
    for (class, words) in groups {
        keywords = keywords.group(parse_class(grammar_name, class)?, words);
    }
    Ok(keywords)
}

fn parse_class(grammar_name: &str, class: &str) -> Result<TokenType> {
    TokenType::from_name(class).ok_or_else(|| {
        HighlightError::InvalidGrammar(format!(
            "unknown classification {class:?} in grammar {grammar_name:?}"
        ))
    })
}
