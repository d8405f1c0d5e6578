//! Grammar compilation
//!
//! Compiles a declarative grammar's mode tree into an arena of
//! matchers: per-mode begin/end/illegal regexes, keyword lookup
//! tables, and a merged terminator alternation used for single-pass
//! dispatch. Compilation happens once per grammar; the registry caches
//! the result.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use crate::error::{HighlightError, Result};
use crate::grammar::{Grammar, Keywords, Mode, ModeRef};
use crate::token::TokenType;

/// Index of the root mode in the compiled arena
pub(crate) const ROOT: usize = 0;

/// A grammar compiled into matchers
#[derive(Debug)]
pub(crate) struct CompiledGrammar {
    pub name: String,
    pub case_insensitive: bool,
    pub modes: Vec<CompiledMode>,
}

/// A single compiled mode
///
/// Child modes are arena indices; a mode containing itself simply
/// lists its own index.
#[derive(Debug)]
pub(crate) struct CompiledMode {
    pub class: Option<TokenType>,
    pub begin: Option<Regex>,
    pub begin_source: String,
    pub begin_keywords: bool,
    pub end: Option<Regex>,
    pub illegal: Option<Regex>,
    /// Alternation of child begins, effective end, and illegal pattern
    pub terminators: Option<Regex>,
    /// Effective end pattern source, chained through `ends_with_parent`
    pub terminator_end: String,
    pub keywords: HashMap<String, (TokenType, u32)>,
    pub lexemes: Regex,
    pub contains: Vec<usize>,
    pub ends_with_parent: bool,
    pub ends_parent: bool,
    pub exclude_begin: bool,
    pub exclude_end: bool,
    pub return_begin: bool,
    pub return_end: bool,
    pub skip: bool,
    pub relevance: u32,
    pub sub_language: Option<String>,
}

/// Compile a grammar into its matcher arena
pub(crate) fn compile(grammar: &Grammar) -> Result<CompiledGrammar> {
    let default_lexemes = build_regex(grammar, r"\w+")?;
    let mut compiler = Compiler {
        grammar,
        modes: Vec::new(),
        named: HashMap::new(),
        default_lexemes,
    };
    compiler.compile_mode(&grammar.root, None, None)?;
    Ok(CompiledGrammar {
        name: grammar.name.clone(),
        case_insensitive: grammar.case_insensitive,
        modes: compiler.modes,
    })
}

struct Compiler<'g> {
    grammar: &'g Grammar,
    modes: Vec<CompiledMode>,
    named: HashMap<String, usize>,
    default_lexemes: Regex,
}

impl<'g> Compiler<'g> {
    fn compile_mode(
        &mut self,
        mode: &Mode,
        parent: Option<usize>,
        register_as: Option<&str>,
    ) -> Result<usize> {
        // Reserve the slot up front so self-references and recursive
        // named references resolve to a stable index.
        let idx = self.modes.len();
        let placeholder = self.placeholder();
        self.modes.push(placeholder);
        if let Some(name) = register_as {
            self.named.insert(name.to_string(), idx);
        }

        let mut keywords = HashMap::new();
        if let Some(groups) = &mode.keywords {
            self.parse_keywords(groups, &mut keywords);
        } else if let Some(words) = &mode.begin_keywords {
            self.parse_keywords(&Keywords::keyword(words), &mut keywords);
        }

        let mut begin_source = String::new();
        let mut begin = None;
        let mut end = None;
        let mut terminator_end = String::new();

        // The root mode is entered implicitly and never ends; begin and
        // end matchers exist only for contained modes.
        if let Some(parent_idx) = parent {
            begin_source = if let Some(words) = &mode.begin_keywords {
                let alternates: Vec<&str> = words
                    .split_whitespace()
                    .map(|w| w.split('|').next().unwrap_or(w))
                    .collect();
                format!(r"\b({})\b", alternates.join("|"))
            } else if let Some(pattern) = &mode.begin {
                pattern.clone()
            } else {
                r"\B|\b".to_string()
            };
            begin = Some(self.build(&begin_source)?);

            let end_source = match (&mode.end, mode.ends_with_parent) {
                (Some(pattern), _) => Some(pattern.clone()),
                (None, false) => Some(r"\B|\b".to_string()),
                (None, true) => None,
            };
            if let Some(pattern) = &end_source {
                end = Some(self.build(pattern)?);
                terminator_end = pattern.clone();
            }
            if mode.ends_with_parent {
                let parent_end = self.modes[parent_idx].terminator_end.clone();
                if !parent_end.is_empty() {
                    if terminator_end.is_empty() {
                        terminator_end = parent_end;
                    } else {
                        terminator_end = format!("{terminator_end}|{parent_end}");
                    }
                }
            }
        }

        let illegal = match &mode.illegal {
            Some(pattern) => Some(self.build(pattern)?),
            None => None,
        };
        let lexemes = match &mode.lexemes {
            Some(pattern) => self.build(pattern)?,
            None => self.default_lexemes.clone(),
        };

        // Fill in everything the children need to see (the effective
        // end chain and this mode's own begin for self-references).
        self.modes[idx] = CompiledMode {
            class: mode.class,
            begin,
            begin_source,
            begin_keywords: mode.begin_keywords.is_some(),
            end,
            illegal,
            terminators: None,
            terminator_end: terminator_end.clone(),
            keywords,
            lexemes,
            contains: Vec::new(),
            ends_with_parent: mode.ends_with_parent,
            ends_parent: mode.ends_parent,
            exclude_begin: mode.exclude_begin,
            exclude_end: mode.exclude_end,
            return_begin: mode.return_begin,
            return_end: mode.return_end,
            skip: mode.skip,
            relevance: mode.relevance.unwrap_or(1),
            sub_language: mode.sub_language.clone(),
        };

        let mut contains = Vec::new();
        for child in &mode.contains {
            let child_idx = match child {
                ModeRef::Inline(child_mode) => self.compile_mode(child_mode, Some(idx), None)?,
                ModeRef::SelfRef => idx,
                ModeRef::Named(name) => self.compile_named(name, idx)?,
            };
            contains.push(child_idx);
        }

        let mut entries: Vec<String> = Vec::new();
        for &child_idx in &contains {
            let child = &self.modes[child_idx];
            if child.begin_source.is_empty() {
                continue;
            }
            if child.begin_keywords {
                entries.push(format!(r"\.?(?:{})\.?", child.begin_source));
            } else {
                entries.push(child.begin_source.clone());
            }
        }
        if !terminator_end.is_empty() {
            entries.push(terminator_end);
        }
        if let Some(pattern) = &mode.illegal {
            entries.push(pattern.clone());
        }
        let terminators = if entries.is_empty() {
            None
        } else {
            let joined: Vec<String> = entries.iter().map(|e| format!("(?:{e})")).collect();
            Some(self.build(&joined.join("|"))?)
        };

        self.modes[idx].contains = contains;
        self.modes[idx].terminators = terminators;
        Ok(idx)
    }

    /// Compile a named definition exactly once; later references share
    /// the same arena slot, which is what makes mutual recursion work.
    fn compile_named(&mut self, name: &str, parent: usize) -> Result<usize> {
        if let Some(&idx) = self.named.get(name) {
            return Ok(idx);
        }
        let grammar = self.grammar;
        let mode = grammar
            .defs
            .iter()
            .find(|(def_name, _)| def_name == name)
            .map(|(_, mode)| mode)
            .ok_or_else(|| {
                HighlightError::InvalidGrammar(format!(
                    "undefined mode reference {name:?} in grammar {:?}",
                    grammar.name
                ))
            })?;
        self.compile_mode(mode, Some(parent), Some(name))
    }

    fn parse_keywords(
        &self,
        groups: &Keywords,
        table: &mut HashMap<String, (TokenType, u32)>,
    ) {
        for (class, words) in &groups.groups {
            for item in words.split_whitespace() {
                let (word, weight) = match item.split_once('|') {
                    Some((word, weight)) => (word, weight.parse().unwrap_or(1)),
                    None => (item, 1),
                };
                let key = if self.grammar.case_insensitive {
                    word.to_lowercase()
                } else {
                    word.to_string()
                };
                table.insert(key, (*class, weight));
            }
        }
    }

    fn build(&self, pattern: &str) -> Result<Regex> {
        build_regex(self.grammar, pattern)
    }

    fn placeholder(&self) -> CompiledMode {
        CompiledMode {
            class: None,
            begin: None,
            begin_source: String::new(),
            begin_keywords: false,
            end: None,
            illegal: None,
            terminators: None,
            terminator_end: String::new(),
            keywords: HashMap::new(),
            lexemes: self.default_lexemes.clone(),
            contains: Vec::new(),
            ends_with_parent: false,
            ends_parent: false,
            exclude_begin: false,
            exclude_end: false,
            return_begin: false,
            return_end: false,
            skip: false,
            relevance: 1,
            sub_language: None,
        }
    }
}

fn build_regex(grammar: &Grammar, pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .case_insensitive(grammar.case_insensitive)
        .build()
        .map_err(|source| HighlightError::InvalidPattern {
            grammar: grammar.name.clone(),
            pattern: pattern.to_string(),
            source,
        })
}
