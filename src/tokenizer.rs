//! Tokenizer engine
//!
//! A state machine over a mode stack: each step scans the active
//! mode's terminator alternation for the next child begin, end, or
//! illegal occurrence, with the lowest offset winning. Buffered
//! literal runs flush through the active mode's keyword matcher into
//! the flat token stream. The engine accumulates a relevance score
//! from keyword weights and the weight of every mode popped by an
//! explicit end match.

use std::ops::Range;

use regex::Regex;

use crate::compile::{CompiledGrammar, ROOT};
use crate::error::{HighlightError, Result};
use crate::registry::Registry;
use crate::token::{Token, TokenType};

/// Raw engine output, before rendering
pub(crate) struct Output {
    pub tokens: Vec<Token>,
    pub relevance: u32,
}

/// Tokenize `text` with a compiled grammar
///
/// The registry is only consulted for sub-language delegation. With
/// `ignore_illegal` set, illegal-pattern matches become plain content
/// instead of failing the run; sub-language delegates always run in
/// that mode.
pub(crate) fn run(
    registry: &mut Registry,
    grammar: &CompiledGrammar,
    text: &str,
    ignore_illegal: bool,
) -> Result<Output> {
    let engine = Engine {
        registry,
        grammar,
        text,
        ignore_illegal,
        stack: vec![ROOT],
        buf: 0..0,
        tokens: Vec::new(),
        relevance: 0,
    };
    engine.run()
}

struct Engine<'r, 'a> {
    registry: &'r mut Registry,
    grammar: &'a CompiledGrammar,
    text: &'a str,
    ignore_illegal: bool,
    /// Active mode indices; index 0 is always the grammar root
    stack: Vec<usize>,
    /// Byte range of text buffered since the last flush
    buf: Range<usize>,
    tokens: Vec<Token>,
    relevance: u32,
}

/// Match a pattern against the start of a lexeme, returning the match
/// length
fn match_at_start(re: &Regex, lexeme: &str) -> Option<usize> {
    match re.find(lexeme) {
        Some(m) if m.start() == 0 => Some(m.end()),
        _ => None,
    }
}

impl<'r, 'a> Engine<'r, 'a> {
    fn run(mut self) -> Result<Output> {
        let mut cursor = 0;
        while cursor <= self.text.len() {
            let found = match &self.grammar.modes[self.top()].terminators {
                Some(re) => re.find_at(self.text, cursor),
                None => None,
            };
            let Some(found) = found else { break };
            let consumed = self.process_lexeme(found.start()..found.end())?;
            cursor = found.start() + consumed;
        }
        self.buf.end = self.text.len();
        self.flush();
        Ok(Output {
            tokens: self.tokens,
            relevance: self.relevance,
        })
    }

    fn top(&self) -> usize {
        self.stack.last().copied().unwrap_or(ROOT)
    }

    /// Handle one terminator occurrence; returns how many bytes of the
    /// lexeme the cursor consumes
    fn process_lexeme(&mut self, lex: Range<usize>) -> Result<usize> {
        // Everything between the previous cursor and this lexeme is
        // plain content of the active mode.
        self.buf.end = lex.start;
        let lexeme = &self.text[lex.clone()];

        let end_target = self.find_end_target(lexeme);
        let child = self.match_child(lexeme);

        // An end of the current mode is preferred over a new child
        // begin at the same offset; a zero-length boundary end does not
        // outrank a child that matched real content.
        if let Some((target_sp, end_len)) = end_target {
            if end_len > 0 || child.is_none() {
                return Ok(self.leave_modes(target_sp, lex));
            }
        }

        if let Some(child_idx) = child {
            return Ok(self.enter_mode(child_idx, lex));
        }

        if !self.ignore_illegal {
            let mode = &self.grammar.modes[self.top()];
            if let Some(illegal) = &mode.illegal {
                if match_at_start(illegal, lexeme).is_some() {
                    let mode_name = mode.class.map_or("<unnamed>", |c| c.name());
                    return Err(HighlightError::IllegalLexeme {
                        lexeme: lexeme.to_string(),
                        mode: mode_name.to_string(),
                    });
                }
            }
        }

        // The lexeme matched no interpretation in this mode; treat it
        // as plain content. Advance at least one byte, staying on a
        // character boundary.
        self.buf.end = lex.end;
        let mut advance = lex.len().max(1);
        while lex.start + advance < self.text.len()
            && !self.text.is_char_boundary(lex.start + advance)
        {
            advance += 1;
        }
        Ok(advance)
    }

    /// Find the stack position this lexeme ends, if any, along with the
    /// end match length. Walks `ends_with_parent` chains upward and
    /// applies `ends_parent` redirection.
    fn find_end_target(&self, lexeme: &str) -> Option<(usize, usize)> {
        let mut sp = self.stack.len() - 1;
        loop {
            let mode = &self.grammar.modes[self.stack[sp]];
            if let Some(end) = &mode.end {
                if let Some(len) = match_at_start(end, lexeme) {
                    let mut target = sp;
                    while target > 0 && self.grammar.modes[self.stack[target]].ends_parent {
                        target -= 1;
                    }
                    return Some((target, len));
                }
            }
            if mode.ends_with_parent && sp > 0 {
                sp -= 1;
                continue;
            }
            return None;
        }
    }

    /// Find the first child of the active mode whose begin pattern
    /// matches the lexeme
    fn match_child(&self, lexeme: &str) -> Option<usize> {
        let mode = &self.grammar.modes[self.top()];
        for &child_idx in &mode.contains {
            if let Some(begin) = &self.grammar.modes[child_idx].begin {
                if match_at_start(begin, lexeme).is_some() {
                    return Some(child_idx);
                }
            }
        }
        None
    }

    fn enter_mode(&mut self, child_idx: usize, lex: Range<usize>) -> usize {
        let child = &self.grammar.modes[child_idx];
        let (c_skip, c_exclude, c_return) = (child.skip, child.exclude_begin, child.return_begin);
        if c_skip {
            self.buf.end = lex.end;
        } else {
            if c_exclude {
                self.buf.end = lex.end;
            }
            self.flush();
            if !c_return && !c_exclude {
                self.buf = lex.clone();
            }
        }
        self.stack.push(child_idx);
        if c_return {
            0
        } else {
            lex.len()
        }
    }

    fn leave_modes(&mut self, target_sp: usize, lex: Range<usize>) -> usize {
        let origin = &self.grammar.modes[self.top()];
        let (o_skip, o_exclude, o_return) = (origin.skip, origin.exclude_end, origin.return_end);
        if o_skip {
            self.buf.end = lex.end;
        } else {
            if !(o_return || o_exclude) {
                self.buf.end = lex.end;
            }
            self.flush();
            if o_exclude {
                self.buf = lex.clone();
            }
        }
        // Pop everything above and including the target; the root frame
        // always stays.
        let keep = target_sp.max(1);
        while self.stack.len() > keep {
            let popped = self.stack.pop().unwrap_or(ROOT);
            let mode = &self.grammar.modes[popped];
            if !mode.skip {
                self.relevance += mode.relevance;
            }
        }
        if o_return {
            0
        } else {
            lex.len()
        }
    }

    /// Flush the buffered range into the token stream
    fn flush(&mut self) {
        let range = self.buf.clone();
        self.buf = range.end..range.end;
        if range.start >= range.end {
            return;
        }

        let grammar = self.grammar;
        let text = self.text;
        let top = self.top();
        let mode = &grammar.modes[top];

        if let Some(delegate) = mode.sub_language.clone() {
            self.flush_sub_language(&delegate, range);
            return;
        }

        if mode.keywords.is_empty() {
            let inherited = self.enclosing_class();
            self.push_token(inherited, range);
            return;
        }

        let mut last = range.start;
        for m in mode.lexemes.find_iter(&text[range.clone()]) {
            let word_start = range.start + m.start();
            let word_end = range.start + m.end();
            let key = if grammar.case_insensitive {
                m.as_str().to_lowercase()
            } else {
                m.as_str().to_string()
            };
            if let Some(&(class, weight)) = mode.keywords.get(&key) {
                if last < word_start {
                    let inherited = self.enclosing_class();
                    self.push_token(inherited, last..word_start);
                }
                self.push_token(Some(class), word_start..word_end);
                self.relevance += weight;
                last = word_end;
            }
        }
        if last < range.end {
            let inherited = self.enclosing_class();
            self.push_token(inherited, last..range.end);
        }
    }

    /// Hand a buffered range to the delegate grammar, shifting its
    /// tokens into place
    ///
    /// An unregistered delegate leaves the range unclassified, and a
    /// delegate never fails the host run: it tokenizes with illegal
    /// matches downgraded to plain content.
    fn flush_sub_language(&mut self, delegate: &str, range: Range<usize>) {
        let host_relevance = self.grammar.modes[self.top()].relevance;
        let delegated = match self.registry.compiled(delegate) {
            Ok(sub) => run(self.registry, &sub, &self.text[range.clone()], true),
            Err(error) => Err(error),
        };
        match delegated {
            Ok(out) => {
                if host_relevance > 0 {
                    self.relevance += out.relevance;
                }
                for token in out.tokens {
                    self.push_token(token.kind, range.start + token.start..range.start + token.end);
                }
            }
            Err(_) => {
                let inherited = self.enclosing_class();
                self.push_token(inherited, range);
            }
        }
    }

    /// The classification of the nearest enclosing classified mode
    fn enclosing_class(&self) -> Option<TokenType> {
        for &idx in self.stack.iter().rev() {
            if let Some(class) = self.grammar.modes[idx].class {
                return Some(class);
            }
        }
        None
    }

    /// Append a span, merging adjacent spans of the same classification
    fn push_token(&mut self, kind: Option<TokenType>, range: Range<usize>) {
        if range.start >= range.end {
            return;
        }
        let text = &self.text[range.clone()];
        if let Some(last) = self.tokens.last_mut() {
            if last.kind == kind && last.end == range.start {
                last.text.push_str(text);
                last.end = range.end;
                return;
            }
        }
        self.tokens.push(Token {
            kind,
            text: text.to_string(),
            start: range.start,
            end: range.end,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::grammar::{Grammar, Keywords, Mode};

    fn tokenize(grammar: &Grammar, text: &str) -> Output {
        let compiled = compile(grammar).unwrap();
        let mut registry = Registry::new();
        run(&mut registry, &compiled, text, false).unwrap()
    }

    fn assert_covers_input(tokens: &[Token], text: &str) {
        let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, text);
        let mut offset = 0;
        for token in tokens {
            assert_eq!(token.start, offset, "spans must be contiguous and ordered");
            assert!(token.start < token.end);
            offset = token.end;
        }
    }

    fn demo_grammar() -> Grammar {
        Grammar::new("demo")
            .keywords(Keywords::keyword("let fn"))
            .contains(vec![
                Mode::new()
                    .class(TokenType::String)
                    .begin("\"")
                    .end("\"")
                    .contains(vec![Mode::new().begin(r"\\[\s\S]").relevance(0).into()])
                    .into(),
                Mode::new()
                    .class(TokenType::Comment)
                    .begin("//")
                    .end("$")
                    .into(),
                Mode::new()
                    .class(TokenType::Number)
                    .begin(r"\b\d+")
                    .relevance(0)
                    .into(),
            ])
    }

    #[test]
    fn test_round_trip() {
        let text = "let x = \"hi\\n\" // done\nfn f 42";
        let out = tokenize(&demo_grammar(), text);
        assert_covers_input(&out.tokens, text);
    }

    #[test]
    fn test_round_trip_multibyte() {
        let text = "let s = \"héllo\" // naïve\n";
        let out = tokenize(&demo_grammar(), text);
        assert_covers_input(&out.tokens, text);
    }

    #[test]
    fn test_keyword_classification() {
        let out = tokenize(&demo_grammar(), "let x");
        assert_eq!(out.tokens[0].kind, Some(TokenType::Keyword));
        assert_eq!(out.tokens[0].text, "let");
        assert_eq!(out.tokens[1].kind, None);
        assert_eq!(out.tokens[1].text, " x");
        assert_eq!(out.relevance, 1);
    }

    #[test]
    fn test_mode_classification_covers_delimiters() {
        let out = tokenize(&demo_grammar(), "a \"bc\" d");
        let string = out
            .tokens
            .iter()
            .find(|t| t.kind == Some(TokenType::String))
            .unwrap();
        assert_eq!(string.text, "\"bc\"");
    }

    #[test]
    fn test_escape_stays_inside_string() {
        // The escape sub-mode has no classification of its own, so its
        // text takes the enclosing string classification and merges.
        let out = tokenize(&demo_grammar(), "\"a\\\"b\"");
        assert_eq!(out.tokens.len(), 1);
        assert_eq!(out.tokens[0].kind, Some(TokenType::String));
        assert_eq!(out.tokens[0].text, "\"a\\\"b\"");
    }

    #[test]
    fn test_mode_relevance_added_on_pop() {
        let grammar = Grammar::new("demo").contains(vec![Mode::new()
            .class(TokenType::Meta)
            .begin("@")
            .end("$")
            .relevance(10)
            .into()]);
        let out = tokenize(&grammar, "@thing\n");
        assert_eq!(out.relevance, 10);
    }

    #[test]
    fn test_unterminated_mode_adds_no_relevance() {
        let grammar = Grammar::new("demo").contains(vec![Mode::new()
            .class(TokenType::String)
            .begin("\"")
            .end("\"")
            .relevance(10)
            .into()]);
        let out = tokenize(&grammar, "\"open");
        assert_eq!(out.relevance, 0);
        assert_covers_input(&out.tokens, "\"open");
    }

    #[test]
    fn test_illegal_lexeme_is_fatal() {
        let grammar = Grammar::new("demo")
            .illegal(r"\$")
            .contains(vec![Mode::new()
                .class(TokenType::Number)
                .begin(r"\d+")
                .into()]);
        let compiled = compile(&grammar).unwrap();
        let mut registry = Registry::new();
        let result = run(&mut registry, &compiled, "1 $ 2", false);
        assert!(matches!(
            result,
            Err(HighlightError::IllegalLexeme { ref lexeme, .. }) if lexeme == "$"
        ));
    }

    #[test]
    fn test_illegal_lexeme_ignored_on_request() {
        let grammar = Grammar::new("demo")
            .illegal(r"\$")
            .contains(vec![Mode::new()
                .class(TokenType::Number)
                .begin(r"\d+")
                .into()]);
        let compiled = compile(&grammar).unwrap();
        let mut registry = Registry::new();
        let out = run(&mut registry, &compiled, "1 $ 2", true).unwrap();
        assert_covers_input(&out.tokens, "1 $ 2");
    }

    #[test]
    fn test_ends_with_parent() {
        // The inner mode has no end of its own and unwinds when the
        // outer mode's end matches.
        let grammar = Grammar::new("demo").contains(vec![Mode::new()
            .class(TokenType::Section)
            .begin(r"\[")
            .end(r"\]")
            .contains(vec![Mode::new()
                .begin("=")
                .ends_with_parent()
                .relevance(0)
                .into()])
            .into()]);
        let out = tokenize(&grammar, "[a=b] tail");
        assert_covers_input(&out.tokens, "[a=b] tail");
        let section: String = out
            .tokens
            .iter()
            .filter(|t| t.kind == Some(TokenType::Section))
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(section, "[a=b]");
    }

    #[test]
    fn test_ends_parent_pops_both() {
        // The value string also terminates the surrounding assignment.
        let grammar = Grammar::new("demo").contains(vec![Mode::new()
            .begin("=")
            .end(";")
            .contains(vec![Mode::new()
                .class(TokenType::String)
                .begin("\"")
                .end("\"")
                .ends_parent()
                .into()])
            .into()]);
        let out = tokenize(&grammar, "=\"v\" x;");
        assert_covers_input(&out.tokens, "=\"v\" x;");
        // After the string closed, the rest of the line is root
        // content again.
        let plain: String = out
            .tokens
            .iter()
            .filter(|t| t.kind.is_none())
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(plain, "= x;");
    }

    #[test]
    fn test_exclude_and_return_flags() {
        // "[label](target)" with the bracket punctuation excluded from
        // the classified spans.
        let grammar = Grammar::new("demo").contains(vec![Mode::new()
            .begin(r"\[.+?\]\(.*?\)")
            .return_begin()
            .contains(vec![
                Mode::new()
                    .class(TokenType::String)
                    .begin(r"\[")
                    .end(r"\]")
                    .exclude_begin()
                    .return_end()
                    .relevance(0)
                    .into(),
                Mode::new()
                    .class(TokenType::Link)
                    .begin(r"\]\(")
                    .end(r"\)")
                    .exclude_begin()
                    .exclude_end()
                    .into(),
            ])
            .into()]);
        let out = tokenize(&grammar, "[label](target)");
        assert_covers_input(&out.tokens, "[label](target)");
        let string = out
            .tokens
            .iter()
            .find(|t| t.kind == Some(TokenType::String))
            .unwrap();
        assert_eq!(string.text, "label");
        let link = out
            .tokens
            .iter()
            .find(|t| t.kind == Some(TokenType::Link))
            .unwrap();
        assert_eq!(link.text, "target");
    }

    #[test]
    fn test_skip_mode_folds_into_buffer() {
        let grammar = Grammar::new("demo").contains(vec![Mode::new()
            .class(TokenType::Comment)
            .begin(r"/\*")
            .end(r"\*/")
            .contains(vec![Mode::new().begin("@").end("!").skip().into()])
            .into()]);
        let out = tokenize(&grammar, "/* a @b! c */");
        assert_eq!(out.tokens.len(), 1);
        assert_eq!(out.tokens[0].kind, Some(TokenType::Comment));
        assert_eq!(out.tokens[0].text, "/* a @b! c */");
    }

    #[test]
    fn test_sub_language_delegation() {
        let mut registry = Registry::new();
        registry
            .register(
                Grammar::new("nums").contains(vec![Mode::new()
                    .class(TokenType::Number)
                    .begin(r"\d+")
                    .into()]),
            )
            .unwrap();

        let host = Grammar::new("host").contains(vec![Mode::new()
            .begin("<")
            .end(">")
            .sub_language("nums")
            .relevance(0)
            .into()]);
        let compiled = compile(&host).unwrap();
        let out = run(&mut registry, &compiled, "a <1 2> b", false).unwrap();
        assert_covers_input(&out.tokens, "a <1 2> b");
        let numbers: Vec<_> = out
            .tokens
            .iter()
            .filter(|t| t.kind == Some(TokenType::Number))
            .collect();
        assert_eq!(numbers.len(), 2);
        assert_eq!(numbers[0].text, "1");
        assert_eq!(numbers[0].start, 3);
    }

    #[test]
    fn test_unknown_sub_language_renders_plain() {
        let host = Grammar::new("host").contains(vec![Mode::new()
            .begin("<")
            .end(">")
            .sub_language("nothere")
            .relevance(0)
            .into()]);
        let out = tokenize(&host, "<x>");
        assert_covers_input(&out.tokens, "<x>");
        assert!(out.tokens.iter().all(|t| t.kind.is_none()));
    }
}
