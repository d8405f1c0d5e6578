//! ini / toml grammar

use crate::builtin::common::{backslash_escape, comment, hash_comment, number};
use crate::grammar::{Grammar, Mode};
use crate::token::TokenType;

fn string(begin: &str, end: &str, relevance: u32) -> Mode {
    Mode::new()
        .class(TokenType::String)
        .begin(begin)
        .end(end)
        .relevance(relevance)
        .contains(vec![backslash_escape().into()])
}

/// Create the ini grammar definition
pub(crate) fn ini_grammar() -> Grammar {
    let value = Mode::new()
        .begin("=")
        .ends_with_parent()
        .relevance(0)
        .contains(vec![
            Mode::new()
                .class(TokenType::Literal)
                .begin(r"\bon|off|true|false|yes|no\b")
                .into(),
            Mode::new()
                .class(TokenType::Variable)
                .begin(r#"\$[\w\d"][\w\d_]*"#)
                .into(),
            Mode::new()
                .class(TokenType::Variable)
                .begin(r"\$\{(.*?)\}")
                .into(),
            string("'''", "'''", 10).into(),
            string("\"\"\"", "\"\"\"", 10).into(),
            string("\"", "\"", 1).into(),
            string("'", "'", 1).into(),
            Mode::new()
                .class(TokenType::Number)
                .begin(r"([\+\-]+)?[\d]+_[\d_]+")
                .into(),
            number().into(),
        ]);

    Grammar::new("ini")
        .alias(&["toml"])
        .case_insensitive()
        .illegal(r"\S")
        .contains(vec![
            comment(";", "$").into(),
            hash_comment().into(),
            Mode::new()
                .class(TokenType::Section)
                .begin(r"^\s*\[+")
                .end(r"\]+")
                .into(),
            Mode::new()
                .begin(r"^[a-z0-9\[\]_-]+\s*=\s*")
                .end("$")
                .return_begin()
                .contains(vec![
                    Mode::new()
                        .class(TokenType::Attr)
                        .begin(r"[a-z0-9\[\]_-]+")
                        .into(),
                    value.into(),
                ])
                .into(),
        ])
}
