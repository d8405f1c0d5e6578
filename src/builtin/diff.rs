//! diff / patch grammar

use crate::grammar::{Grammar, Mode};
use crate::token::TokenType;

fn meta(begin: &str) -> Mode {
    Mode::new().class(TokenType::Meta).begin(begin).relevance(10)
}

fn file_header(begin: &str, end: &str) -> Mode {
    Mode::new().class(TokenType::Comment).begin(begin).end(end)
}

/// Create the diff grammar definition
pub(crate) fn diff_grammar() -> Grammar {
    Grammar::new("diff").alias(&["patch"]).contains(vec![
        meta(r"^@@ +\-\d+,\d+ +\+\d+,\d+ +@@$").into(),
        meta(r"^\*\*\* +\d+,\d+ +\*\*\*\*$").into(),
        meta(r"^\-\-\- +\d+,\d+ +\-\-\-\-$").into(),
        file_header("Index: ", "$").into(),
        file_header("={3,}", "$").into(),
        file_header(r"^\-{3}", "$").into(),
        file_header(r"^\*{3} ", "$").into(),
        file_header(r"^\+{3}", "$").into(),
        file_header(r"\*{5}", r"\*{5}$").into(),
        Mode::new()
            .class(TokenType::Addition)
            .begin(r"^\+")
            .end("$")
            .into(),
        Mode::new()
            .class(TokenType::Deletion)
            .begin(r"^\-")
            .end("$")
            .into(),
        Mode::new()
            .class(TokenType::Addition)
            .begin(r"^\!")
            .end("$")
            .into(),
    ])
}
