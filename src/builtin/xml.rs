//! xml / html grammar

use crate::builtin::common::comment;
use crate::grammar::{Grammar, Mode};
use crate::token::TokenType;

const TAG_NAME: &str = r"[A-Za-z0-9\._:-]+";

fn attr_string(begin: &str, end: &str) -> Mode {
    Mode::new()
        .class(TokenType::String)
        .begin(begin)
        .end(end)
        .ends_parent()
}

/// Attribute machinery inside a tag: names, and `=`-values whose
/// string also closes the value context
fn tag_internals() -> Mode {
    Mode::new()
        .ends_with_parent()
        .illegal("<")
        .relevance(0)
        .contains(vec![
            Mode::new()
                .class(TokenType::Attr)
                .begin(TAG_NAME)
                .relevance(0)
                .into(),
            Mode::new()
                .begin(r"=\s*")
                .relevance(0)
                .contains(vec![
                    attr_string("\"", "\"").into(),
                    attr_string("'", "'").into(),
                    attr_string(r#"[^\s"'=<>`]+"#, r"\B|\b").into(),
                ])
                .into(),
        ])
}

/// Create the xml grammar definition
pub(crate) fn xml_grammar() -> Grammar {
    Grammar::new("xml")
        .alias(&["html", "xhtml", "rss", "atom", "xjb", "xsd", "xsl", "plist"])
        .case_insensitive()
        .contains(vec![
            Mode::new()
                .class(TokenType::Meta)
                .begin("<!DOCTYPE")
                .end(">")
                .relevance(10)
                .contains(vec![Mode::new().begin(r"\[").end(r"\]").into()])
                .into(),
            comment("<!--", "-->").relevance(10).into(),
            Mode::new()
                .begin(r"<!\[CDATA\[")
                .end(r"\]\]>")
                .relevance(10)
                .into(),
            Mode::new()
                .class(TokenType::Meta)
                .begin(r"<\?xml")
                .end(r"\?>")
                .relevance(10)
                .into(),
            Mode::new()
                .class(TokenType::Meta)
                .begin(r"<\?\w+")
                .end(r"\?>")
                .into(),
            Mode::new()
                .class(TokenType::Tag)
                .begin("</?")
                .end("/?>")
                .contains(vec![
                    Mode::new()
                        .class(TokenType::Name)
                        .begin(r"[^/><\s]+")
                        .relevance(0)
                        .into(),
                    tag_internals().into(),
                ])
                .into(),
        ])
}
