//! json grammar

use crate::builtin::common::{backslash_escape, c_number, quote_string};
use crate::grammar::{Grammar, Keywords, Mode, ModeRef};
use crate::token::TokenType;

fn literals() -> Keywords {
    Keywords::new().group(TokenType::Literal, "true false null")
}

/// Anything that can appear in value position
fn value_contains() -> Vec<ModeRef> {
    vec![
        quote_string().into(),
        c_number().into(),
        ModeRef::named("object"),
        ModeRef::named("array"),
    ]
}

/// A list entry: runs to the next comma or the end of the container
fn list_entry() -> Mode {
    Mode::new()
        .end(",")
        .ends_with_parent()
        .exclude_end()
        .keywords(literals())
        .contains(value_contains())
}

/// Create the json grammar definition
pub(crate) fn json_grammar() -> Grammar {
    Grammar::new("json")
        .keywords(literals())
        .illegal(r"\S")
        .define(
            "object",
            Mode::new()
                .begin(r"\{")
                .end(r"\}")
                .illegal(r"\S")
                .contains(vec![
                    Mode::new()
                        .class(TokenType::Attr)
                        .begin("\"")
                        .end("\"")
                        .illegal(r"\n")
                        .contains(vec![backslash_escape().into()])
                        .into(),
                    list_entry().begin(":").into(),
                ]),
        )
        .define(
            "array",
            Mode::new()
                .begin(r"\[")
                .end(r"\]")
                .illegal(r"\S")
                .contains(vec![list_entry().into()]),
        )
        .contains(value_contains())
}
