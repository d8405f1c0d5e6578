//! python grammar

use crate::builtin::common::{
    apos_string, backslash_escape, hash_comment, quote_string, underscore_title, BINARY_NUMBER,
    C_NUMBER,
};
use crate::grammar::{Grammar, Keywords, Mode, ModeRef};
use crate::token::TokenType;

fn python_keywords() -> Keywords {
    Keywords::new()
        .group(
            TokenType::Keyword,
            "and elif is global as in if from raise for except finally print import pass return \
             exec else break not with class assert yield try while continue del or def lambda \
             async await nonlocal|10 None True False",
        )
        .group(TokenType::BuiltIn, "Ellipsis NotImplemented")
}

/// `>>> ` and `... ` REPL prompts
fn prompt() -> Mode {
    Mode::new().class(TokenType::Meta).begin(r"^(>>>|\.\.\.) ")
}

/// `{...}` interpolation inside f-strings
fn subst() -> Mode {
    let mut children: Vec<ModeRef> = vec![
        apos_string().into(),
        quote_string().into(),
        prompt().into(),
    ];
    children.extend(number_modes().into_iter().map(ModeRef::Inline));
    Mode::new()
        .class(TokenType::Subst)
        .begin(r"\{")
        .end(r"\}")
        .keywords(python_keywords())
        .illegal("#")
        .contains(children)
}

fn number_modes() -> Vec<Mode> {
    let number = |begin: &str| Mode::new().class(TokenType::Number).begin(begin).relevance(0);
    vec![
        number(&format!("{BINARY_NUMBER}[lLjJ]?")),
        number(r"\b(0o[0-7]+)[lLjJ]?"),
        number(&format!("{C_NUMBER}[lLjJ]?")),
    ]
}

fn triple_string(begin: &str, end: &str, relevance: u32, interpolated: bool) -> Mode {
    let mut children: Vec<ModeRef> = vec![prompt().into()];
    if interpolated {
        children.push(subst().into());
    }
    Mode::new()
        .class(TokenType::String)
        .begin(begin)
        .end(end)
        .relevance(relevance)
        .contains(children)
}

fn prefixed_string(begin: &str, end: &str, relevance: u32, interpolated: bool) -> Mode {
    let mut children: Vec<ModeRef> = Vec::new();
    if interpolated {
        children.push(subst().into());
    } else {
        children.push(backslash_escape().into());
    }
    Mode::new()
        .class(TokenType::String)
        .begin(begin)
        .end(end)
        .relevance(relevance)
        .contains(children)
}

fn string_modes() -> Vec<Mode> {
    vec![
        triple_string(r"(u|b)?r?'''", "'''", 10, false),
        triple_string("(u|b)?r?\"\"\"", "\"\"\"", 10, false),
        triple_string(r"(fr|rf|f)'''", "'''", 1, true),
        triple_string("(fr|rf|f)\"\"\"", "\"\"\"", 1, true),
        prefixed_string(r"(u|r|ur)'", "'", 10, false),
        prefixed_string("(u|r|ur)\"", "\"", 10, false),
        prefixed_string(r"(b|br)'", "'", 1, false),
        prefixed_string("(b|br)\"", "\"", 1, false),
        prefixed_string(r"(fr|rf|f)'", "'", 1, true),
        prefixed_string("(fr|rf|f)\"", "\"", 1, true),
        apos_string(),
        quote_string(),
    ]
}

fn declaration(class: TokenType, words: &str) -> Mode {
    let mut param_children: Vec<ModeRef> = vec![ModeRef::SelfRef, prompt().into()];
    param_children.extend(number_modes().into_iter().map(ModeRef::Inline));
    param_children.extend(string_modes().into_iter().map(ModeRef::Inline));
    let params = Mode::new()
        .class(TokenType::Params)
        .begin(r"\(")
        .end(r"\)")
        .contains(param_children);
    let return_arrow = Mode::new()
        .begin("->")
        .ends_with_parent()
        .keywords(Keywords::keyword("None"));
    Mode::new()
        .class(class)
        .begin_keywords(words)
        .end(":")
        .illegal(r"[${=;\n,]")
        .contains(vec![
            underscore_title().into(),
            params.into(),
            return_arrow.into(),
        ])
}

/// Create the python grammar definition
pub(crate) fn python_grammar() -> Grammar {
    let mut children: Vec<ModeRef> = vec![prompt().into()];
    children.extend(number_modes().into_iter().map(ModeRef::Inline));
    children.extend(string_modes().into_iter().map(ModeRef::Inline));
    children.push(hash_comment().into());
    children.push(declaration(TokenType::Function, "def").into());
    children.push(declaration(TokenType::Class, "class").into());
    children.push(
        Mode::new()
            .class(TokenType::Meta)
            .begin(r"^[\t ]*@")
            .end("$")
            .into(),
    );
    children.push(Mode::new().begin(r"\b(print|exec)\(").into());

    Grammar::new("python")
        .alias(&["py", "gyp"])
        .keywords(python_keywords())
        .illegal(r"(</|->|\?)|=>")
        .contains(children)
}
