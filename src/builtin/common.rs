//! Shared mode shapes
//!
//! The building blocks most grammars need: comment modes (with the
//! prose-word and doctag sub-modes that feed detection relevance),
//! quoted strings, escapes, number shapes, and title shapes.

use crate::grammar::Mode;
use crate::token::TokenType;

/// Identifier that may start with an underscore
pub(crate) const UNDERSCORE_IDENT: &str = r"[a-zA-Z_]\w*";
/// Decimal number
pub(crate) const NUMBER: &str = r"\b\d+(\.\d+)?";
/// C-style number: hex, decimal, float, exponent
pub(crate) const C_NUMBER: &str =
    r"(-?)(\b0[xX][a-fA-F0-9]+|(\b\d+(\.\d*)?|\.\d+)([eE][-+]?\d+)?)";
/// Binary number
pub(crate) const BINARY_NUMBER: &str = r"\b(0b[01]+)";

/// A backslash escape inside a string
pub(crate) fn backslash_escape() -> Mode {
    Mode::new().begin(r"\\[\s\S]").relevance(0)
}

/// A single-quoted string that must not span lines
pub(crate) fn apos_string() -> Mode {
    Mode::new()
        .class(TokenType::String)
        .begin("'")
        .end("'")
        .illegal(r"\n")
        .contains(vec![backslash_escape().into()])
}

/// A double-quoted string that must not span lines
pub(crate) fn quote_string() -> Mode {
    Mode::new()
        .class(TokenType::String)
        .begin("\"")
        .end("\"")
        .illegal(r"\n")
        .contains(vec![backslash_escape().into()])
}

/// English prose words; each hit bumps relevance, which is what makes
/// commented-out prose count toward detection
fn prose_words() -> Mode {
    Mode::new().begin(
        r"\b(a|an|the|are|I'm|isn't|don't|doesn't|won't|but|just|should|pretty|simply|enough|gonna|going|wtf|so|such|will|you|your|they|like|more)\b",
    )
}

fn doctag() -> Mode {
    Mode::new()
        .class(TokenType::Doctag)
        .begin("(?:TODO|FIXME|NOTE|BUG|XXX):")
        .relevance(0)
}

/// A comment mode spanning `begin` to `end`
pub(crate) fn comment(begin: &str, end: &str) -> Mode {
    Mode::new()
        .class(TokenType::Comment)
        .begin(begin)
        .end(end)
        .contains(vec![prose_words().into(), doctag().into()])
}

/// `# ...` line comment
pub(crate) fn hash_comment() -> Mode {
    comment("#", "$")
}

/// Decimal number token
pub(crate) fn number() -> Mode {
    Mode::new()
        .class(TokenType::Number)
        .begin(NUMBER)
        .relevance(0)
}

/// C-style number token
pub(crate) fn c_number() -> Mode {
    Mode::new()
        .class(TokenType::Number)
        .begin(C_NUMBER)
        .relevance(0)
}

/// Declared-name token allowing a leading underscore
pub(crate) fn underscore_title() -> Mode {
    Mode::new()
        .class(TokenType::Title)
        .begin(UNDERSCORE_IDENT)
        .relevance(0)
}
