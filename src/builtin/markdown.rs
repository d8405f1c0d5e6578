//! markdown grammar

use crate::grammar::{Grammar, Mode};
use crate::token::TokenType;

fn link_reference() -> Mode {
    // [text](url) and [text][ref] forms; the punctuation stays
    // unclassified around the string/link/symbol parts.
    Mode::new()
        .begin(r"\[.+?\][\(\[].*?[\)\]]")
        .return_begin()
        .relevance(10)
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
            Mode::new()
                .class(TokenType::Symbol)
                .begin(r"\]\[")
                .end(r"\]")
                .exclude_begin()
                .exclude_end()
                .into(),
        ])
}

fn link_definition() -> Mode {
    Mode::new()
        .begin(r"^\[[^\n]+\]:")
        .return_begin()
        .contains(vec![
            Mode::new()
                .class(TokenType::Symbol)
                .begin(r"\[")
                .end(r"\]")
                .exclude_begin()
                .exclude_end()
                .into(),
            Mode::new()
                .class(TokenType::Link)
                .begin(r":\s*")
                .end("$")
                .exclude_begin()
                .into(),
        ])
}

/// Create the markdown grammar definition
pub(crate) fn markdown_grammar() -> Grammar {
    Grammar::new("markdown")
        .alias(&["md", "mkdown", "mkd"])
        .contains(vec![
            Mode::new()
                .class(TokenType::Section)
                .begin("^#{1,6}")
                .end("$")
                .into(),
            Mode::new()
                .class(TokenType::Section)
                .begin(r"^.+?\n[=-]{2,}$")
                .into(),
            Mode::new()
                .begin("<")
                .end(">")
                .sub_language("xml")
                .relevance(0)
                .into(),
            Mode::new()
                .class(TokenType::Bullet)
                .begin(r"^([*+-]|(\d+\.))\s+")
                .into(),
            Mode::new()
                .class(TokenType::Strong)
                .begin(r"[*_]{2}.+?[*_]{2}")
                .into(),
            Mode::new()
                .class(TokenType::Emphasis)
                .begin(r"\*.+?\*")
                .into(),
            Mode::new()
                .class(TokenType::Emphasis)
                .begin("_.+?_")
                .relevance(0)
                .into(),
            Mode::new()
                .class(TokenType::Quote)
                .begin(r"^>\s+")
                .end("$")
                .into(),
            Mode::new()
                .class(TokenType::Code)
                .begin(r"^```\w*\s*$")
                .end(r"^```\s*$")
                .into(),
            Mode::new().class(TokenType::Code).begin("`.+?`").into(),
            Mode::new()
                .class(TokenType::Code)
                .begin("^( {4}|\t)")
                .end("$")
                .relevance(0)
                .into(),
            Mode::new().begin(r"^[-\*]{3,}").end("$").into(),
            link_reference().into(),
            link_definition().into(),
        ])
}

#[cfg(test)]
mod tests {
    use crate::registry::Registry;
    use crate::token::TokenType;

    #[test]
    fn test_heading_and_bullet() {
        let mut registry = Registry::with_builtins();
        let result = registry
            .tokenize("markdown", "# Title\n- item\n")
            .unwrap();
        assert!(result
            .tokens
            .iter()
            .any(|t| t.kind == Some(TokenType::Section)));
        assert!(result
            .tokens
            .iter()
            .any(|t| t.kind == Some(TokenType::Bullet)));
    }

    #[test]
    fn test_link_parts() {
        let mut registry = Registry::with_builtins();
        let text = "see [docs](https://example.com) now\n";
        let result = registry.tokenize("md", text).unwrap();

        let joined: String = result.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, text);
        assert!(result
            .tokens
            .iter()
            .any(|t| t.kind == Some(TokenType::String) && t.text == "docs"));
        assert!(result
            .tokens
            .iter()
            .any(|t| t.kind == Some(TokenType::Link) && t.text == "https://example.com"));
    }

    #[test]
    fn test_inline_html_delegates_to_xml() {
        let mut registry = Registry::with_builtins();
        let result = registry.tokenize("markdown", "a <em>b</em> c\n").unwrap();
        assert!(result
            .tokens
            .iter()
            .any(|t| t.kind == Some(TokenType::Name) && t.text == "em"));
    }
}
