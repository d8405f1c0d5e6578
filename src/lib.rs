//! hilite - a generic multi-language syntax highlighting engine
//!
//! Grammars describe a language's lexical structure as a declarative
//! mode tree; the registry compiles them once into efficient matchers
//! and streams input through a mode-stack tokenizer, emitting a flat
//! stream of classified spans. When no language is given, every
//! registered grammar is scored and the most relevant wins. Rendered
//! markup preserves any tags already present in the input.
//!
//! ```
//! use hilite::Registry;
//!
//! let mut registry = Registry::with_builtins();
//! let result = registry.tokenize("ini", "[section]\nkey = 1\n").unwrap();
//! assert!(result.markup.contains("hljs-section"));
//!
//! let detected = registry.tokenize_auto("{\"a\": [1, 2]}", None);
//! assert_eq!(detected.language.as_deref(), Some("json"));
//! ```

mod builtin;
mod compile;
mod config;
mod detect;
mod error;
mod grammar;
mod grammar_file;
mod registry;
mod render;
mod token;
mod tokenizer;

pub use config::{Config, ConfigPatch};
pub use error::{HighlightError, Result};
pub use grammar::{Grammar, Keywords, Mode, ModeRef};
pub use registry::Registry;
pub use token::{Highlight, Token, TokenType};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_round_trip(registry: &mut Registry, language: &str, text: &str) {
        let result = registry.tokenize(language, text).unwrap();
        let joined: String = result.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, text, "{language} must reproduce its input");

        let mut offset = 0;
        for token in &result.tokens {
            assert_eq!(token.start, offset, "{language} spans must not overlap");
            assert!(token.start < token.end);
            offset = token.end;
        }
    }

    #[test]
    fn test_round_trip_across_builtins() {
        let mut registry = Registry::with_builtins();
        let samples = [
            ("ini", "[core]\nname = \"demo\"\nspeed = 9\n"),
            ("json", "{\"k\": [true, null, 2.5]}"),
            ("diff", "--- a/x\n+++ b/x\n@@ -1,2 +1,2 @@\n-old\n+new\n"),
            ("bash", "#!/bin/sh\nexport P=\"$HOME\"\n"),
            ("xml", "<p class=\"big\">text</p>"),
            ("markdown", "# h\n\n- a\n- b\n\n`code`\n"),
            ("python", "def f(x):\n    return x\n"),
        ];
        for (language, text) in samples {
            assert_round_trip(&mut registry, language, text);
        }
    }

    #[test]
    fn test_auto_detection_is_deterministic() {
        let mut registry = Registry::with_builtins();
        let text = "[section]\nkey = 1\n";
        let first = registry.tokenize_auto(text, None);
        assert_eq!(first.language.as_deref(), Some("ini"));
        for _ in 0..3 {
            let again = registry.tokenize_auto(text, None);
            assert_eq!(again.language, first.language);
            assert_eq!(again.relevance, first.relevance);
        }
    }

    #[test]
    fn test_auto_detection_shebang() {
        let mut registry = Registry::with_builtins();
        let result = registry.tokenize_auto("#!/bin/bash\necho hi\n", None);
        assert_eq!(result.language.as_deref(), Some("bash"));
    }

    #[test]
    fn test_ini_assignment_tokens() {
        let mut registry = Registry::with_builtins();
        let result = registry.tokenize("ini", "[section]\nkey = 1\n").unwrap();
        let kinds: Vec<_> = result
            .tokens
            .iter()
            .map(|t| (t.kind, t.text.as_str()))
            .collect();
        assert!(kinds.contains(&(Some(TokenType::Section), "[section]")));
        assert!(kinds.contains(&(Some(TokenType::Attr), "key")));
        assert!(kinds.contains(&(Some(TokenType::Number), "1")));
    }

    #[test]
    fn test_json_member_tokens() {
        let mut registry = Registry::with_builtins();
        let result = registry.tokenize("json", "{\"a\":1}").unwrap();
        let kinds: Vec<_> = result
            .tokens
            .iter()
            .map(|t| (t.kind, t.text.as_str()))
            .collect();
        assert!(kinds.contains(&(Some(TokenType::Attr), "\"a\"")));
        assert!(kinds.contains(&(None, ":")));
        assert!(kinds.contains(&(Some(TokenType::Number), "1")));
    }

    #[test]
    fn test_configure_empty_is_idempotent() {
        let mut registry = Registry::with_builtins();
        registry.configure(ConfigPatch {
            class_prefix: Some("lang-".to_string()),
            ..Default::default()
        });
        let before = registry.config().clone();
        registry.configure(ConfigPatch::default());
        assert_eq!(*registry.config(), before);
    }

    #[test]
    fn test_duplicate_builtin_rejected() {
        let mut registry = Registry::with_builtins();
        let count = registry.list_languages().len();
        let result = registry.register(Grammar::new("json"));
        assert!(matches!(result, Err(HighlightError::DuplicateName(_))));
        assert_eq!(registry.list_languages().len(), count);
    }
}
