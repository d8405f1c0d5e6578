//! bash grammar

use crate::builtin::common::{backslash_escape, hash_comment};
use crate::grammar::{Grammar, Keywords, Mode};
use crate::token::TokenType;

fn simple_variable() -> Mode {
    Mode::new()
        .class(TokenType::Variable)
        .begin(r"\$[\w\d#@][\w\d_]*")
}

fn braced_variable() -> Mode {
    Mode::new().class(TokenType::Variable).begin(r"\$\{(.*?)\}")
}

/// Create the bash grammar definition
pub(crate) fn bash_grammar() -> Grammar {
    let double_quoted = Mode::new()
        .class(TokenType::String)
        .begin("\"")
        .end("\"")
        .contains(vec![
            backslash_escape().into(),
            simple_variable().into(),
            braced_variable().into(),
            Mode::new()
                .class(TokenType::Variable)
                .begin(r"\$\(")
                .end(r"\)")
                .contains(vec![backslash_escape().into()])
                .into(),
        ]);
    let single_quoted = Mode::new().class(TokenType::String).begin("'").end("'");

    Grammar::new("bash")
        .alias(&["sh", "zsh"])
        .lexemes(r"\b-?[a-z\._]+\b")
        .keywords(
            Keywords::new()
                .group(
                    TokenType::Keyword,
                    "if then else elif fi for while in do done case esac function",
                )
                .group(TokenType::Literal, "true false")
                .group(
                    TokenType::BuiltIn,
                    "break cd continue eval exec exit export getopts hash pwd readonly return \
                     shift test times trap umask unset alias bind builtin caller command declare \
                     echo enable help let local logout mapfile printf read readarray source type \
                     typeset ulimit unalias set shopt autoload bg bindkey bye cap chdir clone \
                     comparguments compcall compctl compdescribe compfiles compgroups compquote \
                     comptags comptry compvalues dirs disable disown echotc echoti emulate fc fg \
                     float functions getcap getln history integer jobs kill limit log noglob popd \
                     print pushd pushln rehash sched setcap setopt stat suspend ttyctl unfunction \
                     unhash unlimit unsetopt vared wait whence where which zcompile zformat zftp \
                     zle zmodload zparseopts zprof zpty zregexparse zsocket zstyle ztcp",
                ),
        )
        .contains(vec![
            Mode::new()
                .class(TokenType::Meta)
                .begin(r"^#![^\n]+sh\s*$")
                .relevance(10)
                .into(),
            Mode::new()
                .class(TokenType::Function)
                .begin(r"\w[\w\d_]*\s*\(\s*\)\s*\{")
                .return_begin()
                .relevance(0)
                .contains(vec![Mode::new()
                    .class(TokenType::Title)
                    .begin(r"\w[\w\d_]*")
                    .relevance(0)
                    .into()])
                .into(),
            hash_comment().into(),
            double_quoted.into(),
            single_quoted.into(),
            simple_variable().into(),
            braced_variable().into(),
        ])
}

#[cfg(test)]
mod tests {
    use crate::registry::Registry;
    use crate::token::TokenType;

    #[test]
    fn test_shebang_scores_high() {
        let mut registry = Registry::with_builtins();
        let result = registry.tokenize("bash", "#!/bin/bash\necho hi\n").unwrap();
        assert!(result.relevance >= 10);
        assert!(result
            .tokens
            .iter()
            .any(|t| t.kind == Some(TokenType::Meta)));
        assert!(result
            .tokens
            .iter()
            .any(|t| t.kind == Some(TokenType::BuiltIn) && t.text == "echo"));
    }

    #[test]
    fn test_variables_in_strings() {
        let mut registry = Registry::with_builtins();
        let result = registry
            .tokenize("sh", "greet=\"hello $name and ${other}\"\n")
            .unwrap();
        let variables: Vec<_> = result
            .tokens
            .iter()
            .filter(|t| t.kind == Some(TokenType::Variable))
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(variables, vec!["$name", "${other}"]);
    }

    #[test]
    fn test_function_title() {
        let mut registry = Registry::with_builtins();
        let result = registry.tokenize("bash", "cleanup() {\n  true\n}\n").unwrap();
        assert!(result
            .tokens
            .iter()
            .any(|t| t.kind == Some(TokenType::Title) && t.text == "cleanup"));
    }
}
