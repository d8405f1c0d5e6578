//! Builtin grammar definitions
//!
//! A starter set covering configuration, data, shell, markup, and
//! scripting syntax. Each grammar lives in its own file and is
//! registered by [`crate::Registry::with_builtins`] in the order
//! below.

mod common;

mod bash;
mod diff;
mod ini;
mod json;
mod markdown;
mod python;
mod xml;

use crate::grammar::Grammar;

/// All builtin grammar definitions, in registration order
pub(crate) fn all_grammars() -> Vec<Grammar> {
    vec![
        ini::ini_grammar(),
        diff::diff_grammar(),
        bash::bash_grammar(),
        python::python_grammar(),
        xml::xml_grammar(),
        markdown::markdown_grammar(),
        json::json_grammar(),
    ]
}
