//! Language auto-detection
//!
//! Runs the tokenizer against every candidate grammar independently
//! and ranks the results by relevance. Detection is deterministic: the
//! comparison is strictly-greater, so ties go to the earliest
//! registered grammar, and a grammar whose illegal guard fires simply
//! scores zero.

use crate::registry::Registry;
use crate::render;
use crate::token::{Highlight, Token};
use crate::tokenizer;

/// Detect the best-matching grammar for `text`
///
/// `candidates` limits the search to the given names; unregistered
/// names are skipped. With no candidate list every registered grammar
/// participates, in registration order.
pub(crate) fn tokenize_auto(
    registry: &mut Registry,
    text: &str,
    candidates: Option<&[&str]>,
) -> Highlight {
    let names: Vec<String> = match candidates {
        Some(list) => list
            .iter()
            .filter_map(|name| registry.canonical_name(name))
            .collect(),
        None => registry.language_names(),
    };

    let mut best = plain_result(registry, text);
    let mut second_best = best.clone();

    for name in names {
        let compiled = match registry.compiled(&name) {
            Ok(compiled) => compiled,
            Err(error) => {
                tracing::debug!(language = %name, %error, "skipping candidate");
                continue;
            }
        };
        // An illegal lexeme means the grammar does not fit; score zero
        // and move on.
        let output = match tokenizer::run(registry, &compiled, text, false) {
            Ok(output) => output,
            Err(_) => continue,
        };
        let markup = render::render_tokens(&output.tokens, registry.config());
        let candidate = Highlight {
            language: Some(name),
            relevance: output.relevance,
            tokens: output.tokens,
            markup,
            second_best: None,
        };
        if candidate.relevance > second_best.relevance {
            second_best = candidate.clone();
        }
        if candidate.relevance > best.relevance {
            second_best = std::mem::replace(&mut best, candidate);
        }
    }

    tracing::debug!(
        language = best.language.as_deref().unwrap_or("<none>"),
        relevance = best.relevance,
        "auto-detection result"
    );
    if second_best.language.is_some() {
        best.second_best = Some(Box::new(second_best));
    }
    best
}

/// The zero-score fallback: the whole input as one unclassified token
fn plain_result(registry: &Registry, text: &str) -> Highlight {
    let tokens = if text.is_empty() {
        Vec::new()
    } else {
        vec![Token {
            kind: None,
            text: text.to_string(),
            start: 0,
            end: text.len(),
        }]
    };
    let markup = render::render_tokens(&tokens, registry.config());
    Highlight {
        language: None,
        relevance: 0,
        tokens,
        markup,
        second_best: None,
    }
}
