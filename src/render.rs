//! Markup rendering
//!
//! Turns a token stream into HTML-style markup: classified spans get a
//! `<span>` with the configured class prefix, reserved characters are
//! escaped, and inputs that already contain markup keep their tags,
//! merged with the new classification spans by offset so nesting is
//! never corrupted. The tab-replacement and line-break transforms run
//! as plain text rewrites over the finished markup.

use regex::Regex;

use crate::config::Config;
use crate::error::Result;
use crate::registry::Registry;
use crate::token::{Highlight, Token, TokenType};

/// Escape markup-reserved characters
pub(crate) fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn open_span(kind: TokenType, config: &Config) -> String {
    format!("<span class=\"{}{}\">", config.class_prefix, kind.name())
}

/// Render a token stream as markup
pub(crate) fn render_tokens(tokens: &[Token], config: &Config) -> String {
    let mut out = String::new();
    for token in tokens {
        match token.kind {
            Some(kind) => {
                out.push_str(&open_span(kind, config));
                out.push_str(&escape(&token.text));
                out.push_str("</span>");
            }
            None => out.push_str(&escape(&token.text)),
        }
    }
    out
}

/// Apply the configured text transforms to rendered markup
///
/// Tab replacement rewrites tabs in line-leading runs; the line-break
/// option turns newlines into `<br>` tags.
pub(crate) fn fix_markup(markup: &str, config: &Config) -> String {
    if config.tab_replacement.is_none() && !config.use_line_break_tag {
        return markup.to_string();
    }
    let pattern =
        Regex::new(r"(?m)(^(?:<[^>]+>|\t)+|\n)").expect("line-leading transform pattern compiles");
    pattern
        .replace_all(markup, |caps: &regex::Captures| {
            let matched = &caps[0];
            if config.use_line_break_tag && matched == "\n" {
                "<br>".to_string()
            } else if let Some(replacement) = &config.tab_replacement {
                matched.replace('\t', replacement)
            } else {
                matched.to_string()
            }
        })
        .into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Start,
    Stop,
}

/// A tag boundary from the original input, positioned in the stripped
/// plain text
#[derive(Debug)]
pub(crate) struct TagEvent {
    kind: EventKind,
    offset: usize,
    markup: String,
}

/// Elements whose tags never produce a matching stop event
fn is_void_element(name: &str) -> bool {
    matches!(name, "br" | "hr" | "img" | "input")
}

/// Strip tags from `source`, returning the plain text and the tag
/// events positioned by plain-text offset
pub(crate) fn extract_markup(source: &str) -> (String, Vec<TagEvent>) {
    let tag_pattern = Regex::new(r"(?s)</?[A-Za-z][^>]*>").expect("tag pattern compiles");
    let mut plain = String::new();
    let mut events = Vec::new();
    let mut last = 0;

    for m in tag_pattern.find_iter(source) {
        plain.push_str(&decode_entities(&source[last..m.start()]));
        last = m.end();

        let tag = m.as_str();
        let closing = tag.starts_with("</");
        let name_start = if closing { 2 } else { 1 };
        let name: String = tag[name_start..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect::<String>()
            .to_lowercase();

        if closing {
            if !is_void_element(&name) {
                events.push(TagEvent {
                    kind: EventKind::Stop,
                    offset: plain.len(),
                    markup: format!("</{name}>"),
                });
            }
        } else {
            events.push(TagEvent {
                kind: EventKind::Start,
                offset: plain.len(),
                markup: tag.to_string(),
            });
            if !is_void_element(&name) && tag.ends_with("/>") {
                events.push(TagEvent {
                    kind: EventKind::Stop,
                    offset: plain.len(),
                    markup: format!("</{name}>"),
                });
            }
        }
    }
    plain.push_str(&decode_entities(&source[last..]));
    (plain, events)
}

/// Decode the basic entities so tokenization sees the literal text
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// True when the next event to process comes from the original stream
fn picks_original(
    original: &[TagEvent],
    i: usize,
    highlight: &[(EventKind, usize, TokenType)],
    j: usize,
) -> bool {
    if i >= original.len() {
        return false;
    }
    if j >= highlight.len() {
        return true;
    }
    if original[i].offset != highlight[j].1 {
        original[i].offset < highlight[j].1
    } else {
        // At the same offset, original tags go outside a span that is
        // about to open, but inside one that is about to close.
        highlight[j].0 == EventKind::Start
    }
}

/// Interleave the original tag events with the classification spans
pub(crate) fn merge_markup(
    original: &[TagEvent],
    tokens: &[Token],
    plain: &str,
    config: &Config,
) -> String {
    let mut highlight: Vec<(EventKind, usize, TokenType)> = Vec::new();
    for token in tokens {
        if let Some(kind) = token.kind {
            highlight.push((EventKind::Start, token.start, kind));
            highlight.push((EventKind::Stop, token.end, kind));
        }
    }

    let mut result = String::new();
    let mut processed = 0;
    let mut open: Vec<TokenType> = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < original.len() || j < highlight.len() {
        let use_original = picks_original(original, i, &highlight, j);
        let offset = if use_original {
            original[i].offset
        } else {
            highlight[j].1
        };
        result.push_str(&escape(&plain[processed..offset]));
        processed = offset;

        if use_original {
            // Close the open classification spans, pass the tags
            // through, then reopen the spans inside them.
            for _ in &open {
                result.push_str("</span>");
            }
            loop {
                result.push_str(&original[i].markup);
                i += 1;
                if !(i < original.len()
                    && original[i].offset == offset
                    && picks_original(original, i, &highlight, j))
                {
                    break;
                }
            }
            for kind in &open {
                result.push_str(&open_span(*kind, config));
            }
        } else {
            let (kind, _, class) = highlight[j];
            if kind == EventKind::Start {
                open.push(class);
                result.push_str(&open_span(class, config));
            } else {
                open.pop();
                result.push_str("</span>");
            }
            j += 1;
        }
    }
    result.push_str(&escape(&plain[processed..]));
    result
}

/// Highlight input that may already contain markup
pub(crate) fn highlight_block(
    registry: &mut Registry,
    source: &str,
    language: Option<&str>,
) -> Result<Highlight> {
    let prepared: String;
    let source = if registry.config().use_line_break_tag {
        let br_pattern = Regex::new(r"(?i)<br[ /]*>").expect("br pattern compiles");
        prepared = br_pattern
            .replace_all(&source.replace('\n', ""), "\n")
            .into_owned();
        &prepared
    } else {
        source
    };

    let (plain, events) = extract_markup(source);
    let mut result = match language {
        Some(name) => registry.tokenize(name, &plain)?,
        None => registry.tokenize_auto(&plain, None),
    };
    if !events.is_empty() {
        result.markup = merge_markup(&events, &result.tokens, &plain, registry.config());
    }
    result.markup = fix_markup(&result.markup, registry.config());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigPatch;
    use crate::grammar::{Grammar, Keywords};
    use pretty_assertions::assert_eq;

    fn keyword_registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register(Grammar::new("demo").keywords(Keywords::keyword("let")))
            .unwrap();
        registry
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }

    #[test]
    fn test_render_tokens_uses_class_prefix() {
        let mut registry = keyword_registry();
        registry.configure(ConfigPatch {
            class_prefix: Some("x-".to_string()),
            ..Default::default()
        });
        let result = registry.tokenize("demo", "let a").unwrap();
        assert_eq!(result.markup, "<span class=\"x-keyword\">let</span> a");
    }

    #[test]
    fn test_fix_markup_line_breaks() {
        let config = Config {
            use_line_break_tag: true,
            ..Default::default()
        };
        assert_eq!(fix_markup("a\nb\n", &config), "a<br>b<br>");
    }

    #[test]
    fn test_fix_markup_leading_tabs() {
        let config = Config {
            tab_replacement: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(fix_markup("\t\ta\tb\n\tc", &config), "    a\tb\n  c");
    }

    #[test]
    fn test_fix_markup_without_options_is_identity() {
        let config = Config::default();
        assert_eq!(fix_markup("\ta\nb", &config), "\ta\nb");
    }

    #[test]
    fn test_extract_markup() {
        let (plain, events) = extract_markup("a<b>x &amp; y</b><br>z");
        assert_eq!(plain, "ax & yz");
        // The void <br> produces a start event but no stop.
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].offset, 1);
        assert_eq!(events[0].markup, "<b>");
        assert_eq!(events[1].offset, 6);
        assert_eq!(events[1].markup, "</b>");
        assert_eq!(events[2].offset, 6);
        assert_eq!(events[2].markup, "<br>");
    }

    #[test]
    fn test_merge_preserves_enclosing_tags() {
        let mut registry = keyword_registry();
        let result = registry.highlight_block("<b>let</b> x", Some("demo")).unwrap();
        assert_eq!(
            result.markup,
            "<b><span class=\"hljs-keyword\">let</span></b> x"
        );
    }

    #[test]
    fn test_merge_splits_span_around_tag() {
        let mut registry = keyword_registry();
        let result = registry.highlight_block("le<b>t</b>", Some("demo")).unwrap();
        assert_eq!(
            result.markup,
            "<span class=\"hljs-keyword\">le</span><b><span class=\"hljs-keyword\">t</span></b>"
        );
    }

    #[test]
    fn test_highlight_block_without_tags_matches_tokenize() {
        let mut registry = keyword_registry();
        let block = registry.highlight_block("let x", Some("demo")).unwrap();
        let direct = registry.tokenize("demo", "let x").unwrap();
        assert_eq!(block.markup, direct.markup);
    }

    #[test]
    fn test_highlight_block_line_break_tags() {
        let mut registry = keyword_registry();
        registry.configure(ConfigPatch {
            use_line_break_tag: Some(true),
            ..Default::default()
        });
        let result = registry.highlight_block("let a<br>let b", Some("demo")).unwrap();
        assert_eq!(
            result.markup,
            "<span class=\"hljs-keyword\">let</span> a<br><span class=\"hljs-keyword\">let</span> b"
        );
    }
}
