//! Renderer configuration
//!
//! Holds the options that shape rendered markup: the styling class
//! prefix, tab replacement, and line-break substitution. Options are
//! applied as a patch onto the current configuration, so an empty
//! patch leaves everything unchanged.

/// Renderer configuration settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prefix for styling classes in rendered spans
    pub class_prefix: String,
    /// Replacement text for tabs in line-leading runs (None = keep tabs)
    pub tab_replacement: Option<String>,
    /// Whether to render line breaks as `<br>` tags
    pub use_line_break_tag: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            class_prefix: "hljs-".to_string(),
            tab_replacement: None,
            use_line_break_tag: false,
        }
    }
}

/// A partial configuration update
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ConfigPatch {
    pub class_prefix: Option<String>,
    pub tab_replacement: Option<String>,
    pub use_line_break_tag: Option<bool>,
}

impl Config {
    /// Apply a patch onto the current configuration
    pub fn apply(&mut self, patch: ConfigPatch) {
        if let Some(prefix) = patch.class_prefix {
            self.class_prefix = prefix;
        }
        if let Some(replacement) = patch.tab_replacement {
            self.tab_replacement = Some(replacement);
        }
        if let Some(use_br) = patch.use_line_break_tag {
            self.use_line_break_tag = use_br;
        }
    }
}
