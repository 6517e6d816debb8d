//! Syntax highlighting via tree-sitter
//!
//! Grammar configurations are compiled once per language on first use
//! and shared for the rest of the run. A grammar that fails to load
//! degrades the blocks that needed it, nothing else.

use once_cell::sync::{Lazy, OnceCell};
use tree_sitter_highlight::{Highlight, HighlightConfiguration, HighlightEvent, Highlighter};

use crate::render::escape_html;

/// Capture names recognized by the highlighter, in index order
const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",
    "comment",
    "constant",
    "constant.builtin",
    "constructor",
    "embedded",
    "function",
    "function.builtin",
    "keyword",
    "module",
    "number",
    "operator",
    "property",
    "punctuation",
    "punctuation.bracket",
    "punctuation.delimiter",
    "string",
    "string.special",
    "tag",
    "type",
    "type.builtin",
    "variable",
    "variable.builtin",
    "variable.parameter",
];

/// CSS classes corresponding to [`HIGHLIGHT_NAMES`] (dots become dashes)
static HIGHLIGHT_CLASSES: Lazy<Vec<String>> = Lazy::new(|| {
    HIGHLIGHT_NAMES
        .iter()
        .map(|name| format!("hl-{}", name.replace('.', "-")))
        .collect()
});

/// Languages with a bundled grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightLanguage {
    /// Rust
    Rust,
    /// TypeScript, also used for plain JavaScript
    TypeScript,
    /// TSX / JSX
    Tsx,
    /// Python
    Python,
    /// Go
    Go,
}

impl HighlightLanguage {
    const COUNT: usize = 5;

    const fn index(self) -> usize {
        match self {
            Self::Rust => 0,
            Self::TypeScript => 1,
            Self::Tsx => 2,
            Self::Python => 3,
            Self::Go => 4,
        }
    }

    /// Resolve a fence language token to a grammar
    ///
    /// The TypeScript grammar parses plain JavaScript, so `js` fences
    /// share it.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "rust" | "rs" => Some(Self::Rust),
            "typescript" | "ts" | "javascript" | "js" => Some(Self::TypeScript),
            "tsx" | "jsx" => Some(Self::Tsx),
            "python" | "py" => Some(Self::Python),
            "go" | "golang" => Some(Self::Go),
            _ => None,
        }
    }

    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::Python => "python",
            Self::Go => "go",
        }
    }
}

/// Errors from the highlighter
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    /// A grammar's highlight query failed to compile
    #[error("grammar for {language} failed to load: {source}")]
    Grammar {
        /// Language whose grammar failed
        language: &'static str,
        /// Query compilation error
        #[source]
        source: tree_sitter::QueryError,
    },

    /// Highlighting a block failed
    #[error("highlighting failed: {0}")]
    Highlight(#[from] tree_sitter_highlight::Error),
}

/// Shared highlighter with per-language grammar configurations
///
/// Construction is cheap; each grammar compiles its queries the first
/// time a block needs it.
pub struct HighlightEngine {
    configs: [OnceCell<HighlightConfiguration>; HighlightLanguage::COUNT],
}

impl HighlightEngine {
    /// Create an engine covering every bundled grammar
    #[must_use]
    pub fn new() -> Self {
        Self {
            configs: Default::default(),
        }
    }

    /// Highlight `code` as `language`, producing HTML span markup
    ///
    /// The output is the inner HTML of a `<code>` element: escaped
    /// source text wrapped in `<span class="hl-...">` runs.
    ///
    /// # Errors
    /// Returns error if the grammar fails to load or the block cannot
    /// be highlighted. Callers treat this as cosmetic and fall back to
    /// escaped plain text.
    pub fn highlight(
        &self,
        language: HighlightLanguage,
        code: &str,
    ) -> Result<String, HighlightError> {
        let config = self.config(language)?;

        let mut highlighter = Highlighter::new();
        let events = highlighter.highlight(config, code.as_bytes(), None, |_| None)?;

        let mut out = String::with_capacity(code.len() * 2);
        for event in events {
            match event? {
                HighlightEvent::Source { start, end } => {
                    out.push_str(&escape_html(&code[start..end]));
                }
                HighlightEvent::HighlightStart(Highlight(index)) => {
                    out.push_str("<span class=\"");
                    out.push_str(&HIGHLIGHT_CLASSES[index]);
                    out.push_str("\">");
                }
                HighlightEvent::HighlightEnd => out.push_str("</span>"),
            }
        }
        Ok(out)
    }

    fn config(
        &self,
        language: HighlightLanguage,
    ) -> Result<&HighlightConfiguration, HighlightError> {
        self.configs[language.index()].get_or_try_init(|| build_configuration(language))
    }
}

impl Default for HighlightEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn build_configuration(
    language: HighlightLanguage,
) -> Result<HighlightConfiguration, HighlightError> {
    let result = match language {
        HighlightLanguage::Rust => HighlightConfiguration::new(
            tree_sitter_rust::LANGUAGE.into(),
            "rust",
            tree_sitter_rust::HIGHLIGHTS_QUERY,
            tree_sitter_rust::INJECTIONS_QUERY,
            "",
        ),
        HighlightLanguage::TypeScript => HighlightConfiguration::new(
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            "typescript",
            tree_sitter_typescript::HIGHLIGHTS_QUERY,
            "",
            tree_sitter_typescript::LOCALS_QUERY,
        ),
        HighlightLanguage::Tsx => HighlightConfiguration::new(
            tree_sitter_typescript::LANGUAGE_TSX.into(),
            "tsx",
            tree_sitter_typescript::HIGHLIGHTS_QUERY,
            "",
            tree_sitter_typescript::LOCALS_QUERY,
        ),
        HighlightLanguage::Python => HighlightConfiguration::new(
            tree_sitter_python::LANGUAGE.into(),
            "python",
            tree_sitter_python::HIGHLIGHTS_QUERY,
            "",
            "",
        ),
        HighlightLanguage::Go => HighlightConfiguration::new(
            tree_sitter_go::LANGUAGE.into(),
            "go",
            tree_sitter_go::HIGHLIGHTS_QUERY,
            "",
            "",
        ),
    };

    let mut config = result.map_err(|e| HighlightError::Grammar {
        language: language.name(),
        source: e,
    })?;
    config.configure(HIGHLIGHT_NAMES);
    Ok(config)
}
