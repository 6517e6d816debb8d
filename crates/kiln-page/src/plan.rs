//! Mutation planning
//!
//! A page plus the gate policy and the visitor's cookies determine a
//! flat list of mutations to apply to the rendered page. Planning is a
//! pure function of its inputs, so tests can assert on the mutation
//! list without rendering anything.

use tracing::warn;

use crate::gate::{CookieSource, GatePolicy};
use crate::highlight::{HighlightEngine, HighlightLanguage};
use crate::page::Page;
use crate::render::escape_html;

/// One change to a rendered page
///
/// `block` indexes into [`Page::blocks`] in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Make a code block visible
    Reveal {
        /// Index of the block
        block: usize,
    },
    /// Replace a code block's content with highlighted markup
    Highlight {
        /// Index of the block
        block: usize,
        /// Inner HTML for the block's `<code>` element
        html: String,
    },
    /// Append a login overlay to a code block
    Overlay {
        /// Index of the block
        block: usize,
        /// Overlay markup
        html: String,
    },
}

/// Plan the mutations for one page and one visitor
///
/// Every block is revealed and highlighted, in document order. When the
/// gate applies to this visitor, one overlay per block follows, again
/// in document order. Highlighting always precedes gating. A block that
/// cannot be highlighted falls back to escaped plain text; the failure
/// touches that block only.
#[must_use]
pub fn plan(
    page: &Page,
    engine: &HighlightEngine,
    policy: &GatePolicy,
    cookies: &dyn CookieSource,
) -> Vec<Mutation> {
    let mut mutations = Vec::with_capacity(page.blocks.len() * 2);

    for (index, block) in page.blocks.iter().enumerate() {
        mutations.push(Mutation::Reveal { block: index });
        mutations.push(Mutation::Highlight {
            block: index,
            html: highlight_block(engine, block.language.as_deref(), &block.code),
        });
    }

    if policy.should_gate(cookies) {
        let overlay = policy.overlay_html();
        for index in 0..page.blocks.len() {
            mutations.push(Mutation::Overlay {
                block: index,
                html: overlay.clone(),
            });
        }
    }

    mutations
}

fn highlight_block(engine: &HighlightEngine, language: Option<&str>, code: &str) -> String {
    let Some(language) = language.and_then(HighlightLanguage::from_token) else {
        return escape_html(code);
    };

    match engine.highlight(language, code) {
        Ok(html) => html,
        Err(error) => {
            warn!(language = language.name(), %error, "highlighting failed, using plain text");
            escape_html(code)
        }
    }
}
