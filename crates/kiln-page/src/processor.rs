//! One-stop page processing
//!
//! Bundles the highlight engine and gate policy behind a single call
//! that takes Markdown source to final body HTML.

use crate::gate::{CookieSource, GatePolicy};
use crate::highlight::HighlightEngine;
use crate::page::Page;
use crate::plan::{plan, Mutation};
use crate::render::render;

/// A processed page ready to embed in a layout
#[derive(Debug, Clone)]
pub struct ProcessedPage {
    /// Page title from frontmatter or the first heading
    pub title: Option<String>,
    /// Rendered body HTML
    pub html: String,
    /// Number of code blocks on the page
    pub blocks: usize,
    /// Number of blocks that received a login overlay
    pub blocks_gated: usize,
}

/// Parses, plans and renders pages with a fixed policy
pub struct PageProcessor {
    engine: HighlightEngine,
    policy: GatePolicy,
}

impl PageProcessor {
    /// Create a processor with the given gate policy
    #[must_use]
    pub fn new(policy: GatePolicy) -> Self {
        Self {
            engine: HighlightEngine::new(),
            policy,
        }
    }

    /// Process one page for one visitor
    ///
    /// Never fails: highlighting problems degrade individual blocks to
    /// plain text and everything else renders as usual.
    #[must_use]
    pub fn process(&self, source: &str, cookies: &dyn CookieSource) -> ProcessedPage {
        let page = Page::parse(source);
        let mutations = plan(&page, &self.engine, &self.policy, cookies);
        let blocks_gated = mutations
            .iter()
            .filter(|m| matches!(m, Mutation::Overlay { .. }))
            .count();
        let html = render(&page, &mutations);

        ProcessedPage {
            title: page.title.clone(),
            html,
            blocks: page.blocks.len(),
            blocks_gated,
        }
    }
}
