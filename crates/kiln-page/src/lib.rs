//! Kiln Page Processing
//!
//! Turns a Markdown page into HTML in which every code block ends up
//! visible and syntax-highlighted, optionally overlaid with a login gate.
//!
//! # Core Operations
//!
//! - **Parse**: [`Page::parse`] splits frontmatter from the body and
//!   collects the ordered code blocks
//! - **Plan**: [`plan`] is a pure function from parsed page state to an
//!   ordered set of [`Mutation`]s (reveal, highlight, overlay)
//! - **Render**: [`render`] applies the plan while converting the body
//!   to HTML
//!
//! [`PageProcessor`] wires the three together for the pages task.
//!
//! # Architecture
//!
//! ```text
//! Markdown → Page ─→ plan(page, engine, policy, cookies) ─→ [Mutation]
//!                                                               │
//!                    HTML fragment ←──────── render(page, plan) ┘
//! ```
//!
//! Highlight and overlay failures are cosmetic: a block that cannot be
//! highlighted falls back to escaped plain text and stays visible, and
//! the rest of the page is unaffected.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
mod gate;
mod highlight;
mod page;
mod plan;
mod processor;
mod render;

// Re-exports
pub use gate::{
    CookieSource, GatePolicy, NoCookies, StaticCookies, GITHUB_CLIENT_ID, GITHUB_OAUTH_SCOPE,
    LOGIN_WINDOW_FEATURES, LOGIN_WINDOW_NAME,
};
pub use highlight::{HighlightEngine, HighlightError, HighlightLanguage};
pub use page::{CodeBlock, Page};
pub use plan::{plan, Mutation};
pub use processor::{PageProcessor, ProcessedPage};
pub use render::{escape_html, render};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
