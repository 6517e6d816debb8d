//! HTML rendering
//!
//! Applies a mutation list to a parsed page and produces the final
//! body HTML. Code blocks carry no visibility style unless a reveal
//! mutation targets them, so a page rendered with an empty mutation
//! list keeps its blocks hidden.

use std::collections::HashMap;

use pulldown_cmark::{html, CowStr, Event, Parser, Tag, TagEnd};

use crate::page::{language_token, parser_options, Page};
use crate::plan::Mutation;

/// Render a page's body with the given mutations applied
///
/// Mutations address blocks by index in document order. Indexes past
/// the last block are ignored. A block with no highlight mutation
/// renders as escaped plain text.
#[must_use]
pub fn render(page: &Page, mutations: &[Mutation]) -> String {
    let mut revealed = vec![false; page.blocks.len()];
    let mut highlights: HashMap<usize, &str> = HashMap::new();
    let mut overlays: HashMap<usize, &str> = HashMap::new();
    for mutation in mutations {
        match mutation {
            Mutation::Reveal { block } => {
                if let Some(slot) = revealed.get_mut(*block) {
                    *slot = true;
                }
            }
            Mutation::Highlight { block, html } => {
                highlights.insert(*block, html.as_str());
            }
            Mutation::Overlay { block, html } => {
                overlays.insert(*block, html.as_str());
            }
        }
    }

    let mut events = Vec::new();
    let mut block_index = 0usize;
    let mut current: Option<(Option<String>, String)> = None;

    for event in Parser::new_ext(&page.body, parser_options()) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                current = Some((language_token(&kind), String::new()));
            }
            Event::Text(text) => match current.as_mut() {
                Some((_, raw)) => raw.push_str(&text),
                None => events.push(Event::Text(text)),
            },
            Event::End(TagEnd::CodeBlock) => {
                let (language, raw) = current.take().unwrap_or((None, String::new()));
                let block = code_block_html(
                    language.as_deref(),
                    &raw,
                    revealed.get(block_index).copied().unwrap_or(false),
                    highlights.get(&block_index).copied(),
                    overlays.get(&block_index).copied(),
                );
                events.push(Event::Html(CowStr::from(block)));
                block_index += 1;
            }
            other => events.push(other),
        }
    }

    let mut out = String::with_capacity(page.body.len() * 2);
    html::push_html(&mut out, events.into_iter());
    out
}

fn code_block_html(
    language: Option<&str>,
    raw: &str,
    revealed: bool,
    highlight: Option<&str>,
    overlay: Option<&str>,
) -> String {
    let mut out = String::from("<pre><code");
    if let Some(language) = language {
        out.push_str(" class=\"language-");
        out.push_str(&escape_html(language));
        out.push('"');
    }
    if revealed {
        out.push_str(" style=\"visibility:visible\"");
    }
    out.push('>');
    match highlight {
        Some(html) => out.push_str(html),
        None => out.push_str(&escape_html(raw)),
    }
    // Overlays append inside the code element, after its content
    if let Some(overlay) = overlay {
        out.push_str(overlay);
    }
    out.push_str("</code></pre>\n");
    out
}

/// Escape text for HTML content and attribute positions
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
