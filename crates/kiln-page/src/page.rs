//! Markdown page parsing
//!
//! Splits YAML frontmatter from the body and collects the ordered code
//! blocks the planner and renderer operate on. Both walks use the same
//! parser options, so block indices line up between parse and render.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use tracing::warn;

/// Code block extracted from a page, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language token from the fence info string (e.g. "rust")
    pub language: Option<String>,
    /// Literal code content
    pub code: String,
}

/// A parsed Markdown page
#[derive(Debug, Clone)]
pub struct Page {
    /// Title from frontmatter, falling back to the first H1
    pub title: Option<String>,
    /// Frontmatter metadata, if the page carried any
    pub metadata: Option<serde_yaml::Value>,
    /// Markdown body with the frontmatter stripped
    pub body: String,
    /// Code blocks in source order
    pub blocks: Vec<CodeBlock>,
}

impl Page {
    /// Parse a page from its Markdown source
    ///
    /// Never fails: a page with malformed frontmatter is treated as
    /// having none, and a page without code blocks parses to an empty
    /// block list.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let (metadata, body) = extract_frontmatter(source);

        let mut blocks = Vec::new();
        let mut first_h1: Option<String> = None;
        let mut capturing_h1 = false;
        let mut current_code: Option<(Option<String>, String)> = None;

        for event in Parser::new_ext(&body, parser_options()) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    current_code = Some((language_token(&kind), String::new()));
                }
                Event::Text(text) => {
                    if let Some((_, ref mut code)) = current_code {
                        code.push_str(&text);
                    } else if capturing_h1 {
                        match first_h1 {
                            Some(ref mut title) => title.push_str(&text),
                            None => first_h1 = Some(text.to_string()),
                        }
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((language, code)) = current_code.take() {
                        blocks.push(CodeBlock { language, code });
                    }
                }
                Event::Start(Tag::Heading {
                    level: HeadingLevel::H1,
                    ..
                }) if first_h1.is_none() => {
                    capturing_h1 = true;
                }
                Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                    capturing_h1 = false;
                }
                _ => {}
            }
        }

        let title = metadata
            .as_ref()
            .and_then(|m| m.get("title"))
            .and_then(|t| t.as_str())
            .map(String::from)
            .or(first_h1);

        Self {
            title,
            metadata,
            body,
            blocks,
        }
    }
}

/// Parser options shared by the parse and render walks
pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// First token of a fence info string, e.g. `rust,no_run` → `rust`
pub(crate) fn language_token(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info
            .split([' ', '\t', ','])
            .next()
            .filter(|token| !token.is_empty())
            .map(String::from),
        CodeBlockKind::Indented => None,
    }
}

fn extract_frontmatter(source: &str) -> (Option<serde_yaml::Value>, String) {
    if let Some(stripped) = source.strip_prefix("---") {
        if let Some(end) = stripped.find("\n---") {
            let frontmatter = &stripped[..end];
            let mut body = &stripped[end + 4..];
            body = body.strip_prefix('\r').unwrap_or(body);
            body = body.strip_prefix('\n').unwrap_or(body);
            match serde_yaml::from_str(frontmatter) {
                Ok(value) => return (Some(value), body.to_string()),
                Err(e) => {
                    warn!(error = %e, "frontmatter is not valid YAML, ignoring");
                }
            }
        }
    }
    (None, source.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_title_from_first_h1() {
        let page = Page::parse("# Install Guide\n\nSome prose.\n");
        assert_eq!(page.title, Some("Install Guide".to_string()));
        assert!(page.metadata.is_none());
        assert!(page.blocks.is_empty());
    }

    #[test]
    fn page_frontmatter_title_wins() {
        let source = r#"---
title: From Frontmatter
layout: docs
---

# From Heading
"#;
        let page = Page::parse(source);
        assert_eq!(page.title, Some("From Frontmatter".to_string()));
        let metadata = page.metadata.unwrap();
        assert_eq!(metadata["layout"], "docs");
        assert!(page.body.starts_with("\n# From Heading"));
    }

    #[test]
    fn page_collects_blocks_in_order() {
        let source = r#"# Demo

```rust
fn main() {}
```

Text between.

```python
print("hi")
```
"#;
        let page = Page::parse(source);
        assert_eq!(page.blocks.len(), 2);
        assert_eq!(page.blocks[0].language, Some("rust".to_string()));
        assert_eq!(page.blocks[0].code, "fn main() {}\n");
        assert_eq!(page.blocks[1].language, Some("python".to_string()));
    }

    #[test]
    fn page_fence_info_takes_first_token() {
        let page = Page::parse("```rust,no_run\nlet x = 1;\n```\n");
        assert_eq!(page.blocks[0].language, Some("rust".to_string()));
    }

    #[test]
    fn page_indented_block_has_no_language() {
        let page = Page::parse("paragraph\n\n    indented code\n");
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].language, None);
        assert_eq!(page.blocks[0].code, "indented code\n");
    }

    #[test]
    fn page_bad_frontmatter_is_ignored() {
        let source = "---\n[not yaml\n---\n\n# Title\n";
        let page = Page::parse(source);
        assert!(page.metadata.is_none());
        // Body keeps the full input when frontmatter fails to parse
        assert!(page.body.starts_with("---"));
    }

    #[test]
    fn page_empty_source() {
        let page = Page::parse("");
        assert!(page.title.is_none());
        assert!(page.blocks.is_empty());
        assert!(page.body.is_empty());
    }

    #[test]
    fn page_inline_code_is_not_a_block() {
        let page = Page::parse("Use `cargo build` to compile.\n");
        assert!(page.blocks.is_empty());
    }
}
