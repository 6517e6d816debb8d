//! Pages task
//!
//! Renders every Markdown file matched by the pages source pattern to
//! an HTML file under the destination, keeping the source layout. Code
//! blocks come out visible and highlighted; when the gate is enabled
//! each one carries a login overlay, since published pages are read by
//! anonymous visitors.

use tokio::fs;
use tracing::debug;

use kiln_page::{escape_html, NoCookies, PageProcessor};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::source::collect_routes;

/// What the pages task did
#[derive(Debug, Clone, Copy, Default)]
pub struct PagesReport {
    /// Pages rendered
    pub pages: usize,
    /// Code blocks across all pages
    pub blocks: usize,
    /// Blocks that received a login overlay
    pub blocks_gated: usize,
}

impl PagesReport {
    /// One-line human summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} pages rendered, {} code blocks ({} gated)",
            self.pages, self.blocks, self.blocks_gated
        )
    }
}

/// Run the pages task
///
/// Pages are rendered sequentially in match order. Destination
/// directories are created as needed; each output swaps the source
/// extension for `.html`.
///
/// # Errors
/// Returns error if sources cannot be walked or a page cannot be read
/// or written. Highlighting problems do not fail the task.
pub async fn run(config: &PipelineConfig) -> Result<PagesReport, PipelineError> {
    let routes = collect_routes(&config.pages.src, &config.pages.dest)?;
    let processor = PageProcessor::new(config.pages.gate.clone());
    let mut report = PagesReport::default();

    for route in routes {
        let source = fs::read_to_string(&route.source)
            .await
            .map_err(|e| PipelineError::io_error(&route.source, e))?;

        let page = processor.process(&source, &NoCookies);
        let title = page
            .title
            .as_deref()
            .or_else(|| route.relative.file_stem())
            .unwrap_or("Untitled");
        let html = page_shell(title, &page.html);

        let output = route.output.with_extension("html");
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PipelineError::io_error(parent, e))?;
        }
        fs::write(&output, &html)
            .await
            .map_err(|e| PipelineError::io_error(&output, e))?;

        debug!(
            file = %route.relative,
            blocks = page.blocks,
            gated = page.blocks_gated,
            "rendered page"
        );
        report.pages += 1;
        report.blocks += page.blocks;
        report.blocks_gated += page.blocks_gated;
    }

    Ok(report)
}

fn page_shell(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_escapes_the_title() {
        let html = page_shell("Q&A <draft>", "<p>hi</p>\n");
        assert!(html.contains("<title>Q&amp;A &lt;draft&gt;</title>"));
        assert!(html.contains("<body>\n<p>hi</p>\n</body>"));
    }
}
