// src/formatting/document.rs
//! Wraps a rendered body in the HTML document shell.
//!
//! The shell is a Handlebars template compiled into the binary. The title
//! goes through Handlebars' escaping; the body is already markup and is
//! inserted raw.

use super::block_renderer::render_blocks;
use super::stylesheet::{stylesheet, StylesheetMode};
use crate::constants::STYLESHEET_FILE_NAME;
use crate::error::AppError;
use crate::model::{DocumentContent, DocumentInfo, Forest};
use crate::types::RenderedHtml;
use handlebars::Handlebars;
use serde_json::json;

const TEMPLATE_NAME: &str = "document";
const DOCUMENT_TEMPLATE: &str = include_str!("../../templates/document.hbs");

/// Compiled document shell.
pub struct DocumentShell {
    handlebars: Handlebars<'static>,
}

impl DocumentShell {
    pub fn new() -> Result<Self, AppError> {
        let mut handlebars = Handlebars::new();
        handlebars
            .register_template_string(TEMPLATE_NAME, DOCUMENT_TEMPLATE)
            .map_err(|e| AppError::TemplateRenderError {
                name: TEMPLATE_NAME.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { handlebars })
    }

    /// Renders the complete document around `body`.
    pub fn render(
        &self,
        document: &DocumentInfo,
        body: &str,
        mode: StylesheetMode,
    ) -> Result<RenderedHtml, AppError> {
        let (inline_css, stylesheet_href) = match mode {
            StylesheetMode::Inline => (Some(stylesheet()), None),
            StylesheetMode::External => (None, Some(STYLESHEET_FILE_NAME)),
        };

        let data = json!({
            "title": document.display_title(),
            "document_id": document.document_id.as_str(),
            "version": env!("CARGO_PKG_VERSION"),
            "inline_css": inline_css,
            "stylesheet_href": stylesheet_href,
            "body": body,
        });

        let html = self.handlebars.render(TEMPLATE_NAME, &data)?;
        Ok(RenderedHtml::new(html))
    }
}

/// Renders a fetched document into a standalone HTML page.
pub fn render_document(
    content: &DocumentContent,
    forest: &Forest,
    mode: StylesheetMode,
) -> Result<RenderedHtml, AppError> {
    let body = render_blocks(&content.blocks, forest)?;
    let html = DocumentShell::new()?.render(&content.document, &body, mode)?;

    log::info!(
        "Rendered '{}' ({} bytes of HTML)",
        content.document.display_title(),
        html.len()
    );
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentId;

    fn info(title: &str) -> DocumentInfo {
        DocumentInfo {
            document_id: DocumentId::parse("doxAbc").unwrap(),
            title: title.to_string(),
            revision_id: 1,
        }
    }

    #[test]
    fn test_title_is_escaped_and_body_is_raw() {
        let shell = DocumentShell::new().unwrap();
        let html = shell
            .render(&info("A <b> & C"), "<p>body</p>", StylesheetMode::Inline)
            .unwrap();
        let html = html.as_str();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>A &lt;b&gt; &amp; C</title>"));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains("<style>"));
        assert!(!html.contains("<link rel=\"stylesheet\""));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_external_stylesheet_is_linked() {
        let shell = DocumentShell::new().unwrap();
        let html = shell
            .render(&info("Doc"), "", StylesheetMode::External)
            .unwrap();

        assert!(html
            .as_str()
            .contains("<link rel=\"stylesheet\" href=\"feishu2html.css\">"));
        assert!(!html.as_str().contains("<style>"));
    }

    #[test]
    fn test_empty_title_falls_back() {
        let shell = DocumentShell::new().unwrap();
        let html = shell.render(&info(""), "", StylesheetMode::External).unwrap();
        assert!(html.as_str().contains("<title>Untitled</title>"));
    }
}
