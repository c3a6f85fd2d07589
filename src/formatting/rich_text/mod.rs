// src/formatting/rich_text/mod.rs
//! Renders inline text elements to HTML.
//!
//! Every element kind goes through the same style compositor, so mentions,
//! equations and inline files pick up bold, colour and links exactly like
//! plain runs do.

mod annotations;

pub use annotations::{html_escape, HtmlStyleRenderer};

use crate::model::{TextBlockContent, TextElement};

/// Renders the elements of a text-bearing block.
pub fn render_text_content(content: &TextBlockContent) -> String {
    render_elements(&content.elements)
}

/// Renders a sequence of inline elements, concatenated.
pub fn render_elements(elements: &[TextElement]) -> String {
    elements.iter().map(render_element).collect()
}

/// Renders a single inline element.
pub fn render_element(element: &TextElement) -> String {
    match element {
        TextElement::TextRun { content, style } => {
            HtmlStyleRenderer::apply_styles(content, style.as_ref())
        }

        TextElement::MentionUser { user_id, style } => format!(
            "<span class=\"mention-user\">{}</span>",
            HtmlStyleRenderer::apply_styles(&format!("@{}", user_id), style.as_ref())
        ),

        TextElement::MentionDoc {
            token,
            url,
            title,
            style,
        } => {
            let label = if title.trim().is_empty() { token } else { title };
            let mut style = style.clone().unwrap_or_default();
            if style.link.is_none() && !url.is_empty() {
                style.link = Some(url.clone());
            }
            format!(
                "<span class=\"mention-doc\">{}</span>",
                HtmlStyleRenderer::apply_styles(label, Some(&style))
            )
        }

        TextElement::Equation { content, style } => format!(
            "<span class=\"equation\">\\({}\\)</span>",
            HtmlStyleRenderer::apply_styles(content.trim_end_matches('\n'), style.as_ref())
        ),

        TextElement::File { file_token, style } => format!(
            "<span class=\"inline-file\">{}</span>",
            HtmlStyleRenderer::apply_styles(file_token, style.as_ref())
        ),
    }
}
