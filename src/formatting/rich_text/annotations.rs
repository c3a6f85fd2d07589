// src/formatting/rich_text/annotations.rs
//! Inline style composition for HTML output.
//!
//! Styles wrap the escaped content in a fixed order, innermost first:
//! link, inline code, strikethrough, underline, italic, bold, and finally a
//! single colour span. Two runs with the same style therefore always produce
//! identical markup, whatever order the flags were set in.

use crate::model::TextElementStyle;
use crate::types::LinkTarget;

/// Renderer for text styles to HTML.
pub struct HtmlStyleRenderer;

impl HtmlStyleRenderer {
    /// Escapes `content` and wraps it according to `style`.
    pub fn apply_styles(content: &str, style: Option<&TextElementStyle>) -> String {
        let escaped = html_escape(content);
        let Some(style) = style else {
            return escaped;
        };

        let mut result = match style.link.as_deref().map(LinkTarget::parse) {
            Some(Ok(target)) => format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                html_escape(target.as_str()),
                escaped
            ),
            Some(Err(e)) => {
                log::debug!("Dropping link: {}", e);
                escaped
            }
            None => escaped,
        };

        if style.inline_code {
            result = format!("<code>{}</code>", result);
        }

        if style.strikethrough {
            result = format!("<s>{}</s>", result);
        }

        if style.underline {
            result = format!("<u>{}</u>", result);
        }

        if style.italic {
            result = format!("<em>{}</em>", result);
        }

        if style.bold {
            result = format!("<strong>{}</strong>", result);
        }

        if style.has_colors() {
            result = format!("<span class=\"{}\">{}</span>", color_classes(style), result);
        }

        result
    }
}

/// CSS classes for the colours of `style`, text colour first.
fn color_classes(style: &TextElementStyle) -> String {
    let text = style.text_color.map(|c| c.css_class());
    let background = style.background_color.map(|c| c.css_class());
    text.into_iter()
        .chain(background)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escapes the five HTML-significant characters.
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
