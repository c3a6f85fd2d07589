//! Inline text elements carried by text-bearing blocks.

use crate::types::{BackgroundColor, FontColor};
use serde::{Deserialize, Serialize};

/// Inline styling attached to a text element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextElementStyle {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub inline_code: bool,
    pub text_color: Option<FontColor>,
    pub background_color: Option<BackgroundColor>,
    /// Link target exactly as delivered (percent-encoded).
    pub link: Option<String>,
}

impl TextElementStyle {
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    pub fn has_colors(&self) -> bool {
        self.text_color.is_some() || self.background_color.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextElement {
    TextRun {
        content: String,
        style: Option<TextElementStyle>,
    },
    MentionUser {
        user_id: String,
        style: Option<TextElementStyle>,
    },
    MentionDoc {
        token: String,
        url: String,
        title: String,
        style: Option<TextElementStyle>,
    },
    Equation {
        content: String,
        style: Option<TextElementStyle>,
    },
    File {
        file_token: String,
        style: Option<TextElementStyle>,
    },
}

impl TextElement {
    pub fn text(content: impl Into<String>) -> Self {
        TextElement::TextRun {
            content: content.into(),
            style: None,
        }
    }

    pub fn styled(content: impl Into<String>, style: TextElementStyle) -> Self {
        TextElement::TextRun {
            content: content.into(),
            style: Some(style),
        }
    }

    pub fn style(&self) -> Option<&TextElementStyle> {
        match self {
            TextElement::TextRun { style, .. }
            | TextElement::MentionUser { style, .. }
            | TextElement::MentionDoc { style, .. }
            | TextElement::Equation { style, .. }
            | TextElement::File { style, .. } => style.as_ref(),
        }
    }

    /// Unstyled text used for titles and analytics.
    pub fn plain_text(&self) -> &str {
        match self {
            TextElement::TextRun { content, .. } | TextElement::Equation { content, .. } => {
                content
            }
            TextElement::MentionUser { user_id, .. } => user_id,
            TextElement::MentionDoc { title, .. } => title,
            TextElement::File { file_token, .. } => file_token,
        }
    }
}

/// Horizontal alignment shared by text blocks, images and boards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub fn from_code(code: u8) -> Self {
        match code {
            2 => Align::Center,
            3 => Align::Right,
            _ => Align::Left,
        }
    }

    pub fn as_css(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// Text payload of a text-bearing block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextBlockContent {
    pub elements: Vec<TextElement>,
    pub align: Align,
}

impl TextBlockContent {
    pub fn new(elements: Vec<TextElement>) -> Self {
        Self {
            elements,
            align: Align::Left,
        }
    }

    pub fn plain_text(&self) -> String {
        self.elements.iter().map(TextElement::plain_text).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.iter().all(|e| e.plain_text().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_concatenates_elements() {
        let content = TextBlockContent::new(vec![
            TextElement::text("Hello "),
            TextElement::styled("world", TextElementStyle::bold()),
        ]);
        assert_eq!(content.plain_text(), "Hello world");
        assert!(!content.is_empty());
        assert!(TextBlockContent::default().is_empty());
    }

    #[test]
    fn test_align_codes() {
        assert_eq!(Align::from_code(2), Align::Center);
        assert_eq!(Align::from_code(3).as_css(), "right");
        assert_eq!(Align::from_code(0), Align::Left);
    }
}
