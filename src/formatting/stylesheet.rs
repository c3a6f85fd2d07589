// src/formatting/stylesheet.rs
//! The stylesheet shipped with every export.
//!
//! Colour classes are generated from the palette so the CSS and the
//! classes the compositor emits cannot drift apart.

use crate::types::{BackgroundColor, FontColor, ValidationError};
use std::fmt;
use std::str::FromStr;

/// Where the stylesheet goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StylesheetMode {
    /// `<style>` element in the document head
    #[default]
    Inline,
    /// Sibling CSS file referenced by `<link>`
    External,
}

impl FromStr for StylesheetMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(StylesheetMode::Inline),
            "external" => Ok(StylesheetMode::External),
            other => Err(ValidationError::InvalidStylesheetMode(other.to_string())),
        }
    }
}

impl fmt::Display for StylesheetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StylesheetMode::Inline => write!(f, "inline"),
            StylesheetMode::External => write!(f, "external"),
        }
    }
}

const BASE_CSS: &str = r#"body {
  margin: 0;
  background: #ffffff;
  color: #1f2329;
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", "PingFang SC", "Microsoft YaHei", sans-serif;
  font-size: 16px;
  line-height: 1.7;
}
.document { max-width: 860px; margin: 0 auto; padding: 48px 24px; }
.page-title { font-size: 2.2em; margin-bottom: 0.8em; }
.align-center { text-align: center; }
.align-right { text-align: right; }
.children { margin-left: 1.5em; }
p { margin: 0.4em 0; min-height: 1em; }
blockquote { margin: 0.6em 0; padding-left: 1em; border-left: 3px solid #bbbfc4; color: #646a73; }
pre.code { background: #f5f6f7; border-radius: 6px; padding: 12px 16px; overflow-x: auto; }
pre.code.wrap { white-space: pre-wrap; }
code { font-family: "SFMono-Regular", Menlo, Consolas, monospace; font-size: 0.9em; }
p code, li code { background: #f2f3f5; border-radius: 4px; padding: 0 4px; }
.equation-block { text-align: center; margin: 0.8em 0; }
.todo { display: flex; gap: 0.4em; align-items: baseline; }
.todo.done span { text-decoration: line-through; color: #8f959e; }
.callout { display: flex; gap: 0.6em; border: 1px solid #dee0e3; border-radius: 8px; padding: 12px 16px; margin: 0.8em 0; }
.callout-emoji { font-size: 1.2em; }
.callout-body { flex: 1; min-width: 0; }
.grid { display: flex; gap: 16px; }
.grid-column { min-width: 0; }
.table { border-collapse: collapse; margin: 0.8em 0; width: 100%; }
.table td, .table th { border: 1px solid #dee0e3; padding: 6px 10px; vertical-align: top; }
.table th { background: #f5f6f7; font-weight: 600; }
figure { margin: 0.8em 0; }
figure.align-center { text-align: center; }
figure.align-right { text-align: right; }
figure img { max-width: 100%; height: auto; }
.iframe iframe { width: 100%; min-height: 400px; border: 0; }
.embed { border: 1px dashed #bbbfc4; border-radius: 6px; padding: 12px; color: #646a73; margin: 0.8em 0; }
.file a { text-decoration: none; }
.mention-user { color: #245bdb; }
hr { border: 0; border-top: 1px solid #dee0e3; margin: 1.2em 0; }
"#;

/// Builds the full stylesheet: base rules plus one class per palette entry.
pub fn stylesheet() -> String {
    let mut css = String::from(BASE_CSS);
    for color in FontColor::all() {
        css.push_str(&format!(".{} {{ color: {}; }}\n", color.css_class(), color.hex()));
        css.push_str(&format!(
            ".border-color-{} {{ border-color: {}; }}\n",
            color.index(),
            color.hex()
        ));
    }
    for color in BackgroundColor::all() {
        css.push_str(&format!(
            ".{} {{ background-color: {}; }}\n",
            color.css_class(),
            color.hex()
        ));
    }
    css
}
