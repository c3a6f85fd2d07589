// src/formatting/mod.rs
//! Renders docx block trees into HTML documents.

pub mod block_renderer;
pub mod document;
mod renderers;
pub mod rich_text;
mod state;
pub mod stylesheet;

pub use block_renderer::{render_blocks, BlockDispatcher};
pub use document::{render_document, DocumentShell};
pub use renderers::BlockRenderer;
pub use state::{HtmlSink, RenderContext, SinkKind};
pub use stylesheet::{stylesheet, StylesheetMode};
