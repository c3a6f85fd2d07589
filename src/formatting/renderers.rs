// src/formatting/renderers.rs
//! One [`BlockRenderer`] implementation per block variant.
//!
//! Renderers write markup for their own block and ask the dispatcher to
//! render their children, so exactly-once bookkeeping stays in one place.

use super::block_renderer::BlockDispatcher;
use super::rich_text::{html_escape, render_text_content};
use super::state::HtmlSink;
use crate::error::AppError;
use crate::model::*;
use crate::output::image_relative_path;
use crate::types::LinkTarget;
use std::fmt::Write;

/// Formats one block variant as HTML.
pub trait BlockRenderer {
    fn render(&self, dispatcher: &mut BlockDispatcher<'_>, sink: &mut HtmlSink)
        -> Result<(), AppError>;
}

// --- Helpers ---

/// ` class="align-center"` for non-default alignment.
fn align_attr(align: Align) -> String {
    match align {
        Align::Left => String::new(),
        other => format!(" class=\"align-{}\"", other.as_css()),
    }
}

/// Renders nested children inside an indented container, if there are any.
fn write_nested(
    dispatcher: &mut BlockDispatcher<'_>,
    sink: &mut HtmlSink,
    common: &BlockCommon,
) -> Result<(), AppError> {
    if !common.has_children() {
        return Ok(());
    }
    let children = dispatcher.children_html(&common.children)?;
    if !children.is_empty() {
        write!(sink, "<div class=\"children\">\n{}</div>\n", children)?;
    }
    Ok(())
}

fn size_attrs(width: Option<u32>, height: Option<u32>) -> String {
    let mut attrs = String::new();
    if let Some(w) = width.filter(|w| *w > 0) {
        attrs.push_str(&format!(" width=\"{}\"", w));
    }
    if let Some(h) = height.filter(|h| *h > 0) {
        attrs.push_str(&format!(" height=\"{}\"", h));
    }
    attrs
}

fn emoji_for(emoji_id: &str) -> Option<&'static str> {
    let emoji = match emoji_id {
        "bulb" => "💡",
        "warning" => "⚠️",
        "x" => "❌",
        "white_check_mark" | "heavy_check_mark" => "✅",
        "information_source" => "ℹ️",
        "round_pushpin" | "pushpin" => "📌",
        "memo" => "📝",
        "fire" => "🔥",
        "star" => "⭐",
        "gift" => "🎁",
        "question" => "❓",
        "exclamation" => "❗",
        "rocket" => "🚀",
        "bell" => "🔔",
        "book" => "📖",
        "smile" => "😄",
        _ => return None,
    };
    Some(emoji)
}

// --- Text-bearing blocks ---

impl BlockRenderer for PageBlock {
    fn render(&self, d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        if !self.content.is_empty() {
            writeln!(
                sink,
                "<h1 class=\"page-title\">{}</h1>",
                render_text_content(&self.content)
            )?;
        }
        d.render_children(sink, &self.common.children)
    }
}

impl BlockRenderer for TextBlock {
    fn render(&self, d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        writeln!(
            sink,
            "<p{}>{}</p>",
            align_attr(self.content.align),
            render_text_content(&self.content)
        )?;
        write_nested(d, sink, &self.common)
    }
}

impl BlockRenderer for HeadingBlock {
    fn render(&self, d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        let level = self.html_level();
        writeln!(
            sink,
            "<h{level} id=\"{}\"{}>{}</h{level}>",
            self.common.id,
            align_attr(self.content.align),
            render_text_content(&self.content),
        )?;
        write_nested(d, sink, &self.common)
    }
}

impl BlockRenderer for BulletBlock {
    fn render(&self, d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        if !sink.accepts(ListKind::Bullet) {
            log::debug!("Bullet {} reached outside a bullet list", self.common.id);
            return Ok(());
        }
        let children = d.children_html(&self.common.children)?;
        writeln!(
            sink,
            "<li>{}{}</li>",
            render_text_content(&self.content),
            children
        )?;
        Ok(())
    }
}

impl BlockRenderer for OrderedBlock {
    fn render(&self, d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        if !sink.accepts(ListKind::Ordered) {
            log::debug!("Ordered item {} reached outside an ordered list", self.common.id);
            return Ok(());
        }
        let children = d.children_html(&self.common.children)?;
        writeln!(
            sink,
            "<li>{}{}</li>",
            render_text_content(&self.content),
            children
        )?;
        Ok(())
    }
}

impl BlockRenderer for CodeBlock {
    fn render(&self, _d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        let wrap = if self.wrap { " wrap" } else { "" };
        writeln!(
            sink,
            "<pre class=\"code{}\"><code class=\"language-{}\">{}</code></pre>",
            wrap,
            self.language_name(),
            render_text_content(&self.content)
        )?;
        Ok(())
    }
}

impl BlockRenderer for QuoteBlock {
    fn render(&self, d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        let children = d.children_html(&self.common.children)?;
        writeln!(
            sink,
            "<blockquote{}>{}{}</blockquote>",
            align_attr(self.content.align),
            render_text_content(&self.content),
            children
        )?;
        Ok(())
    }
}

impl BlockRenderer for EquationBlock {
    fn render(&self, _d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        let latex = self.content.plain_text();
        writeln!(
            sink,
            "<div class=\"equation-block\">\\[{}\\]</div>",
            html_escape(latex.trim_end_matches('\n'))
        )?;
        Ok(())
    }
}

impl BlockRenderer for TodoBlock {
    fn render(&self, d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        let (class, checked) = if self.done {
            ("todo done", " checked")
        } else {
            ("todo", "")
        };
        writeln!(
            sink,
            "<div class=\"{}\"><input type=\"checkbox\" disabled{}> <span>{}</span></div>",
            class,
            checked,
            render_text_content(&self.content)
        )?;
        write_nested(d, sink, &self.common)
    }
}

// --- Containers ---

impl BlockRenderer for CalloutBlock {
    fn render(&self, d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        let mut classes = vec!["callout".to_string()];
        classes.extend(self.background_color.map(|c| c.css_class()));
        classes.extend(self.border_color.map(|c| format!("border-color-{}", c.index())));
        classes.extend(self.text_color.map(|c| c.css_class()));

        write!(sink, "<div class=\"{}\">", classes.join(" "))?;
        if let Some(id) = self.emoji_id.as_deref() {
            match emoji_for(id) {
                Some(emoji) => write!(sink, "<span class=\"callout-emoji\">{}</span>", emoji)?,
                None => write!(
                    sink,
                    "<span class=\"callout-emoji\">:{}:</span>",
                    html_escape(id)
                )?,
            }
        }
        let body = d.children_html(&self.common.children)?;
        writeln!(sink, "<div class=\"callout-body\">\n{}</div></div>", body)?;
        Ok(())
    }
}

impl BlockRenderer for GridBlock {
    fn render(&self, d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        writeln!(sink, "<div class=\"grid\" data-columns=\"{}\">", self.column_size)?;
        d.render_children(sink, &self.common.children)?;
        sink.push_str("</div>\n");
        Ok(())
    }
}

impl BlockRenderer for GridColumnBlock {
    fn render(&self, d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        writeln!(
            sink,
            "<div class=\"grid-column\" style=\"flex: {} 1 0\">",
            self.width_ratio.max(1)
        )?;
        d.render_children(sink, &self.common.children)?;
        sink.push_str("</div>\n");
        Ok(())
    }
}

impl BlockRenderer for QuoteContainerBlock {
    fn render(&self, d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        sink.push_str("<blockquote class=\"quote-container\">\n");
        d.render_children(sink, &self.common.children)?;
        sink.push_str("</blockquote>\n");
        Ok(())
    }
}

impl BlockRenderer for ViewBlock {
    fn render(&self, d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        sink.push_str("<div class=\"view\">\n");
        d.render_children(sink, &self.common.children)?;
        sink.push_str("</div>\n");
        Ok(())
    }
}

impl BlockRenderer for TableCellBlock {
    fn render(&self, d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        d.render_children(sink, &self.common.children)
    }
}

impl BlockRenderer for UndefinedBlock {
    fn render(&self, d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        log::debug!(
            "Block {} has unsupported type {}; emitting children only",
            self.common.id,
            self.raw_type
        );
        d.render_children(sink, &self.common.children)
    }
}

impl BlockRenderer for TableBlock {
    fn render(&self, d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        let Some(property) = &self.property else {
            log::warn!("Table {} has no property payload", self.common.id);
            for id in &self.common.children {
                if let Some(child) = d.lookup(id) {
                    d.suppress_subtree(child);
                }
            }
            sink.push_str("<table class=\"table\"></table>\n");
            return Ok(());
        };

        let (rows, cols) = grid_size(property, self.cells.len());
        if (rows, cols) != (property.row_size as usize, property.column_size as usize) {
            log::warn!(
                "Table {} declares {}x{} cells but lists {}; rendering {}x{}",
                self.common.id,
                property.row_size,
                property.column_size,
                self.cells.len(),
                rows,
                cols
            );
        }
        let mut covered = vec![false; rows * cols];

        sink.push_str("<table class=\"table\">\n");
        if !property.column_width.is_empty() {
            sink.push_str("<colgroup>");
            for width in &property.column_width {
                write!(sink, "<col style=\"width: {}px\">", width)?;
            }
            sink.push_str("</colgroup>\n");
        }
        sink.push_str("<tbody>\n");

        for row in 0..rows {
            sink.push_str("<tr>");
            for col in 0..cols {
                let index = row * cols + col;
                let cell = self.cells.get(index).and_then(|id| d.lookup(id));

                if covered[index] {
                    if let Some(cell) = cell {
                        d.suppress_subtree(cell);
                    }
                    continue;
                }

                let span = property.merge_info.get(index).copied().unwrap_or_default();
                let row_span = (span.row_span.max(1) as usize).min(rows - row);
                let col_span = (span.col_span.max(1) as usize).min(cols - col);
                for r in row..row + row_span {
                    for c in col..col + col_span {
                        if (r, c) != (row, col) {
                            covered[r * cols + c] = true;
                        }
                    }
                }

                let header = (property.header_row && row == 0)
                    || (property.header_column && col == 0);
                let tag = if header { "th" } else { "td" };
                write!(sink, "<{}", tag)?;
                if row_span > 1 {
                    write!(sink, " rowspan=\"{}\"", row_span)?;
                }
                if col_span > 1 {
                    write!(sink, " colspan=\"{}\"", col_span)?;
                }
                sink.push_str(">");
                if let Some(cell) = cell {
                    d.render_block(sink, cell)?;
                }
                write!(sink, "</{}>", tag)?;
            }
            sink.push_str("</tr>\n");
        }
        sink.push_str("</tbody>\n</table>\n");

        // Cells outside the declared grid belong to no row.
        for id in self.cells.iter().skip(rows * cols).chain(&self.common.children) {
            if d.is_processed(id) {
                continue;
            }
            if let Some(orphan) = d.lookup(id) {
                log::debug!("Table {} cell {} lies outside the grid", self.common.id, id);
                d.suppress_subtree(orphan);
            }
        }
        Ok(())
    }
}

/// Clamps the declared grid to what the listed cells can fill: at most
/// `cells` columns and enough rows to hold every cell.
fn grid_size(property: &TableProperty, cells: usize) -> (usize, usize) {
    let cols = (property.column_size as usize).min(cells);
    if cols == 0 {
        return (0, 0);
    }
    let rows = (property.row_size as usize).min(cells.div_ceil(cols));
    (rows, cols)
}

// --- Media and attachments ---

impl BlockRenderer for ImageBlock {
    fn render(&self, _d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        if self.token.is_empty() {
            log::warn!("Image {} has no media token", self.common.id);
            return Ok(());
        }
        writeln!(
            sink,
            "<figure class=\"image align-{}\"><img src=\"{}\" alt=\"\" loading=\"lazy\"{}></figure>",
            self.align.as_css(),
            html_escape(&image_relative_path(&self.token)),
            size_attrs(self.width, self.height)
        )?;
        Ok(())
    }
}

impl BlockRenderer for BoardBlock {
    fn render(&self, _d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        if self.token.is_empty() {
            log::warn!("Board {} has no token", self.common.id);
            return Ok(());
        }
        writeln!(
            sink,
            "<figure class=\"board align-{}\"><img src=\"{}\" alt=\"board\" loading=\"lazy\"{}></figure>",
            self.align.as_css(),
            html_escape(&image_relative_path(&self.token)),
            size_attrs(self.width, self.height)
        )?;
        Ok(())
    }
}

impl BlockRenderer for FileBlock {
    fn render(&self, d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        let label = if self.name.is_empty() {
            &self.token
        } else {
            &self.name
        };
        writeln!(
            sink,
            "<div class=\"file\"><a href=\"{}\" download>{}</a></div>",
            html_escape(&d.attachment_path(&self.name, &self.token)),
            html_escape(label)
        )?;
        Ok(())
    }
}

impl BlockRenderer for IframeBlock {
    fn render(&self, _d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        match LinkTarget::parse(&self.url) {
            Ok(target) => writeln!(
                sink,
                "<div class=\"iframe\"><iframe src=\"{}\" loading=\"lazy\" allowfullscreen></iframe></div>",
                html_escape(target.as_str())
            )?,
            Err(e) => {
                log::warn!("Iframe {} has an unusable url: {}", self.common.id, e);
                sink.push_str("<div class=\"embed\">Embedded content</div>\n");
            }
        }
        Ok(())
    }
}

// --- Embeds that stay in Feishu ---

impl BlockRenderer for BitableBlock {
    fn render(&self, _d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        writeln!(
            sink,
            "<div class=\"embed bitable\" data-token=\"{}\">Bitable</div>",
            html_escape(&self.token)
        )?;
        Ok(())
    }
}

impl BlockRenderer for SheetBlock {
    fn render(&self, _d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        writeln!(
            sink,
            "<div class=\"embed sheet\" data-token=\"{}\">Sheet</div>",
            html_escape(&self.token)
        )?;
        Ok(())
    }
}

impl BlockRenderer for ChatCardBlock {
    fn render(&self, _d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        writeln!(
            sink,
            "<div class=\"embed chat-card\" data-chat-id=\"{}\">Group chat</div>",
            html_escape(&self.chat_id)
        )?;
        Ok(())
    }
}

impl BlockRenderer for DividerBlock {
    fn render(&self, _d: &mut BlockDispatcher<'_>, sink: &mut HtmlSink) -> Result<(), AppError> {
        sink.push_str("<hr>\n");
        Ok(())
    }
}
