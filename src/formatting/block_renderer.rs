// src/formatting/block_renderer.rs
//! Block rendering engine: walks the block forest and emits HTML.
//!
//! The dispatcher owns the [`RenderContext`] for one pass. Each block is
//! emitted at most once: the first time it is reached it is marked
//! processed, and any later reference to the same id (a second parent, a
//! cycle, a covered table cell) renders nothing. Container renderers pull
//! their children from the id-keyed block map, so a subtree is emitted in
//! place; the forest walk afterwards only picks up what no container
//! claimed.

use super::renderers::BlockRenderer;
use super::state::{HtmlSink, RenderContext};
use crate::constants::CHARS_PER_BLOCK_ESTIMATE;
use crate::error::AppError;
use crate::model::{Block, BlockNode, Forest, ListKind};
use crate::output::AttachmentPaths;
use crate::types::BlockId;
use indexmap::IndexMap;
use std::fmt::Write;

/// Routes each block to the renderer for its variant.
pub struct BlockDispatcher<'a> {
    blocks: &'a IndexMap<BlockId, Block>,
    context: RenderContext,
    attachments: AttachmentPaths,
}

impl<'a> BlockDispatcher<'a> {
    pub fn new(blocks: &'a IndexMap<BlockId, Block>) -> Self {
        Self::with_context(blocks, RenderContext::new())
    }

    pub fn with_context(blocks: &'a IndexMap<BlockId, Block>, context: RenderContext) -> Self {
        Self {
            blocks,
            context,
            attachments: AttachmentPaths::default(),
        }
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn into_context(self) -> RenderContext {
        self.context
    }

    /// Looks up a block of the document by id.
    pub fn lookup(&self, id: &BlockId) -> Option<&'a Block> {
        self.blocks.get(id)
    }

    pub fn is_processed(&self, id: &BlockId) -> bool {
        self.context.is_processed(id)
    }

    /// Where the attachment `token` is saved, relative to the HTML file.
    pub fn attachment_path(&self, name: &str, token: &str) -> String {
        self.attachments.path_for(name, token)
    }

    /// Renders every root of `forest` in document order.
    pub fn render_forest(&mut self, forest: &Forest) -> Result<String, AppError> {
        self.attachments = AttachmentPaths::from_blocks(forest.ordered_blocks());
        let mut sink = HtmlSink::with_capacity(forest.node_count() * CHARS_PER_BLOCK_ESTIMATE);
        self.render_nodes(&mut sink, forest.roots())?;

        log::debug!(
            "Rendered {} of {} block(s), {} subtree(s) truncated",
            self.context.render_order().len(),
            forest.node_count(),
            self.context.truncated()
        );
        Ok(sink.into_string())
    }

    /// Renders sibling groups depth-first. Descendants no container claimed
    /// are emitted after their siblings.
    fn render_nodes(&mut self, sink: &mut HtmlSink, roots: &[BlockNode]) -> Result<(), AppError> {
        let mut pending: Vec<&[BlockNode]> = vec![roots];
        while let Some(nodes) = pending.pop() {
            let blocks: Vec<&Block> = nodes.iter().map(BlockNode::data).collect();
            self.render_sequence(sink, &blocks)?;

            pending.extend(
                nodes
                    .iter()
                    .rev()
                    .map(BlockNode::children)
                    .filter(|children| !children.is_empty()),
            );
        }
        Ok(())
    }

    /// Renders the blocks named by `ids`. Ids missing from the document are
    /// skipped.
    pub fn render_children(&mut self, sink: &mut HtmlSink, ids: &[BlockId]) -> Result<(), AppError> {
        let map = self.blocks;
        let blocks: Vec<&Block> = ids.iter().filter_map(|id| map.get(id)).collect();
        self.render_sequence(sink, &blocks)
    }

    /// Renders the blocks named by `ids` into a fresh flow buffer.
    pub fn children_html(&mut self, ids: &[BlockId]) -> Result<String, AppError> {
        let mut sink = HtmlSink::flow();
        self.render_children(&mut sink, ids)?;
        Ok(sink.into_string())
    }

    /// Renders siblings, wrapping each run of same-kind list items in one
    /// `<ul>` or `<ol>`.
    fn render_sequence(&mut self, sink: &mut HtmlSink, blocks: &[&Block]) -> Result<(), AppError> {
        let mut i = 0;
        while i < blocks.len() {
            let block = blocks[i];
            if self.context.is_processed(block.id()) {
                i += 1;
                continue;
            }

            let Some(kind) = block.list_kind() else {
                self.render_block(sink, block)?;
                i += 1;
                continue;
            };

            let start = match block {
                Block::Ordered(ordered) => ordered.sequence,
                _ => None,
            };
            let mut items = HtmlSink::list(kind);
            while i < blocks.len() && blocks[i].list_kind() == Some(kind) {
                self.render_block(&mut items, blocks[i])?;
                i += 1;
            }

            if !items.is_empty() {
                match kind {
                    ListKind::Bullet => sink.push_str("<ul>\n"),
                    ListKind::Ordered => match start {
                        Some(n) if n != 1 => writeln!(sink, "<ol start=\"{}\">", n)?,
                        _ => sink.push_str("<ol>\n"),
                    },
                }
                sink.push_str(items.as_str());
                sink.push_str(match kind {
                    ListKind::Bullet => "</ul>\n",
                    ListKind::Ordered => "</ol>\n",
                });
            }
        }
        Ok(())
    }

    /// Renders one block unless it was already emitted.
    pub fn render_block(&mut self, sink: &mut HtmlSink, block: &Block) -> Result<(), AppError> {
        if self.context.is_processed(block.id()) {
            log::debug!("Block {} already rendered, skipping", block.id());
            return Ok(());
        }

        if self.context.at_depth_limit() {
            log::warn!(
                "Render depth limit reached at block {}; its subtree is omitted",
                block.id()
            );
            self.context.record_truncation();
            self.suppress_subtree(block);
            return Ok(());
        }

        self.context.mark_processed(block.id());
        self.context.enter();
        let result = self.dispatch(sink, block);
        self.context.exit();
        result
    }

    fn dispatch(&mut self, sink: &mut HtmlSink, block: &Block) -> Result<(), AppError> {
        match block {
            Block::Page(b) => b.render(self, sink),
            Block::Text(b) => b.render(self, sink),
            Block::Heading(b) => b.render(self, sink),
            Block::Bullet(b) => b.render(self, sink),
            Block::Ordered(b) => b.render(self, sink),
            Block::Code(b) => b.render(self, sink),
            Block::Quote(b) => b.render(self, sink),
            Block::Equation(b) => b.render(self, sink),
            Block::Todo(b) => b.render(self, sink),
            Block::Bitable(b) => b.render(self, sink),
            Block::Callout(b) => b.render(self, sink),
            Block::ChatCard(b) => b.render(self, sink),
            Block::Divider(b) => b.render(self, sink),
            Block::File(b) => b.render(self, sink),
            Block::Grid(b) => b.render(self, sink),
            Block::GridColumn(b) => b.render(self, sink),
            Block::Iframe(b) => b.render(self, sink),
            Block::Image(b) => b.render(self, sink),
            Block::Sheet(b) => b.render(self, sink),
            Block::Table(b) => b.render(self, sink),
            Block::TableCell(b) => b.render(self, sink),
            Block::View(b) => b.render(self, sink),
            Block::QuoteContainer(b) => b.render(self, sink),
            Block::Board(b) => b.render(self, sink),
            Block::Undefined(b) => b.render(self, sink),
        }
    }

    /// Marks `block` and every descendant not yet emitted as processed
    /// without rendering them.
    pub fn suppress_subtree(&mut self, block: &Block) {
        self.context.suppress(block.id());
        let map = self.blocks;
        let mut pending: Vec<&BlockId> = block.children().iter().collect();
        while let Some(id) = pending.pop() {
            if self.context.is_processed(id) {
                continue;
            }
            self.context.suppress(id);
            if let Some(child) = map.get(id) {
                pending.extend(child.children());
            }
        }
    }
}

/// Renders a document body: every block reachable from `forest`, each once.
pub fn render_blocks(
    blocks: &IndexMap<BlockId, Block>,
    forest: &Forest,
) -> Result<String, AppError> {
    BlockDispatcher::new(blocks).render_forest(forest)
}
