// src/formatting/state.rs
//! Mutable state threaded through one render pass.
//!
//! [`RenderContext`] records which blocks have been emitted and how deep the
//! dispatcher currently is. [`HtmlSink`] is the buffer renderers write into;
//! its kind tells list-item renderers whether they sit inside a matching
//! list.

use crate::constants::BLOCK_MAX_RENDER_DEPTH;
use crate::model::ListKind;
use crate::types::BlockId;
use std::collections::HashSet;
use std::fmt;

/// Bookkeeping for a single render pass over one document.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Blocks already emitted (or deliberately suppressed)
    processed_ids: HashSet<BlockId>,
    /// Emission order, for diagnostics and tests
    render_order: Vec<BlockId>,
    depth: usize,
    max_depth: usize,
    truncated: usize,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext {
    pub fn new() -> Self {
        Self::with_max_depth(BLOCK_MAX_RENDER_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            processed_ids: HashSet::new(),
            render_order: Vec::new(),
            depth: 0,
            max_depth,
            truncated: 0,
        }
    }

    /// Marks `id` as processed. Returns `false` if it already was.
    pub fn mark_processed(&mut self, id: &BlockId) -> bool {
        if self.processed_ids.insert(id.clone()) {
            self.render_order.push(id.clone());
            true
        } else {
            false
        }
    }

    /// Marks `id` as processed without recording it as rendered.
    pub fn suppress(&mut self, id: &BlockId) {
        self.processed_ids.insert(id.clone());
    }

    pub fn is_processed(&self, id: &BlockId) -> bool {
        self.processed_ids.contains(id)
    }

    pub fn processed_count(&self) -> usize {
        self.processed_ids.len()
    }

    /// Ids in the order their blocks were emitted.
    pub fn render_order(&self) -> &[BlockId] {
        &self.render_order
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn at_depth_limit(&self) -> bool {
        self.depth >= self.max_depth
    }

    pub fn enter(&mut self) {
        self.depth += 1;
    }

    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn record_truncation(&mut self) {
        self.truncated += 1;
    }

    /// Number of subtrees cut off by the depth guard.
    pub fn truncated(&self) -> usize {
        self.truncated
    }
}

/// What kind of container an [`HtmlSink`] is collecting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Flow,
    List(ListKind),
}

/// Output buffer for rendered markup.
#[derive(Debug, Clone)]
pub struct HtmlSink {
    buf: String,
    kind: SinkKind,
}

impl Default for HtmlSink {
    fn default() -> Self {
        Self::flow()
    }
}

impl HtmlSink {
    pub fn flow() -> Self {
        Self {
            buf: String::new(),
            kind: SinkKind::Flow,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
            kind: SinkKind::Flow,
        }
    }

    pub fn list(kind: ListKind) -> Self {
        Self {
            buf: String::new(),
            kind: SinkKind::List(kind),
        }
    }

    pub fn kind(&self) -> SinkKind {
        self.kind
    }

    /// Whether a list item of `kind` may be emitted here.
    pub fn accepts(&self, kind: ListKind) -> bool {
        self.kind == SinkKind::List(kind)
    }

    pub fn push_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl fmt::Write for HtmlSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}
