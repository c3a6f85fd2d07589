// src/analytics/mod.rs
//! Content measurement and statistics for document block forests.

use crate::model::{Block, BlockType, Forest};
use std::collections::BTreeMap;

/// Quick statistics for user-facing progress messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSummary {
    pub total_blocks: usize,
    pub deepest_nesting: usize,
}

/// Detailed breakdown for diagnostics and verbose logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentMeasurement {
    pub total_blocks: usize,
    pub deepest_nesting: usize,
    /// Blocks fetched from the API but not reachable from the page block
    pub unreachable_blocks: usize,
    pub images: usize,
    pub boards: usize,
    pub files: usize,
    pub tables: usize,
    pub by_type: BTreeMap<BlockType, usize>,
}

impl ContentMeasurement {
    /// Assets the coordinator will consider for download.
    pub fn asset_references(&self) -> usize {
        self.images + self.boards + self.files
    }
}

pub fn measure_content(forest: &Forest) -> ContentSummary {
    ContentSummary {
        total_blocks: forest.node_count(),
        deepest_nesting: forest.max_depth(),
    }
}

/// Measures a forest; `fetched` is the number of blocks the API returned.
pub fn measure_content_detailed(forest: &Forest, fetched: usize) -> ContentMeasurement {
    let mut metrics = ContentMeasurement {
        total_blocks: forest.node_count(),
        deepest_nesting: forest.max_depth(),
        ..Default::default()
    };
    metrics.unreachable_blocks = fetched.saturating_sub(metrics.total_blocks);

    for block in forest.ordered_blocks() {
        *metrics.by_type.entry(block.block_type()).or_insert(0) += 1;
        match block {
            Block::Image(_) => metrics.images += 1,
            Block::Board(_) => metrics.boards += 1,
            Block::File(_) => metrics.files += 1,
            Block::Table(_) => metrics.tables += 1,
            _ => {}
        }
    }

    metrics
}

/// Block types the renderer has no markup for.
pub fn undefined_block_count(forest: &Forest) -> usize {
    forest
        .ordered_blocks()
        .into_iter()
        .filter(|b| matches!(b, Block::Undefined(_)))
        .count()
}
