mod block;
pub mod blocks;
pub mod common;
pub mod text;
pub mod tree;

pub use block::{Block, BlockType, ListKind};
pub use blocks::*;
pub use common::*;
pub use text::*;
pub use tree::{build_forest, build_forest_with_depth, BlockNode, Forest};

use crate::types::{BlockId, DocumentId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Document metadata as reported by the document endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub document_id: DocumentId,
    pub title: String,
    pub revision_id: i64,
}

impl DocumentInfo {
    /// Title for display and file naming; falls back when the document is untitled.
    pub fn display_title(&self) -> &str {
        let trimmed = self.title.trim();
        if trimmed.is_empty() {
            "Untitled"
        } else {
            trimmed
        }
    }
}

/// Everything fetched for one document: its metadata and every block,
/// keyed by id in the order the API returned them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentContent {
    pub document: DocumentInfo,
    pub blocks: IndexMap<BlockId, Block>,
}

impl DocumentContent {
    /// Id of the page block, which shares the document's id.
    pub fn root_id(&self) -> BlockId {
        self.document.document_id.page_block_id()
    }

    /// Builds the block forest rooted at the page block.
    pub fn forest(&self) -> Forest {
        build_forest(&self.blocks, &[self.root_id()])
    }
}
