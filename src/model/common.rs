use crate::types::BlockId;
use serde::{Deserialize, Serialize};

/// Common fields for all blocks
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockCommon {
    pub id: BlockId,
    /// Back-reference by id; `None` for the document's page block.
    pub parent_id: Option<BlockId>,
    pub children: Vec<BlockId>,
    pub comment_ids: Vec<String>,
}

impl BlockCommon {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            parent_id: None,
            children: Vec::new(),
            comment_ids: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: BlockId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_children(mut self, children: Vec<BlockId>) -> Self {
        self.children = children;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
