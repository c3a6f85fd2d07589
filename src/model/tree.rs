//! Reconstruction of the block forest from the flat id-keyed map.
//!
//! The API hands back blocks as a flat list where each block names its
//! children by id. [`build_forest`] turns that into owned [`BlockNode`]
//! trees. A child id missing from the map is dropped, and an id reached a
//! second time during the same build is not expanded again, which keeps the
//! builder total on malformed or cyclic input. Nesting is cut at
//! [`BLOCK_MAX_RENDER_DEPTH`]; blocks below the cut stay out of the forest.

use super::Block;
use crate::constants::BLOCK_MAX_RENDER_DEPTH;
use crate::types::BlockId;
use indexmap::IndexMap;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::ops::Deref;

/// One block plus its owned, ordered children.
///
/// `parent` and `depth` are navigation aids only; equality and hashing
/// consider `(data, children)`.
#[derive(Debug, Clone)]
pub struct BlockNode {
    data: Block,
    children: Vec<BlockNode>,
    parent: Option<BlockId>,
    depth: usize,
}

impl BlockNode {
    pub fn id(&self) -> &BlockId {
        self.data.id()
    }

    pub fn data(&self) -> &Block {
        &self.data
    }

    pub fn children(&self) -> &[BlockNode] {
        &self.children
    }

    pub fn parent_id(&self) -> Option<&BlockId> {
        self.parent.as_ref()
    }

    /// Distance to the root of this node's tree (roots are at depth 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Pre-order walk of this node and its descendants.
    pub fn walk<'a>(&'a self, out: &mut Vec<&'a BlockNode>) {
        out.push(self);
        for child in &self.children {
            child.walk(out);
        }
    }
}

impl PartialEq for BlockNode {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data && self.children == other.children
    }
}

impl Eq for BlockNode {}

impl Hash for BlockNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.hash(state);
        self.children.hash(state);
    }
}

/// Ordered root nodes of one document.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    roots: Vec<BlockNode>,
    parents: HashMap<BlockId, BlockId>,
}

impl Forest {
    pub fn roots(&self) -> &[BlockNode] {
        &self.roots
    }

    /// Ancestor chain of `id`, nearest first. Empty for roots and unknown ids.
    pub fn ancestors(&self, id: &BlockId) -> Vec<BlockId> {
        let mut chain = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parents.get(current) {
            chain.push(parent.clone());
            current = parent;
        }
        chain
    }

    /// Pre-order flattening of every node in document order.
    pub fn nodes(&self) -> Vec<&BlockNode> {
        let mut out = Vec::new();
        for root in &self.roots {
            root.walk(&mut out);
        }
        out
    }

    /// The blocks of [`Forest::nodes`], in the same order.
    pub fn ordered_blocks(&self) -> Vec<&Block> {
        self.nodes().into_iter().map(BlockNode::data).collect()
    }

    pub fn node_count(&self) -> usize {
        self.parents.len() + self.roots.len()
    }

    pub fn max_depth(&self) -> usize {
        self.nodes().iter().map(|n| n.depth()).max().unwrap_or(0)
    }
}

impl Deref for Forest {
    type Target = [BlockNode];

    fn deref(&self) -> &Self::Target {
        &self.roots
    }
}

/// Builds the forest for `blocks`, starting from `root_ids`.
///
/// Explicit roots come first. Afterwards every block whose parent is absent
/// (null, empty, or not in the map) and that was not already reached becomes
/// an implicit root, in map order. Unreachable blocks are left out of the
/// forest but stay in `blocks`.
pub fn build_forest(blocks: &IndexMap<BlockId, Block>, root_ids: &[BlockId]) -> Forest {
    build_forest_with_depth(blocks, root_ids, BLOCK_MAX_RENDER_DEPTH)
}

/// [`build_forest`] with an explicit nesting cap. Nodes at `max_depth` keep
/// their data but get no children.
pub fn build_forest_with_depth(
    blocks: &IndexMap<BlockId, Block>,
    root_ids: &[BlockId],
    max_depth: usize,
) -> Forest {
    let mut builder = ForestBuilder {
        blocks,
        visited: HashSet::with_capacity(blocks.len()),
        parents: HashMap::with_capacity(blocks.len()),
        max_depth,
        cut: 0,
    };

    let mut roots = Vec::new();
    for id in root_ids {
        match builder.build_node(id, None, 0) {
            Some(node) => roots.push(node),
            None => debug!("Root id {} is missing or already placed; skipping", id),
        }
    }

    for (id, block) in blocks {
        if builder.visited.contains(id) {
            continue;
        }
        let orphaned = match block.parent_id() {
            None => true,
            Some(parent) => !blocks.contains_key(parent),
        };
        if orphaned {
            if let Some(node) = builder.build_node(id, None, 0) {
                roots.push(node);
            }
        }
    }

    if builder.cut > 0 {
        warn!(
            "{} subtree(s) nest deeper than {} levels and were left out",
            builder.cut, max_depth
        );
    }
    let unreachable = blocks.len() - builder.visited.len();
    if unreachable > 0 {
        debug!("{} block(s) are unreachable from any root", unreachable);
    }

    Forest {
        roots,
        parents: builder.parents,
    }
}

struct ForestBuilder<'a> {
    blocks: &'a IndexMap<BlockId, Block>,
    visited: HashSet<BlockId>,
    parents: HashMap<BlockId, BlockId>,
    max_depth: usize,
    /// Nodes whose children were dropped by the depth cap
    cut: usize,
}

impl<'a> ForestBuilder<'a> {
    fn build_node(
        &mut self,
        id: &BlockId,
        parent: Option<&BlockId>,
        depth: usize,
    ) -> Option<BlockNode> {
        let block = self.blocks.get(id)?;
        if !self.visited.insert(id.clone()) {
            warn!(
                "Block {} is referenced more than once; keeping its first placement",
                id
            );
            return None;
        }
        if let Some(parent) = parent {
            self.parents.insert(id.clone(), parent.clone());
        }

        let children = if depth >= self.max_depth {
            if !block.children().is_empty() {
                debug!("Block {} sits at depth {}; not expanding its children", id, depth);
                self.cut += 1;
            }
            Vec::new()
        } else {
            block
                .children()
                .iter()
                .filter_map(|child_id| self.build_node(child_id, Some(id), depth + 1))
                .collect()
        };

        Some(BlockNode {
            data: block.clone(),
            children,
            parent: parent.cloned(),
            depth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockCommon, TextBlock, TextBlockContent};
    use pretty_assertions::assert_eq;

    fn text(id: &str, parent: Option<&str>, children: &[&str]) -> Block {
        let mut common = BlockCommon::new(BlockId::from_raw(id.to_string()))
            .with_children(children.iter().map(|c| BlockId::from_raw(c.to_string())).collect());
        common.parent_id = parent.map(|p| BlockId::from_raw(p.to_string()));
        Block::Text(TextBlock {
            common,
            content: TextBlockContent::default(),
        })
    }

    fn map(blocks: Vec<Block>) -> IndexMap<BlockId, Block> {
        blocks.into_iter().map(|b| (b.id().clone(), b)).collect()
    }

    fn id(s: &str) -> BlockId {
        BlockId::from_raw(s.to_string())
    }

    fn ids(forest: &Forest) -> Vec<String> {
        forest
            .nodes()
            .iter()
            .map(|n| n.id().as_str().to_string())
            .collect()
    }

    #[test]
    fn test_preserves_child_order() {
        let blocks = map(vec![
            text("root", None, &["c", "a", "b"]),
            text("a", Some("root"), &[]),
            text("b", Some("root"), &[]),
            text("c", Some("root"), &[]),
        ]);
        let forest = build_forest(&blocks, &[id("root")]);

        assert_eq!(forest.len(), 1);
        assert_eq!(ids(&forest), vec!["root", "c", "a", "b"]);
    }

    #[test]
    fn test_missing_child_is_dropped() {
        let blocks = map(vec![
            text("root", None, &["a", "ghost"]),
            text("a", Some("root"), &[]),
        ]);
        let forest = build_forest(&blocks, &[id("root")]);

        assert_eq!(forest[0].children().len(), 1);
        assert_eq!(ids(&forest), vec!["root", "a"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let blocks = map(vec![
            text("a", None, &["b"]),
            text("b", Some("a"), &["a"]),
        ]);
        let forest = build_forest(&blocks, &[id("a")]);

        assert_eq!(ids(&forest), vec!["a", "b"]);
        assert!(forest[0].children()[0].children().is_empty());
    }

    #[test]
    fn test_implicit_roots_follow_explicit_roots() {
        let blocks = map(vec![
            text("orphan", Some("nowhere"), &[]),
            text("root", None, &["child"]),
            text("child", Some("root"), &[]),
            text("loose", None, &[]),
        ]);
        let forest = build_forest(&blocks, &[id("root")]);

        let root_ids: Vec<_> = forest.iter().map(|n| n.id().as_str()).collect();
        assert_eq!(root_ids, vec!["root", "orphan", "loose"]);
    }

    #[test]
    fn test_unreachable_blocks_are_excluded() {
        let blocks = map(vec![
            text("root", None, &[]),
            text("stray", Some("root"), &[]),
        ]);
        let forest = build_forest(&blocks, &[id("root")]);

        assert_eq!(ids(&forest), vec!["root"]);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_depth_and_ancestors() {
        let blocks = map(vec![
            text("root", None, &["mid"]),
            text("mid", Some("root"), &["leaf"]),
            text("leaf", Some("mid"), &[]),
        ]);
        let forest = build_forest(&blocks, &[id("root")]);

        let leaf = &forest[0].children()[0].children()[0];
        assert_eq!(leaf.depth(), 2);
        assert_eq!(leaf.parent_id(), Some(&id("mid")));
        assert_eq!(forest.ancestors(&id("leaf")), vec![id("mid"), id("root")]);
        assert!(forest.ancestors(&id("root")).is_empty());
        assert_eq!(forest.max_depth(), 2);
        assert_eq!(forest.node_count(), 3);
    }

    #[test]
    fn test_deep_chain_is_cut_at_depth_cap() {
        let length = 20_000;
        let blocks = map(
            (0..length)
                .map(|i| {
                    let child = format!("n{}", i + 1);
                    let children: Vec<&str> = if i + 1 < length { vec![child.as_str()] } else { vec![] };
                    let parent = (i > 0).then(|| format!("n{}", i - 1));
                    text(&format!("n{}", i), parent.as_deref(), &children)
                })
                .collect(),
        );

        let forest = build_forest(&blocks, &[id("n0")]);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest.max_depth(), BLOCK_MAX_RENDER_DEPTH);
        assert_eq!(forest.node_count(), BLOCK_MAX_RENDER_DEPTH + 1);
        let last = format!("n{}", BLOCK_MAX_RENDER_DEPTH);
        assert_eq!(forest.nodes().last().map(|n| n.id().as_str()), Some(last.as_str()));
    }

    #[test]
    fn test_custom_depth_cap() {
        let blocks = map(vec![
            text("root", None, &["mid"]),
            text("mid", Some("root"), &["leaf"]),
            text("leaf", Some("mid"), &[]),
        ]);
        let forest = build_forest_with_depth(&blocks, &[id("root")], 1);

        assert_eq!(ids(&forest), vec!["root", "mid"]);
        assert!(forest.ancestors(&id("leaf")).is_empty());
    }

    #[test]
    fn test_equality_ignores_parent_link() {
        let blocks = map(vec![
            text("root", None, &["x"]),
            text("x", Some("root"), &[]),
        ]);
        let nested = build_forest(&blocks, &[id("root")]);
        let standalone = build_forest(&blocks, &[id("x")]);

        assert_eq!(nested[0].children()[0], standalone[0]);
    }
}
