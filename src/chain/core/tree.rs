use crate::chain::core::validation::validate_linkage;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel parent hash marking a top-level block ("no parent").
///
/// No block may carry this value as its own hash; the virtual root it
/// names exists only as a traversal origin.
pub const ROOT_HASH: u64 = 0;

/// A node in the block forest.
///
/// Blocks are plain values: identity is the `hash` field and nothing
/// else. The caller constructs them; this crate only reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    /// Hash of this block, unique within the forest and never `0`.
    pub hash: u64,
    /// Hash of the parent block, or [`ROOT_HASH`] for a top-level block.
    pub parent_hash: u64,
}

impl Block {
    /// Creates a new `Block` linked under `parent_hash`.
    #[inline]
    pub fn new(parent_hash: u64, hash: u64) -> Self {
        Block { hash, parent_hash }
    }

    /// True when this block hangs directly off the virtual root.
    #[inline]
    pub fn is_root_child(&self) -> bool {
        self.parent_hash == ROOT_HASH
    }
}

/// Index over a block forest, rebuilt for every search.
///
/// Holds two views of the same input: parent hash to children in input
/// order (drives the top-down traversal) and block hash to block (drives
/// bottom-up parent lookup). Owned by the call that built it; nothing is
/// shared across invocations.
#[derive(Debug, Clone, Default)]
pub struct BlockTree {
    children: HashMap<u64, Vec<Block>>,
    by_hash: HashMap<u64, Block>,
}

impl BlockTree {
    /// Index `blocks`, validating their linkage first.
    ///
    /// Rejects duplicate hashes, a block hash equal to [`ROOT_HASH`],
    /// parent references that name no input block, and cycles. The search
    /// functions only ever run on a tree this constructor accepted.
    pub fn build(blocks: &[Block]) -> Result<Self> {
        validate_linkage(blocks)?;

        let mut children: HashMap<u64, Vec<Block>> = HashMap::new();
        let mut by_hash = HashMap::with_capacity(blocks.len());
        for block in blocks {
            children.entry(block.parent_hash).or_default().push(*block);
            by_hash.insert(block.hash, *block);
        }
        Ok(BlockTree { children, by_hash })
    }

    /// Children of the block named `hash`, in input order.
    pub fn children_of(&self, hash: u64) -> &[Block] {
        self.children.get(&hash).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look up a block by its own hash.
    pub fn get(&self, hash: u64) -> Option<&Block> {
        self.by_hash.get(&hash)
    }

    /// Parent of `block`, or `None` when it is a top-level block.
    pub fn parent_of(&self, block: &Block) -> Option<&Block> {
        if block.is_root_child() {
            None
        } else {
            self.by_hash.get(&block.parent_hash)
        }
    }

    /// Top-level blocks (children of the virtual root), in input order.
    pub fn roots(&self) -> &[Block] {
        self.children_of(ROOT_HASH)
    }

    /// True when `block` has no children in the forest.
    pub fn is_leaf(&self, block: &Block) -> bool {
        !self.children.contains_key(&block.hash)
    }

    /// Number of indexed blocks.
    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    /// True when the forest holds no blocks at all.
    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Testing
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_forked_forest() -> Vec<Block> {
        vec![
            Block::new(0, 1),
            Block::new(0, 2),
            Block::new(1, 3),
            Block::new(2, 4),
            Block::new(2, 5),
            Block::new(3, 6),
        ]
    }

    #[test]
    fn test_build_indexes_every_block() {
        let blocks = setup_forked_forest();
        let tree = BlockTree::build(&blocks).unwrap();

        assert_eq!(tree.len(), blocks.len());
        for block in &blocks {
            assert_eq!(tree.get(block.hash), Some(block));
        }
    }

    #[test]
    fn test_children_keep_input_order() {
        let tree = BlockTree::build(&setup_forked_forest()).unwrap();

        let forks = tree.children_of(2);
        assert_eq!(forks, &[Block::new(2, 4), Block::new(2, 5)]);
        assert_eq!(tree.roots(), &[Block::new(0, 1), Block::new(0, 2)]);
    }

    #[test]
    fn test_parent_lookup_stops_at_top_level() {
        let tree = BlockTree::build(&setup_forked_forest()).unwrap();

        let tip = Block::new(3, 6);
        assert_eq!(tree.parent_of(&tip), Some(&Block::new(1, 3)));
        assert_eq!(tree.parent_of(&Block::new(0, 1)), None);
    }

    #[test]
    fn test_leaf_detection() {
        let tree = BlockTree::build(&setup_forked_forest()).unwrap();

        assert!(tree.is_leaf(&Block::new(3, 6)));
        assert!(tree.is_leaf(&Block::new(2, 4)));
        assert!(!tree.is_leaf(&Block::new(0, 1)));
    }

    #[test]
    fn test_empty_forest() {
        let tree = BlockTree::build(&[]).unwrap();

        assert!(tree.is_empty());
        assert!(tree.roots().is_empty());
    }

    #[test]
    fn test_block_wire_shape() {
        let block = Block::new(0, 1);
        let json = serde_json::to_string(&block).unwrap();
        assert_eq!(json, r#"{"hash":1,"parent_hash":0}"#);

        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
    }
}
