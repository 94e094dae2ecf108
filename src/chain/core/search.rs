//! Longest-chain search over an indexed block forest.
//!
//! Two traversals are provided and are interchangeable on validated
//! input: a top-down depth-first walk from the virtual root, and a
//! bottom-up walk from every candidate leaf. Both return the deepest
//! root-to-leaf path, root-child first.

use crate::chain::core::tree::{Block, BlockTree, ROOT_HASH};
use crate::error::Result;
use tracing::debug;

/// Traversal strategy for the longest-chain search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// Depth-first walk from the virtual root over the children index.
    #[default]
    TopDown,
    /// Walk every candidate leaf upward to the root, keep the longest.
    BottomUp,
}

/// Find the longest root-to-leaf chain in `blocks`.
///
/// The returned path starts at a child of the virtual root (parent hash
/// [`ROOT_HASH`]) and ends at a leaf; empty input yields an empty path.
/// When several paths tie for longest, the first one found in traversal
/// order wins: depth-first with the earliest input-order sibling explored
/// first. Uses [`Traversal::TopDown`].
pub fn find_longest_chain(blocks: &[Block]) -> Result<Vec<Block>> {
    find_longest_chain_with(blocks, Traversal::TopDown)
}

/// Find the longest root-to-leaf chain using an explicit traversal.
///
/// Linkage is validated up front, so both traversals see the same
/// well-formed forest and agree on the result whenever the longest path
/// is unique. On ties each traversal keeps the first longest path it
/// finds, which may differ between the two.
pub fn find_longest_chain_with(blocks: &[Block], traversal: Traversal) -> Result<Vec<Block>> {
    let tree = BlockTree::build(blocks)?;
    let path = match traversal {
        Traversal::TopDown => walk_top_down(&tree),
        Traversal::BottomUp => walk_bottom_up(blocks, &tree),
    };
    debug!(
        blocks = tree.len(),
        path_len = path.len(),
        tip = path.last().map_or(ROOT_HASH, |b| b.hash),
        ?traversal,
        "longest chain selected"
    );
    Ok(path)
}

/// Depth-first walk from the virtual root; the deepest leaf wins.
///
/// Runs on an explicit work-list so chain depth is bounded by heap rather
/// than call stack. Paths share structure through an append-only arena:
/// each visited block records the arena slot of its predecessor, and only
/// the winning leaf's path is materialized at the end, so sibling branches
/// never observe each other's extensions. Children are pushed in reverse
/// so the earliest input-order sibling pops first, keeping the recursive
/// formulation's first-found tie-break.
fn walk_top_down(tree: &BlockTree) -> Vec<Block> {
    struct Visit {
        block: Block,
        prev: Option<usize>,
        depth: usize,
    }

    let mut arena: Vec<Visit> = Vec::with_capacity(tree.len());
    let mut work: Vec<(Block, Option<usize>)> = Vec::new();
    for root in tree.roots().iter().rev() {
        work.push((*root, None));
    }

    // Arena slot and depth of the deepest leaf seen so far.
    let mut best: Option<(usize, usize)> = None;

    while let Some((block, prev)) = work.pop() {
        let depth = prev.map_or(1, |slot| arena[slot].depth + 1);
        let slot = arena.len();
        arena.push(Visit { block, prev, depth });

        let children = tree.children_of(block.hash);
        if children.is_empty() {
            // Strictly greater: the first longest leaf keeps its win.
            if best.map_or(true, |(_, best_depth)| depth > best_depth) {
                best = Some((slot, depth));
            }
        }
        for child in children.iter().rev() {
            work.push((*child, Some(slot)));
        }
    }

    let Some((tip, depth)) = best else {
        return Vec::new();
    };
    let mut path = Vec::with_capacity(depth);
    let mut slot = Some(tip);
    while let Some(s) = slot {
        path.push(arena[s].block);
        slot = arena[s].prev;
    }
    path.reverse();
    path
}

/// Walk every input block upward to the root, keep the longest walk.
///
/// Each block is tried as a candidate leaf in input order; a block that
/// has children only produces a prefix of some leaf's walk and can never
/// win, so no leaf check is needed. After validation the upward walk
/// always terminates at a top-level block. The winning walk is reversed
/// into root-first order at the end.
fn walk_bottom_up(blocks: &[Block], tree: &BlockTree) -> Vec<Block> {
    let mut longest: Vec<Block> = Vec::new();
    for block in blocks {
        let mut path = vec![*block];
        let mut cur = block;
        while let Some(parent) = tree.parent_of(cur) {
            path.push(*parent);
            cur = parent;
        }
        if path.len() > longest.len() {
            longest = path;
        }
    }
    longest.reverse();
    longest
}

// ----------------------------------------------------------------------------
// Testing
// ----------------------------------------------------------------------------
