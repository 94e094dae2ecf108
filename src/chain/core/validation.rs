use crate::chain::core::tree::{Block, ROOT_HASH};
use crate::error::{ChainError, Result};
use std::collections::HashMap;

/// Validate the parent/child linkage of `blocks`.
///
/// Checks, in order: no block claims the reserved root hash, no hash is
/// reused, every non-root parent reference names an input block, and
/// parent links are acyclic. Runs once, before indexing, so the search
/// never has to defend against malformed input mid-walk.
pub fn validate_linkage(blocks: &[Block]) -> Result<()> {
    let mut by_hash: HashMap<u64, &Block> = HashMap::with_capacity(blocks.len());
    for block in blocks {
        if block.hash == ROOT_HASH {
            return Err(ChainError::ReservedRootHash {
                parent: block.parent_hash,
            });
        }
        if by_hash.insert(block.hash, block).is_some() {
            return Err(ChainError::DuplicateHash { hash: block.hash });
        }
    }

    for block in blocks {
        if !block.is_root_child() && !by_hash.contains_key(&block.parent_hash) {
            return Err(ChainError::DanglingParent {
                block: block.hash,
                parent: block.parent_hash,
            });
        }
    }

    validate_acyclic(blocks, &by_hash)
}

/// Cycle check over parent links.
///
/// Three-state walk: blocks start unmarked, blocks on the walk in progress
/// are `InWalk`, blocks whose ancestry already checked out are `Cleared`.
/// Meeting an `InWalk` block again means the parent links loop. Cleared
/// blocks terminate later walks, so the whole pass is O(n).
fn validate_acyclic(blocks: &[Block], by_hash: &HashMap<u64, &Block>) -> Result<()> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        InWalk,
        Cleared,
    }

    let mut marks: HashMap<u64, Mark> = HashMap::with_capacity(blocks.len());
    for block in blocks {
        let mut walked = Vec::new();
        let mut cur = block;
        loop {
            match marks.get(&cur.hash).copied() {
                Some(Mark::Cleared) => break,
                Some(Mark::InWalk) => {
                    return Err(ChainError::CycleDetected { hash: cur.hash });
                }
                None => {}
            }
            marks.insert(cur.hash, Mark::InWalk);
            walked.push(cur.hash);

            if cur.is_root_child() {
                break;
            }
            match by_hash.get(&cur.parent_hash) {
                Some(parent) => cur = parent,
                // Dangling parents were rejected before this check runs.
                None => break,
            }
        }
        for hash in walked {
            marks.insert(hash, Mark::Cleared);
        }
    }
    Ok(())
}

// ----------------------------------------------------------------------------
// Testing
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_well_formed_forest() {
        let blocks = vec![
            Block::new(0, 1),
            Block::new(0, 2),
            Block::new(1, 3),
            Block::new(2, 4),
        ];
        assert!(validate_linkage(&blocks).is_ok());
    }

    #[test]
    fn test_accepts_empty_input() {
        assert!(validate_linkage(&[]).is_ok());
    }

    #[test]
    fn test_rejects_duplicate_hash() {
        let blocks = vec![Block::new(0, 1), Block::new(1, 2), Block::new(0, 2)];
        assert_eq!(
            validate_linkage(&blocks),
            Err(ChainError::DuplicateHash { hash: 2 })
        );
    }

    #[test]
    fn test_rejects_reserved_root_hash() {
        let blocks = vec![Block::new(0, 1), Block::new(1, 0)];
        assert_eq!(
            validate_linkage(&blocks),
            Err(ChainError::ReservedRootHash { parent: 1 })
        );
    }

    #[test]
    fn test_rejects_dangling_parent() {
        let blocks = vec![Block::new(0, 1), Block::new(9, 2)];
        assert_eq!(
            validate_linkage(&blocks),
            Err(ChainError::DanglingParent { block: 2, parent: 9 })
        );
    }

    #[test]
    fn test_rejects_self_parent() {
        let blocks = vec![Block::new(0, 1), Block::new(2, 2)];
        assert_eq!(
            validate_linkage(&blocks),
            Err(ChainError::CycleDetected { hash: 2 })
        );
    }

    #[test]
    fn test_rejects_two_block_cycle() {
        let blocks = vec![Block::new(0, 1), Block::new(3, 2), Block::new(2, 3)];
        let err = validate_linkage(&blocks).unwrap_err();
        assert!(matches!(err, ChainError::CycleDetected { hash } if hash == 2 || hash == 3));
    }

    #[test]
    fn test_cycle_behind_valid_chain_is_still_caught() {
        // 1 -> 2 is a fine chain; 7/8/9 loop off to the side.
        let blocks = vec![
            Block::new(0, 1),
            Block::new(1, 2),
            Block::new(9, 7),
            Block::new(7, 8),
            Block::new(8, 9),
        ];
        assert!(matches!(
            validate_linkage(&blocks),
            Err(ChainError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_error_messages_name_the_hashes() {
        let err = ChainError::DanglingParent {
            block: 0x2a,
            parent: 0xff,
        };
        assert_eq!(
            err.to_string(),
            "block 0x2a references unknown parent 0xff"
        );
    }
}
