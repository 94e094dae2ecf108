//! Error types for blocktree

use thiserror::Error;

/// Failures detected while indexing a block forest.
///
/// Every variant is produced by the up-front linkage validation; once a
/// forest has been indexed, the search itself cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChainError {
    /// Two input blocks share the same hash.
    #[error("duplicate block hash {hash:#x}")]
    DuplicateHash {
        /// The hash carried by more than one block.
        hash: u64,
    },
    /// A block names a parent that is neither the root marker nor any
    /// block in the input.
    #[error("block {block:#x} references unknown parent {parent:#x}")]
    DanglingParent {
        /// Hash of the block with the unresolved reference.
        block: u64,
        /// The parent hash that named no block.
        parent: u64,
    },
    /// Parent links form a loop through the named block.
    #[error("cycle in parent links through block {hash:#x}")]
    CycleDetected {
        /// A block on the loop.
        hash: u64,
    },
    /// A block claims hash `0`, which is reserved as the root marker.
    #[error("block hash 0 is reserved for the virtual root (parent {parent:#x})")]
    ReservedRootHash {
        /// Parent hash of the offending block, to help locate it.
        parent: u64,
    },
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
