// Thin re-export module: implementation is in `chain/core.rs` to allow
// progressive decomposition of chain responsibilities (indexing,
// validation, search).

pub mod core;
pub use core::*;
