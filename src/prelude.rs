//! Prelude module for common imports.
//!
//! ```
//! use tola_listdiff::prelude::*;
//!
//! let changes = diff(&[1, 2, 3], &[2, 3, 4]);
//! assert_eq!(changes.deletions, vec![0]);
//! assert_eq!(changes.insertions, vec![2]);
//! assert!(changes.moves.is_empty());
//! ```

// Identity
pub use crate::key::{AnyItem, Diffable};

#[cfg(feature = "macros")]
pub use tola_listdiff_macros::Diffable;

// Engine
pub use crate::algo::{process, process_with_config, DiffConfig, DiffStats, EditStep, Matching};

// Projections
pub use crate::projection::{
    diff, diff_batch, diff_batch_with_config, diff_with_config, BatchChanges, Changes, IndexPath,
};

// Apply
pub use crate::apply::{apply_batches, ApplyStage, BatchTarget, ListModel, TwoPhaseApply};

#[cfg(feature = "async")]
pub use crate::apply::{apply_batches_async, apply_batches_async_with, AsyncBatchTarget};

// Error
pub use crate::error::{ListDiffError, ListDiffResult};
