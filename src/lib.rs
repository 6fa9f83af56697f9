//! tola-listdiff - Keyed list diffing with move detection
//!
//! ## Core Concepts
//!
//! **Identity vs. content**: elements are matched by key ([`Diffable`]) and
//! compared by `PartialEq`. Same key with different content is an update,
//! not a delete + insert.
//!
//! **Linear time**: the engine is Heckel's symbol-table algorithm. It never
//! builds an LCS table, so it runs in O(n + m) and reports moves directly.
//!
//! ## Modules
//! - `algo`: the engine (`process`), symbol table, edit steps, hashing
//! - `key`: identity contract and the type-erased [`AnyItem`]
//! - `projection`: edit steps grouped into index sets (`diff`, `diff_batch`)
//! - `apply`: two-phase batch application to list targets
//! - `serialize`: archived change sets (requires `archive` feature)
//!
//! ## Usage
//!
//! ```
//! use tola_listdiff::{diff, Diffable};
//!
//! #[derive(PartialEq)]
//! struct Row {
//!     id: u32,
//!     title: &'static str,
//! }
//!
//! impl Diffable for Row {
//!     type Key = u32;
//!     fn diff_key(&self) -> u32 {
//!         self.id
//!     }
//! }
//!
//! let row = |id, title| Row { id, title };
//! let old = [row(0, "Alpha"), row(1, "Beta"), row(2, "Charlie"), row(3, "Delta")];
//! let new = [row(3, "Delta"), row(2, "Chocolate"), row(1, "Beta"), row(5, "Echo"), row(6, "Fox")];
//!
//! let changes = diff(&old, &new);
//! assert_eq!(changes.updates, vec![1]);
//! assert_eq!(changes.insertions, vec![3, 4]);
//! assert_eq!(changes.deletions, vec![0]);
//! assert_eq!(changes.moves, vec![(3, 0), (1, 2)]);
//! ```

extern crate self as tola_listdiff;

mod macros;

// =============================================================================
// Core modules
// =============================================================================

/// Diff engine: process, symbol table, edit steps
pub mod algo;

/// Identity contract and type erasure
pub mod key;

/// Index-set projections of edit steps
pub mod projection;

/// Two-phase apply
pub mod apply;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

/// Serialization support
#[cfg(feature = "archive")]
pub mod serialize;

// =============================================================================
// Re-exports
// =============================================================================

// Identity
pub use key::{AnyItem, Diffable};

// Engine
pub use algo::{
    process, process_with_config, DiffConfig, DiffStats, EditStep, Matching, StableHasher,
    StableKey,
};

// Projections
pub use projection::{
    diff, diff_all, diff_batch, diff_batch_with_config, diff_with_config, BatchChanges, Changes,
    IndexPath, StructuralBatch,
};

// Apply
pub use apply::{
    apply_batches, apply_batches_with, ApplyStage, BatchTarget, ListModel, PhaseTicket,
    TwoPhaseApply,
};

#[cfg(feature = "async")]
pub use apply::{apply_batches_async, apply_batches_async_with, AsyncBatchTarget};

// Error types
pub use error::{ListDiffError, ListDiffResult};

// Derive macro; lives in the macro namespace next to the trait
#[cfg(feature = "macros")]
pub use tola_listdiff_macros::Diffable;

// =============================================================================
// Tests
// =============================================================================
