//! Applying changes to a live list.
//!
//! - `barrier`: the two-phase ordering state machine
//! - `model`: `ListModel`, an in-memory list with widget batch semantics
//! - `async_target`: async drivers (requires `async` feature)
//!
//! A list target receives changes in two batches:
//!
//! 1. deletions, insertions and moves, as one atomic structural batch
//! 2. only after (1) has completed: reloads of updated rows
//!
//! # Example
//!
//! ```
//! use tola_listdiff::{apply_batches, diff_batch, ListModel};
//!
//! let old = vec![1, 2, 3];
//! let new = vec![3, 1, 4];
//!
//! let mut model = ListModel::new(0, old.clone());
//! apply_batches(&mut model, &diff_batch(&old, &new, 0), &new).unwrap();
//! assert_eq!(model.rows(), new.as_slice());
//! ```

mod barrier;
mod model;

#[cfg(feature = "async")]
mod async_target;

pub use barrier::{ApplyStage, PhaseTicket, TwoPhaseApply};
pub use model::ListModel;

#[cfg(feature = "async")]
pub use async_target::{apply_batches_async, apply_batches_async_with, AsyncBatchTarget};

use crate::error::ListDiffResult;
use crate::projection::{BatchChanges, IndexPath, StructuralBatch};

/// A list that can take batched structural updates and reloads.
///
/// `source` is the new sequence the changes were computed against; targets
/// read inserted and reloaded rows from it by new-side index.
pub trait BatchTarget {
    /// Row type
    type Item;

    /// Apply deletions, insertions and moves as one batch.
    fn apply_structural(
        &mut self,
        batch: StructuralBatch<'_>,
        source: &[Self::Item],
    ) -> ListDiffResult<()>;

    /// Reload rows whose content changed. Coordinates are post-structural.
    fn reload(&mut self, updates: &[IndexPath], source: &[Self::Item]) -> ListDiffResult<()>;
}

/// Apply `changes` to `target`: structural batch, then reloads.
///
/// If the structural batch fails the reloads are never attempted.
pub fn apply_batches<B: BatchTarget + ?Sized>(
    target: &mut B,
    changes: &BatchChanges,
    source: &[B::Item],
) -> ListDiffResult<()> {
    apply_batches_with(&TwoPhaseApply::new(), target, changes, source)
}

/// Like [`apply_batches`], driving a caller-owned barrier (for observing the
/// stage or attaching `on_complete`).
pub fn apply_batches_with<B: BatchTarget + ?Sized>(
    barrier: &TwoPhaseApply,
    target: &mut B,
    changes: &BatchChanges,
    source: &[B::Item],
) -> ListDiffResult<()> {
    let ticket = barrier.begin_structural()?;
    target.apply_structural(changes.structural(), source)?;
    ticket.complete();

    let ticket = barrier.begin_updates()?;
    target.reload(&changes.updates, source)?;
    ticket.complete();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::ListDiffError;

    /// Records call order; optionally fails the structural batch.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        fail_structural: bool,
    }

    impl BatchTarget for Recorder {
        type Item = u32;

        fn apply_structural(&mut self, _: StructuralBatch<'_>, _: &[u32]) -> ListDiffResult<()> {
            self.calls.push("structural");
            if self.fail_structural {
                return Err(ListDiffError::target("detached"));
            }
            Ok(())
        }

        fn reload(&mut self, _: &[IndexPath], _: &[u32]) -> ListDiffResult<()> {
            self.calls.push("reload");
            Ok(())
        }
    }

    #[test]
    fn test_structural_runs_before_reload() {
        let mut target = Recorder::default();
        let barrier = TwoPhaseApply::new();
        apply_batches_with(&barrier, &mut target, &BatchChanges::default(), &[]).unwrap();
        assert_eq!(target.calls, vec!["structural", "reload"]);
        assert!(barrier.is_done());
    }

    #[test]
    fn test_failed_structural_skips_reload() {
        let mut target = Recorder {
            fail_structural: true,
            ..Default::default()
        };
        let barrier = TwoPhaseApply::new();
        let err = apply_batches_with(&barrier, &mut target, &BatchChanges::default(), &[]);
        assert!(matches!(err, Err(ListDiffError::Target(_))));
        assert_eq!(target.calls, vec!["structural"]);
        assert_eq!(barrier.stage(), ApplyStage::Structural);
    }

    #[test]
    fn test_barrier_cannot_be_reused() {
        let mut target = Recorder::default();
        let barrier = TwoPhaseApply::new();
        apply_batches_with(&barrier, &mut target, &BatchChanges::default(), &[]).unwrap();
        let again = apply_batches_with(&barrier, &mut target, &BatchChanges::default(), &[]);
        assert!(matches!(again, Err(ListDiffError::StageOrder { .. })));
    }
}
