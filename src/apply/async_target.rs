//! Async batch apply.
//!
//! Only available with the `async` feature.
//!
//! For targets whose batch completion is itself asynchronous (an animation
//! finishing, a render thread acknowledging a frame). The structural future
//! is awaited to completion before the reload future is even created.

use futures_util::future::{self, BoxFuture, FutureExt};

use crate::error::ListDiffResult;
use crate::projection::{BatchChanges, IndexPath, StructuralBatch};

use super::{BatchTarget, ListModel, TwoPhaseApply};

/// A list target whose batches complete asynchronously.
///
/// # Example
///
/// ```ignore
/// impl AsyncBatchTarget for RemoteList {
///     type Item = Row;
///
///     fn apply_structural<'a>(
///         &'a mut self,
///         batch: StructuralBatch<'a>,
///         source: &'a [Row],
///     ) -> BoxFuture<'a, ListDiffResult<()>> {
///         async move {
///             self.client.send_structural(batch, source).await.map_err(ListDiffError::target)
///         }
///         .boxed()
///     }
///
///     // reload(...) likewise
/// }
/// ```
pub trait AsyncBatchTarget: Send {
    /// Row type
    type Item: Sync;

    /// Apply deletions, insertions and moves; resolve once committed.
    fn apply_structural<'a>(
        &'a mut self,
        batch: StructuralBatch<'a>,
        source: &'a [Self::Item],
    ) -> BoxFuture<'a, ListDiffResult<()>>;

    /// Reload updated rows; resolve once committed.
    fn reload<'a>(
        &'a mut self,
        updates: &'a [IndexPath],
        source: &'a [Self::Item],
    ) -> BoxFuture<'a, ListDiffResult<()>>;
}

/// Apply `changes` to `target`: structural batch, then reloads.
///
/// If the structural future fails (or is dropped before resolving) the
/// reloads are never attempted.
pub async fn apply_batches_async<B: AsyncBatchTarget + ?Sized>(
    target: &mut B,
    changes: &BatchChanges,
    source: &[B::Item],
) -> ListDiffResult<()> {
    apply_batches_async_with(&TwoPhaseApply::new(), target, changes, source).await
}

/// Like [`apply_batches_async`], driving a caller-owned barrier (for
/// observing the stage or attaching `on_complete`).
pub async fn apply_batches_async_with<B: AsyncBatchTarget + ?Sized>(
    barrier: &TwoPhaseApply,
    target: &mut B,
    changes: &BatchChanges,
    source: &[B::Item],
) -> ListDiffResult<()> {
    let ticket = barrier.begin_structural()?;
    target.apply_structural(changes.structural(), source).await?;
    ticket.complete();

    let ticket = barrier.begin_updates()?;
    target.reload(&changes.updates, source).await?;
    ticket.complete();
    Ok(())
}

impl<T: Clone + Send + Sync> AsyncBatchTarget for ListModel<T> {
    type Item = T;

    fn apply_structural<'a>(
        &'a mut self,
        batch: StructuralBatch<'a>,
        source: &'a [T],
    ) -> BoxFuture<'a, ListDiffResult<()>> {
        future::ready(BatchTarget::apply_structural(self, batch, source)).boxed()
    }

    fn reload<'a>(
        &'a mut self,
        updates: &'a [IndexPath],
        source: &'a [T],
    ) -> BoxFuture<'a, ListDiffResult<()>> {
        future::ready(BatchTarget::reload(self, updates, source)).boxed()
    }
}
