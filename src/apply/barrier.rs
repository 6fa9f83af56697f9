//! Two-phase apply barrier.
//!
//! A list widget cannot reload a row in the same batch that moves it: the
//! reload's coordinates are only valid once the structural batch has been
//! committed. [`TwoPhaseApply`] enforces the ordering:
//!
//! ```text
//! Pending --begin_structural--> Structural --ticket.complete--> StructuralDone
//!   --begin_updates--> Updating --ticket.complete--> UpdatesDone (+ on_complete)
//! ```
//!
//! Each phase hands out a [`PhaseTicket`]. Completing it consumes it, so a
//! phase completes at most once; dropping it leaves the apply stuck, and the
//! update phase is never started.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{ListDiffError, ListDiffResult};

/// Where a two-phase apply currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStage {
    /// Nothing started
    Pending,
    /// Deletions, insertions and moves in flight
    Structural,
    /// Structural batch committed; updates may start
    StructuralDone,
    /// Reloads in flight
    Updating,
    /// Both batches committed
    UpdatesDone,
}

impl fmt::Display for ApplyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Structural => "structural",
            Self::StructuralDone => "structural-done",
            Self::Updating => "updating",
            Self::UpdatesDone => "updates-done",
        })
    }
}

type OnComplete = Box<dyn FnOnce() + Send>;

struct Shared {
    stage: ApplyStage,
    on_complete: Option<OnComplete>,
}

/// Ordering barrier between the structural and update batches.
///
/// Cheap to clone; clones share state, so a ticket can be completed from a
/// widget's completion callback on another thread.
#[derive(Clone)]
pub struct TwoPhaseApply {
    shared: Arc<Mutex<Shared>>,
}

impl TwoPhaseApply {
    /// Create a barrier in the `Pending` stage.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                stage: ApplyStage::Pending,
                on_complete: None,
            })),
        }
    }

    /// Run `f` once, when the update phase completes.
    pub fn on_complete<F>(self, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.lock().on_complete = Some(Box::new(f));
        self
    }

    /// Current stage
    pub fn stage(&self) -> ApplyStage {
        self.shared.lock().stage
    }

    /// Whether both phases have completed
    pub fn is_done(&self) -> bool {
        self.stage() == ApplyStage::UpdatesDone
    }

    /// Start the structural phase.
    pub fn begin_structural(&self) -> ListDiffResult<PhaseTicket> {
        self.advance(ApplyStage::Pending, ApplyStage::Structural)?;
        Ok(PhaseTicket {
            shared: Arc::clone(&self.shared),
            done: ApplyStage::StructuralDone,
        })
    }

    /// Start the update phase. Fails unless the structural ticket completed.
    pub fn begin_updates(&self) -> ListDiffResult<PhaseTicket> {
        self.advance(ApplyStage::StructuralDone, ApplyStage::Updating)?;
        Ok(PhaseTicket {
            shared: Arc::clone(&self.shared),
            done: ApplyStage::UpdatesDone,
        })
    }

    fn advance(&self, expected: ApplyStage, next: ApplyStage) -> ListDiffResult<()> {
        let mut shared = self.shared.lock();
        if shared.stage != expected {
            warn!(expected = %expected, found = %shared.stage, "apply phase started out of order");
            return Err(ListDiffError::StageOrder {
                expected,
                found: shared.stage,
            });
        }
        shared.stage = next;
        debug!(stage = %next, "apply stage entered");
        Ok(())
    }
}

impl Default for TwoPhaseApply {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TwoPhaseApply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoPhaseApply")
            .field("stage", &self.stage())
            .finish()
    }
}

/// Completion handle for one apply phase.
#[must_use = "a phase that is never completed blocks the next one"]
pub struct PhaseTicket {
    shared: Arc<Mutex<Shared>>,
    done: ApplyStage,
}

impl PhaseTicket {
    /// Mark the phase finished.
    ///
    /// Completing the update phase runs the `on_complete` callback, outside
    /// the lock.
    pub fn complete(self) {
        let callback = {
            let mut shared = self.shared.lock();
            shared.stage = self.done;
            debug!(stage = %self.done, "apply stage entered");
            if self.done == ApplyStage::UpdatesDone {
                shared.on_complete.take()
            } else {
                None
            }
        };

        if let Some(callback) = callback {
            callback();
        }
    }

    /// Stage this ticket moves to on completion
    pub fn completes_to(&self) -> ApplyStage {
        self.done
    }
}

impl fmt::Debug for PhaseTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseTicket").field("done", &self.done).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_happy_path_reaches_done() {
        let apply = TwoPhaseApply::new();
        assert_eq!(apply.stage(), ApplyStage::Pending);

        let structural = apply.begin_structural().unwrap();
        assert_eq!(apply.stage(), ApplyStage::Structural);
        structural.complete();
        assert_eq!(apply.stage(), ApplyStage::StructuralDone);

        let updates = apply.begin_updates().unwrap();
        assert_eq!(updates.completes_to(), ApplyStage::UpdatesDone);
        updates.complete();
        assert!(apply.is_done());
    }

    #[test]
    fn test_updates_blocked_until_structural_completes() {
        let apply = TwoPhaseApply::new();
        let structural = apply.begin_structural().unwrap();

        let err = apply.begin_updates().unwrap_err();
        assert!(matches!(
            err,
            ListDiffError::StageOrder {
                expected: ApplyStage::StructuralDone,
                found: ApplyStage::Structural,
            }
        ));

        // Never completing the structural ticket keeps updates blocked
        drop(structural);
        assert!(apply.begin_updates().is_err());
    }

    #[test]
    fn test_structural_cannot_start_twice() {
        let apply = TwoPhaseApply::new();
        let _ticket = apply.begin_structural().unwrap();
        assert!(apply.begin_structural().is_err());
    }

    #[test]
    fn test_on_complete_fires_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let apply = TwoPhaseApply::new().on_complete(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        apply.begin_structural().unwrap().complete();
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        apply.begin_updates().unwrap().complete();
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // A finished apply cannot be restarted
        assert!(apply.begin_structural().is_err());
        assert!(apply.begin_updates().is_err());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ticket_completes_from_another_thread() {
        let apply = TwoPhaseApply::new();
        let ticket = apply.begin_structural().unwrap();
        std::thread::spawn(move || ticket.complete()).join().unwrap();
        assert_eq!(apply.stage(), ApplyStage::StructuralDone);
    }

    #[test]
    fn test_barrier_is_send_sync() {
        static_assertions::assert_impl_all!(TwoPhaseApply: Send, Sync, Clone);
        static_assertions::assert_impl_all!(PhaseTicket: Send);
    }
}
