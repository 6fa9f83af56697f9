//! In-memory list target.
//!
//! `ListModel` applies batches the way list widgets do (UITableView,
//! RecyclerView, ...): within one structural batch, deletions and move
//! sources refer to rows *before* the batch, insertions and move targets to
//! rows *after* it. Rows that are neither deleted nor moved keep their
//! relative order and fill the remaining slots.

use tracing::trace;

use crate::algo::DiffConfig;
use crate::error::{ListDiffError, ListDiffResult};
use crate::key::Diffable;
use crate::projection::{diff_batch_with_config, BatchChanges, IndexPath, StructuralBatch};

use super::{apply_batches, BatchTarget};

/// A single-section list of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListModel<T> {
    section: usize,
    rows: Vec<T>,
}

impl<T> ListModel<T> {
    /// Create a model owning `section`.
    pub fn new(section: usize, rows: Vec<T>) -> Self {
        Self { section, rows }
    }

    /// Section this model answers for
    #[inline]
    pub fn section(&self) -> usize {
        self.section
    }

    /// Current rows
    #[inline]
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Consume the model and return its rows.
    #[inline]
    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn check_section(&self, path: IndexPath) -> ListDiffResult<usize> {
        if path.section != self.section {
            return Err(ListDiffError::SectionMismatch {
                expected: self.section,
                found: path.section,
            });
        }
        Ok(path.item)
    }
}

impl<T: Diffable + Clone> ListModel<T> {
    /// Diff the current rows against `new`, apply the result, and return it.
    pub fn sync_to(&mut self, new: &[T]) -> ListDiffResult<BatchChanges> {
        self.sync_to_with_config(new, DiffConfig::default())
    }

    /// [`ListModel::sync_to`] with custom diff configuration.
    pub fn sync_to_with_config(
        &mut self,
        new: &[T],
        config: DiffConfig,
    ) -> ListDiffResult<BatchChanges> {
        let changes = diff_batch_with_config(&self.rows, new, self.section, config);
        apply_batches(self, &changes, new)?;
        Ok(changes)
    }
}

impl<T: Clone> BatchTarget for ListModel<T> {
    type Item = T;

    /// All-or-nothing: on error the rows are left untouched.
    fn apply_structural(&mut self, batch: StructuralBatch<'_>, source: &[T]) -> ListDiffResult<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let old_len = self.rows.len();
        let new_len = (old_len + batch.insertions.len())
            .checked_sub(batch.deletions.len())
            .ok_or(ListDiffError::Inconsistent {
                expected: batch.deletions.len(),
                found: old_len,
            })?;

        // Rows leaving their old slot
        let mut leaving = vec![false; old_len];
        let mut mark = |path: IndexPath| -> ListDiffResult<usize> {
            let index = self.check_section(path)?;
            let slot = leaving.get_mut(index).ok_or(ListDiffError::IndexOutOfBounds {
                index,
                len: old_len,
            })?;
            if *slot {
                return Err(ListDiffError::Inconsistent {
                    expected: old_len,
                    found: old_len + 1,
                });
            }
            *slot = true;
            Ok(index)
        };
        for &path in batch.deletions {
            mark(path)?;
        }
        let mut moved = Vec::with_capacity(batch.moves.len());
        for &(from, to) in batch.moves {
            moved.push((mark(from)?, to));
        }

        // Rows arriving at their new slot
        let mut slots: Vec<Option<T>> = vec![None; new_len];
        let mut place = |path: IndexPath, row: &T| -> ListDiffResult<()> {
            let index = self.check_section(path)?;
            let slot = slots.get_mut(index).ok_or(ListDiffError::IndexOutOfBounds {
                index,
                len: new_len,
            })?;
            if slot.is_some() {
                return Err(ListDiffError::Inconsistent {
                    expected: new_len,
                    found: new_len + 1,
                });
            }
            *slot = Some(row.clone());
            Ok(())
        };
        for &path in batch.insertions {
            let row = source.get(path.item).ok_or(ListDiffError::IndexOutOfBounds {
                index: path.item,
                len: source.len(),
            })?;
            place(path, row)?;
        }
        for &(from, to) in &moved {
            place(to, &self.rows[from])?;
        }

        // Everything else keeps its relative order
        let mut staying = self
            .rows
            .iter()
            .zip(&leaving)
            .filter(|(_, leaves)| !**leaves)
            .map(|(row, _)| row);
        let free = slots.iter().filter(|slot| slot.is_none()).count();
        let mut rows = Vec::with_capacity(new_len);
        for slot in slots {
            match slot {
                Some(row) => rows.push(row),
                None => match staying.next() {
                    Some(row) => rows.push(row.clone()),
                    None => {
                        return Err(ListDiffError::Inconsistent {
                            expected: free,
                            found: rows.len(),
                        });
                    }
                },
            }
        }
        let leftover = staying.count();
        if leftover > 0 {
            return Err(ListDiffError::Inconsistent {
                expected: free,
                found: free + leftover,
            });
        }

        trace!(
            section = self.section,
            from = old_len,
            to = new_len,
            "structural batch applied"
        );
        self.rows = rows;
        Ok(())
    }

    /// All-or-nothing: on error the rows are left untouched.
    fn reload(&mut self, updates: &[IndexPath], source: &[T]) -> ListDiffResult<()> {
        let len = self.rows.len();
        let mut targets = Vec::with_capacity(updates.len());
        for &path in updates {
            let index = self.check_section(path)?;
            if index >= len {
                return Err(ListDiffError::IndexOutOfBounds { index, len });
            }
            let row = source.get(index).ok_or(ListDiffError::IndexOutOfBounds {
                index,
                len: source.len(),
            })?;
            targets.push((index, row));
        }

        for (index, row) in targets {
            self.rows[index] = row.clone();
        }
        trace!(section = self.section, reloaded = updates.len(), "reload batch applied");
        Ok(())
    }
}
