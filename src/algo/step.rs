//! Edit steps: the engine's output

use std::fmt;

/// One atomic operation of a list patch.
///
/// Index spaces:
/// - `Delete::index`, `Move::from`: positions in the **old** sequence
/// - `Insert::index`, `Update::index`, `Move::to`: positions in the **new** sequence
///
/// `value` borrows the deleted old element for `Delete`, and the new
/// element otherwise.
#[derive(PartialEq, Eq)]
pub enum EditStep<'a, T> {
    /// `value` appears at `index` in new and has no counterpart in old
    Insert { index: usize, value: &'a T },
    /// Old element at `index` has no counterpart in new
    Delete { index: usize, value: &'a T },
    /// Element moved from old position `from` to new position `to`
    Move { from: usize, to: usize, value: &'a T },
    /// Same identity at new position `index`, different content
    Update { index: usize, value: &'a T },
}

impl<'a, T> EditStep<'a, T> {
    crate::impl_variant_checks!(Insert, Delete, Move, Update);

    crate::impl_variant_field_get!(value, &'a T, Insert, Delete, Move, Update);

    /// Position this step addresses in the new sequence (none for deletions).
    pub fn new_index(&self) -> Option<usize> {
        match *self {
            Self::Insert { index, .. } | Self::Update { index, .. } => Some(index),
            Self::Move { to, .. } => Some(to),
            Self::Delete { .. } => None,
        }
    }

    /// Position this step addresses in the old sequence (none for insertions and updates).
    pub fn old_index(&self) -> Option<usize> {
        match *self {
            Self::Delete { index, .. } => Some(index),
            Self::Move { from, .. } => Some(from),
            Self::Insert { .. } | Self::Update { .. } => None,
        }
    }
}

impl<T> Clone for EditStep<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EditStep<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for EditStep<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert { index, value } => write!(f, "Insert({index}, {value:?})"),
            Self::Delete { index, value } => write!(f, "Delete({index}, {value:?})"),
            Self::Move { from, to, value } => write!(f, "Move({from} -> {to}, {value:?})"),
            Self::Update { index, value } => write!(f, "Update({index}, {value:?})"),
        }
    }
}

/// Statistics from a diff
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct DiffStats {
    pub inserted: usize,
    pub deleted: usize,
    pub moved: usize,
    pub updated: usize,
}

impl DiffStats {
    /// Count steps by kind
    pub fn from_steps<T>(steps: &[EditStep<'_, T>]) -> Self {
        steps.iter().fold(Self::default(), |mut stats, step| {
            match step {
                EditStep::Insert { .. } => stats.inserted += 1,
                EditStep::Delete { .. } => stats.deleted += 1,
                EditStep::Move { .. } => stats.moved += 1,
                EditStep::Update { .. } => stats.updated += 1,
            }
            stats
        })
    }

    /// Total number of steps
    pub fn edit_count(&self) -> usize {
        self.inserted + self.deleted + self.moved + self.updated
    }

    /// Check if there are no changes
    pub fn is_empty(&self) -> bool {
        self.edit_count() == 0
    }
}
