//! Projections of edit steps into consumer coordinates.
//!
//! Both views group steps into four buckets and keep emission order inside
//! each bucket. Neither changes what a step means:
//!
//! - [`Changes`]: plain positions
//! - [`BatchChanges`]: positions qualified with a section, for sectioned
//!   list widgets

use std::fmt;

use crate::algo::{process_with_config, DiffConfig, EditStep};
use crate::key::Diffable;

// =============================================================================
// Changes
// =============================================================================

/// Edit steps grouped by kind, as plain positions.
///
/// - `deletions`, move sources: old positions
/// - `insertions`, `updates`, move targets: new positions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct Changes {
    pub updates: Vec<usize>,
    pub insertions: Vec<usize>,
    pub deletions: Vec<usize>,
    /// `(from, to)` pairs
    pub moves: Vec<(usize, usize)>,
}

impl Changes {
    /// Group steps by kind.
    pub fn from_steps<T>(steps: &[EditStep<'_, T>]) -> Self {
        let mut changes = Self::default();
        for step in steps {
            match *step {
                EditStep::Insert { index, .. } => changes.insertions.push(index),
                EditStep::Delete { index, .. } => changes.deletions.push(index),
                EditStep::Move { from, to, .. } => changes.moves.push((from, to)),
                EditStep::Update { index, .. } => changes.updates.push(index),
            }
        }
        changes
    }

    /// Qualify every position with `section`.
    pub fn in_section(&self, section: usize) -> BatchChanges {
        let at = |item: usize| IndexPath::new(section, item);
        BatchChanges {
            updates: self.updates.iter().copied().map(at).collect(),
            insertions: self.insertions.iter().copied().map(at).collect(),
            deletions: self.deletions.iter().copied().map(at).collect(),
            moves: self.moves.iter().map(|&(from, to)| (at(from), at(to))).collect(),
        }
    }

    /// Total number of steps
    pub fn len(&self) -> usize {
        self.updates.len() + self.insertions.len() + self.deletions.len() + self.moves.len()
    }

    /// Check if there are no changes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// IndexPath
// =============================================================================

/// Two-level coordinate: item within section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    #[inline]
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

// =============================================================================
// BatchChanges
// =============================================================================

/// Edit steps grouped by kind, as section-qualified coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchChanges {
    pub updates: Vec<IndexPath>,
    pub insertions: Vec<IndexPath>,
    pub deletions: Vec<IndexPath>,
    pub moves: Vec<(IndexPath, IndexPath)>,
}

impl BatchChanges {
    /// The first apply phase: deletions, insertions and moves.
    pub fn structural(&self) -> StructuralBatch<'_> {
        StructuralBatch {
            deletions: &self.deletions,
            insertions: &self.insertions,
            moves: &self.moves,
        }
    }

    /// Append another section's changes (e.g. to apply several sections in one batch).
    pub fn extend(&mut self, other: BatchChanges) {
        self.updates.extend(other.updates);
        self.insertions.extend(other.insertions);
        self.deletions.extend(other.deletions);
        self.moves.extend(other.moves);
    }

    /// Total number of steps
    pub fn len(&self) -> usize {
        self.updates.len() + self.insertions.len() + self.deletions.len() + self.moves.len()
    }

    /// Check if there are no changes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Borrowed view of the structural part of a [`BatchChanges`].
///
/// Coordinates follow list-widget batch semantics: deletions and move
/// sources address the list *before* the batch, insertions and move targets
/// the list *after* it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuralBatch<'a> {
    pub deletions: &'a [IndexPath],
    pub insertions: &'a [IndexPath],
    pub moves: &'a [(IndexPath, IndexPath)],
}

impl StructuralBatch<'_> {
    /// Check if the batch would leave the list untouched
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.insertions.is_empty() && self.moves.is_empty()
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Diff two sequences into position buckets.
///
/// # Example
///
/// ```
/// use tola_listdiff::diff;
///
/// let changes = diff(&[1, 2, 3], &[1, 3]);
/// assert_eq!(changes.deletions, vec![1]);
/// assert!(changes.moves.is_empty());
/// ```
pub fn diff<T: Diffable>(old: &[T], new: &[T]) -> Changes {
    diff_with_config(old, new, DiffConfig::default())
}

/// Diff two sequences into position buckets with custom configuration.
pub fn diff_with_config<T: Diffable>(old: &[T], new: &[T], config: DiffConfig) -> Changes {
    Changes::from_steps(&process_with_config(old, new, config))
}

/// Diff two sequences into section-qualified buckets.
#[must_use]
pub fn diff_batch<T: Diffable>(old: &[T], new: &[T], section: usize) -> BatchChanges {
    diff_batch_with_config(old, new, section, DiffConfig::default())
}

/// Diff two sequences into section-qualified buckets with custom configuration.
#[must_use]
pub fn diff_batch_with_config<T: Diffable>(
    old: &[T],
    new: &[T],
    section: usize,
    config: DiffConfig,
) -> BatchChanges {
    diff_with_config(old, new, config).in_section(section)
}

/// Diff many independent list pairs.
///
/// With the `parallel` feature, pairs are diffed on the rayon thread pool.
/// Output order matches input order.
#[cfg(feature = "parallel")]
pub fn diff_all<T>(pairs: &[(&[T], &[T])], config: DiffConfig) -> Vec<Changes>
where
    T: Diffable + Sync,
{
    use rayon::prelude::*;

    pairs
        .par_iter()
        .map(|(old, new)| diff_with_config(old, new, config))
        .collect()
}

/// Diff many independent list pairs.
///
/// With the `parallel` feature, pairs are diffed on the rayon thread pool.
/// Output order matches input order.
#[cfg(not(feature = "parallel"))]
pub fn diff_all<T: Diffable>(pairs: &[(&[T], &[T])], config: DiffConfig) -> Vec<Changes> {
    pairs
        .iter()
        .map(|(old, new)| diff_with_config(old, new, config))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        key: u32,
        content: &'static str,
    }

    impl Diffable for Item {
        type Key = u32;
        fn diff_key(&self) -> u32 {
            self.key
        }
    }

    fn items(entries: &[(u32, &'static str)]) -> Vec<Item> {
        entries.iter().map(|&(key, content)| Item { key, content }).collect()
    }

    fn sample() -> Vec<Item> {
        items(&[(1, "a"), (2, "b"), (3, "c"), (4, "d"), (5, "e")])
    }

    #[test]
    fn test_identity_is_empty() {
        let list = sample();
        let changes = diff(&list, &list);
        assert!(changes.is_empty());
        assert_eq!(changes, Changes::default());
    }

    #[test]
    fn test_pure_deletion() {
        let old = sample();
        for k in 0..old.len() {
            let mut new = old.clone();
            new.remove(k);
            let changes = diff(&old, &new);
            assert_eq!(
                changes,
                Changes { deletions: vec![k], ..Default::default() },
                "removing position {k}"
            );
        }
    }

    #[test]
    fn test_pure_insertion() {
        let old = sample();
        for k in 0..=old.len() {
            let mut new = old.clone();
            new.insert(k, Item { key: 99, content: "new" });
            let changes = diff(&old, &new);
            assert_eq!(
                changes,
                Changes { insertions: vec![k], ..Default::default() },
                "inserting at position {k}"
            );
        }
    }

    #[test]
    fn test_content_only_change() {
        let old = sample();
        let mut new = old.clone();
        new[2].content = "changed";
        assert_eq!(
            diff(&old, &new),
            Changes { updates: vec![2], ..Default::default() }
        );
    }

    #[test]
    fn test_reorder_yields_only_moves() {
        let old = sample();
        let new = items(&[(5, "e"), (3, "c"), (1, "a"), (4, "d"), (2, "b")]);
        let changes = diff(&old, &new);
        assert!(changes.updates.is_empty());
        assert!(changes.insertions.is_empty());
        assert!(changes.deletions.is_empty());
        assert!(!changes.moves.is_empty());
    }

    #[test]
    fn test_worked_example() {
        let old = items(&[(0, "Alpha"), (1, "Beta"), (2, "Charlie"), (3, "Delta")]);
        let new = items(&[
            (3, "Delta"),
            (2, "Chocolate"),
            (1, "Beta"),
            (5, "Echo"),
            (6, "Foxfort"),
        ]);

        let changes = diff(&old, &new);
        assert_eq!(changes.updates, vec![1]);
        assert_eq!(changes.insertions, vec![3, 4]);
        assert_eq!(changes.deletions, vec![0]);
        assert_eq!(changes.moves, vec![(3, 0), (1, 2)]);
        assert_eq!(changes.len(), 6);
    }

    #[test]
    fn test_duplicate_key_tie_break() {
        let old = items(&[(1, "a"), (7, "p1"), (2, "b"), (7, "p2")]);
        let new = items(&[(1, "a"), (7, "p1"), (2, "b")]);
        let changes = diff(&old, &new);
        assert_eq!(changes, Changes { deletions: vec![3], ..Default::default() });
    }

    #[test]
    fn test_batch_qualifies_section() {
        let old = items(&[(0, "Alpha"), (1, "Beta"), (2, "Charlie"), (3, "Delta")]);
        let new = items(&[(3, "Delta"), (2, "Chocolate"), (1, "Beta"), (5, "Echo")]);

        let batch = diff_batch(&old, &new, 4);
        assert_eq!(batch.updates, vec![IndexPath::new(4, 1)]);
        assert_eq!(batch.insertions, vec![IndexPath::new(4, 3)]);
        assert_eq!(batch.deletions, vec![IndexPath::new(4, 0)]);
        assert_eq!(
            batch.moves,
            vec![
                (IndexPath::new(4, 3), IndexPath::new(4, 0)),
                (IndexPath::new(4, 1), IndexPath::new(4, 2)),
            ]
        );
        assert_eq!(batch.len(), diff(&old, &new).len());
    }

    #[test]
    fn test_structural_view_excludes_updates() {
        let mut batch = BatchChanges::default();
        batch.updates.push(IndexPath::new(0, 0));
        assert!(batch.structural().is_empty());
        assert!(!batch.is_empty());

        let mut other = BatchChanges::default();
        other.deletions.push(IndexPath::new(1, 2));
        batch.extend(other);
        assert_eq!(batch.structural().deletions, &[IndexPath::new(1, 2)]);
    }

    #[test]
    fn test_diff_all_preserves_order() {
        let a = [1, 2, 3];
        let b = [3, 2, 1];
        let c = [1, 2];
        let pairs: [(&[i32], &[i32]); 3] = [(&a, &a), (&a, &b), (&a, &c)];

        let results = diff_all(&pairs, DiffConfig::default());
        assert_eq!(results.len(), 3);
        assert!(results[0].is_empty());
        assert!(results[1].deletions.is_empty() && !results[1].moves.is_empty());
        assert_eq!(results[2].deletions, vec![2]);
    }

    #[test]
    fn test_index_path_display() {
        assert_eq!(IndexPath::new(1, 7).to_string(), "[1, 7]");
    }
}
