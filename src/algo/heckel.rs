//! Heckel's Linear-Time List Diff
//!
//! Computes insertions, deletions, moves and updates between two keyed
//! sequences.
//!
//! # Algorithm
//!
//! ```text
//! pass 1  new -> symbol table (new counts)        -> new references
//! pass 2  old -> symbol table (old counts, lines) -> old references
//! pass 3  anchor pairs, earliest unmatched old occurrence first
//!         Ordered: any key present on both sides
//!         Heckel:  keys occurring exactly once on each side
//! pass 4  (Heckel) grow matches forward over equal-key neighbours
//! pass 5  (Heckel) grow matches backward over equal-key neighbours
//! emit    unresolved old -> Delete
//!         unresolved new -> Insert
//!         resolved       -> Update if content differs,
//!                           Move if the effective position shifted
//! ```
//!
//! # Move Detection
//!
//! Positions are compared after discounting earlier deletions (old side)
//! and earlier insertions (new side). A deletion near the top of the list
//! therefore does not register every row below it as moved.
//!
//! # Complexity
//!
//! - Time: O(n + m), one hash lookup per element
//! - Space: O(n + m) for the table and both reference arrays
//!
//! # References
//!
//! - Heckel, P. "A Technique for Isolating Differences Between Files" (1978)

use tracing::{debug, trace};

use crate::key::Diffable;

use super::step::{DiffStats, EditStep};
use super::symbol::{Reference, Side, Symbol, SymbolTable};

// =============================================================================
// Configuration
// =============================================================================

/// How pass 3 picks anchor pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Matching {
    /// Passes 1-3: every key present on both sides is paired in order of
    /// occurrence. Runs of unique keys are matched key by key and never
    /// extended by adjacency.
    #[default]
    Ordered,
    /// Passes 1-5 as in the paper: only keys occurring exactly once on each
    /// side anchor a match, then matches grow forward and backward over
    /// neighbours sharing a key. Repeated keys away from any anchor become
    /// delete + insert pairs.
    Heckel,
}

/// Configuration for the diff engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffConfig {
    /// Anchor selection.
    /// Default: `Matching::Ordered`
    pub matching: Matching,
}

impl DiffConfig {
    /// Create config with explicit matching.
    pub fn new(matching: Matching) -> Self {
        Self { matching }
    }

    /// All five passes of the original paper.
    pub fn heckel() -> Self {
        Self::new(Matching::Heckel)
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Diff two sequences, returning edit steps in emission order.
///
/// Emission order: every deletion (ascending old index), then a single walk
/// over the new sequence emitting `Insert`, or `Update` and/or `Move`, per
/// position. An element that moved *and* changed yields both steps, update
/// first.
///
/// # Example
///
/// ```
/// use tola_listdiff::{process, EditStep};
///
/// let steps = process(&["a", "b", "c"], &["c", "a", "b"]);
/// assert!(matches!(steps[0], EditStep::Move { from: 2, to: 0, .. }));
/// ```
pub fn process<'a, T: Diffable>(old: &'a [T], new: &'a [T]) -> Vec<EditStep<'a, T>> {
    process_with_config(old, new, DiffConfig::default())
}

/// Diff two sequences with custom configuration.
pub fn process_with_config<'a, T: Diffable>(
    old: &'a [T],
    new: &'a [T],
    config: DiffConfig,
) -> Vec<EditStep<'a, T>> {
    // Quick paths
    if old.is_empty() {
        return new
            .iter()
            .enumerate()
            .map(|(index, value)| EditStep::Insert { index, value })
            .collect();
    }

    if new.is_empty() {
        return old
            .iter()
            .enumerate()
            .map(|(index, value)| EditStep::Delete { index, value })
            .collect();
    }

    Heckel::new(old, new, config).run()
}

// =============================================================================
// Engine
// =============================================================================

/// One diff invocation. Consumed by [`Heckel::run`]; never reused.
struct Heckel<'a, T: Diffable> {
    old: &'a [T],
    new: &'a [T],
    config: DiffConfig,
    table: SymbolTable<T::Key>,
    /// Heckel's OA
    old_refs: Vec<Reference>,
    /// Heckel's NA
    new_refs: Vec<Reference>,
}

impl<'a, T: Diffable> Heckel<'a, T> {
    fn new(old: &'a [T], new: &'a [T], config: DiffConfig) -> Self {
        let mut table = SymbolTable::with_capacity(old.len().max(new.len()));
        let new_refs = table.populate(new.iter().map(Diffable::diff_key), Side::New);
        let old_refs = table.populate(old.iter().map(Diffable::diff_key), Side::Old);
        trace!(symbols = table.len(), old = old.len(), new = new.len(), "symbol table built");

        Self {
            old,
            new,
            config,
            table,
            old_refs,
            new_refs,
        }
    }

    fn run(mut self) -> Vec<EditStep<'a, T>> {
        match self.config.matching {
            Matching::Ordered => self.match_keys(Symbol::in_both),
            Matching::Heckel => {
                self.match_keys(Symbol::is_unique_in_both);
                self.expand_forward();
                self.expand_backward();
            }
        }

        let steps = self.emit();
        let stats = DiffStats::from_steps(&steps);
        debug!(
            old = self.old.len(),
            new = self.new.len(),
            inserted = stats.inserted,
            deleted = stats.deleted,
            moved = stats.moved,
            updated = stats.updated,
            "list diff computed"
        );
        steps
    }

    /// Pass 3: pair each new position whose symbol passes `anchor` with the
    /// earliest old occurrence not yet taken.
    fn match_keys(&mut self, anchor: fn(&Symbol) -> bool) {
        for i in 0..self.new_refs.len() {
            let Reference::Unresolved(id) = self.new_refs[i] else {
                continue;
            };
            let symbol = self.table.get_mut(id);
            if !anchor(symbol) {
                continue;
            }
            if let Some(j) = symbol.take_old_position() {
                self.link(j, i);
            }
        }
    }

    /// Pass 4: if new[i] <-> old[j], try new[i+1] <-> old[j+1].
    fn expand_forward(&mut self) {
        for i in 0..self.new_refs.len().saturating_sub(1) {
            if let Reference::Resolved(j) = self.new_refs[i] {
                if j + 1 < self.old_refs.len() {
                    self.link_if_same_symbol(j + 1, i + 1);
                }
            }
        }
    }

    /// Pass 5: if new[i] <-> old[j], try new[i-1] <-> old[j-1].
    fn expand_backward(&mut self) {
        for i in (1..self.new_refs.len()).rev() {
            if let Reference::Resolved(j) = self.new_refs[i] {
                if j > 0 {
                    self.link_if_same_symbol(j - 1, i - 1);
                }
            }
        }
    }

    fn link_if_same_symbol(&mut self, old_index: usize, new_index: usize) {
        match (self.old_refs[old_index].symbol(), self.new_refs[new_index].symbol()) {
            (Some(a), Some(b)) if a == b => self.link(old_index, new_index),
            _ => {}
        }
    }

    #[inline]
    fn link(&mut self, old_index: usize, new_index: usize) {
        self.old_refs[old_index] = Reference::Resolved(new_index);
        self.new_refs[new_index] = Reference::Resolved(old_index);
    }

    /// Final pass: turn both reference arrays into edit steps.
    fn emit(&self) -> Vec<EditStep<'a, T>> {
        let mut steps = Vec::new();

        // Deletions, recording how many precede each old position
        let mut delete_offsets = Vec::with_capacity(self.old_refs.len());
        let mut deleted = 0;
        for (index, reference) in self.old_refs.iter().enumerate() {
            delete_offsets.push(deleted);
            if let Reference::Unresolved(_) = reference {
                steps.push(EditStep::Delete {
                    index,
                    value: &self.old[index],
                });
                deleted += 1;
            }
        }

        // Insertions, updates, moves
        let mut inserted = 0;
        for (index, reference) in self.new_refs.iter().enumerate() {
            let value = &self.new[index];
            match *reference {
                Reference::Unresolved(_) => {
                    steps.push(EditStep::Insert { index, value });
                    inserted += 1;
                }
                Reference::Resolved(from) => {
                    if self.old[from] != *value {
                        steps.push(EditStep::Update { index, value });
                    }
                    // delete_offsets[from] <= from: at most one deletion per earlier slot
                    if from - delete_offsets[from] + inserted != index {
                        steps.push(EditStep::Move { from, to: index, value });
                    }
                }
            }
        }

        steps
    }
}

// =============================================================================
// Tests
// =============================================================================
