//! Symbol table and reference arrays (passes 1-2)
//!
//! Heckel's symbol table holds one entry per distinct key. Entries live in an
//! arena and both reference arrays point into it by [`SymbolId`], so every
//! position sees the same aggregate counts without shared ownership.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

// =============================================================================
// Occurrence count
// =============================================================================

/// Saturating occurrence counter.
///
/// The algorithm only distinguishes absent, unique and repeated keys, so
/// everything past one collapses into `Many`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Count {
    #[default]
    Zero,
    One,
    Many,
}

impl Count {
    /// Advance by one step; `Many` stays `Many`.
    #[inline]
    pub fn advance(&mut self) {
        *self = match self {
            Count::Zero => Count::One,
            Count::One | Count::Many => Count::Many,
        };
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self == Count::Zero
    }
}

// =============================================================================
// Symbol
// =============================================================================

/// Index of a [`Symbol`] in its table's arena.
///
/// Full `usize` width: a table never holds more symbols than elements, so
/// ids cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(usize);

impl SymbolId {
    #[inline]
    fn index(self) -> usize {
        self.0
    }
}

/// Per-key bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct Symbol {
    pub old_count: Count,
    pub new_count: Count,
    /// Old positions in order of occurrence
    old_positions: SmallVec<[usize; 2]>,
    /// How many of `old_positions` pass 3 has consumed
    consumed: usize,
}

impl Symbol {
    /// Key occurs in both sequences.
    #[inline]
    pub fn in_both(&self) -> bool {
        !self.old_count.is_zero() && !self.new_count.is_zero()
    }

    /// Key occurs exactly once in each sequence.
    #[inline]
    pub fn is_unique_in_both(&self) -> bool {
        self.old_count == Count::One && self.new_count == Count::One
    }

    /// Take the earliest old position not yet matched.
    #[inline]
    pub fn take_old_position(&mut self) -> Option<usize> {
        let pos = self.old_positions.get(self.consumed).copied()?;
        self.consumed += 1;
        Some(pos)
    }

    /// Old positions, consumed or not.
    #[inline]
    pub fn old_positions(&self) -> &[usize] {
        &self.old_positions
    }
}

// =============================================================================
// Reference
// =============================================================================

/// One slot of a reference array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// Not matched yet; points at the key's symbol
    Unresolved(SymbolId),
    /// Matched to this position in the other sequence
    Resolved(usize),
}

impl Reference {
    #[inline]
    pub fn symbol(self) -> Option<SymbolId> {
        match self {
            Reference::Unresolved(id) => Some(id),
            Reference::Resolved(_) => None,
        }
    }
}

// =============================================================================
// Symbol table
// =============================================================================

/// Which counter a population pass advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Old,
    New,
}

/// Arena of symbols keyed by identity.
#[derive(Debug)]
pub struct SymbolTable<K> {
    ids: FxHashMap<K, SymbolId>,
    symbols: Vec<Symbol>,
}

impl<K: Hash + Eq> SymbolTable<K> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            symbols: Vec::with_capacity(capacity),
        }
    }

    /// Record one sighting of `key` at `position` on `side`.
    pub fn observe(&mut self, key: K, side: Side, position: usize) -> SymbolId {
        let next = SymbolId(self.symbols.len());
        let id = *self.ids.entry(key).or_insert(next);
        if id == next {
            self.symbols.push(Symbol::default());
        }

        let symbol = &mut self.symbols[id.index()];
        match side {
            Side::New => symbol.new_count.advance(),
            Side::Old => {
                symbol.old_count.advance();
                symbol.old_positions.push(position);
            }
        }
        id
    }

    /// Build a reference array for one sequence (pass 1 for new, pass 2 for old).
    pub fn populate<I>(&mut self, keys: I, side: Side) -> Vec<Reference>
    where
        I: IntoIterator<Item = K>,
    {
        keys.into_iter()
            .enumerate()
            .map(|(position, key)| Reference::Unresolved(self.observe(key, side, position)))
            .collect()
    }

    #[inline]
    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    /// Number of distinct keys
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_saturates() {
        let mut c = Count::Zero;
        c.advance();
        assert_eq!(c, Count::One);
        c.advance();
        c.advance();
        assert_eq!(c, Count::Many);
    }

    #[test]
    fn test_shared_symbol_across_sides() {
        let mut table = SymbolTable::with_capacity(4);
        let new = table.populate(["a", "b"], Side::New);
        let old = table.populate(["b", "c", "b"], Side::Old);

        assert_eq!(table.len(), 3);
        assert_eq!(new[1], old[0]);
        assert_eq!(old[0], old[2]);

        let b = table.get(new[1].symbol().unwrap());
        assert_eq!(b.new_count, Count::One);
        assert_eq!(b.old_count, Count::Many);
        assert_eq!(b.old_positions(), &[0, 2]);
        assert!(b.in_both());

        let a = table.get(new[0].symbol().unwrap());
        assert!(a.old_count.is_zero());
        assert!(!a.in_both());
    }

    #[test]
    fn test_old_positions_consumed_in_order() {
        let mut table = SymbolTable::with_capacity(1);
        let old = table.populate([7, 7, 7], Side::Old);
        let id = old[0].symbol().unwrap();

        let symbol = table.get_mut(id);
        assert_eq!(symbol.take_old_position(), Some(0));
        assert_eq!(symbol.take_old_position(), Some(1));
        assert_eq!(symbol.take_old_position(), Some(2));
        assert_eq!(symbol.take_old_position(), None);
    }

    #[test]
    fn test_ids_follow_first_sighting_order() {
        let keys = 0..70_000u32;
        let mut table = SymbolTable::with_capacity(keys.len());
        let refs = table.populate(keys.clone().rev(), Side::Old);

        assert_eq!(table.len(), keys.len());
        for (position, reference) in refs.iter().enumerate() {
            assert_eq!(reference.symbol().map(SymbolId::index), Some(position));
        }
        // A repeat sighting reuses the existing id
        let again = table.observe(69_999, Side::New, 0);
        assert_eq!(again.index(), 0);
        assert_eq!(table.len(), keys.len());
    }

    #[test]
    fn test_resolved_reference_has_no_symbol() {
        assert_eq!(Reference::Resolved(3).symbol(), None);
    }
}
