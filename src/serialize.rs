//! Serialization support for change sets.
//!
//! Encodes a [`Changes`] with rkyv so a patch computed in one process can be
//! shipped to the process that owns the list (a render thread, a remote UI).
//! Positions are stored as `u64` so archives are portable across pointer
//! widths.

use crate::error::{ListDiffError, ListDiffResult};
use crate::projection::Changes;

/// Current schema version for archive validation.
/// Increment this when making breaking changes to `SerChanges`.
pub const SCHEMA_VERSION: u32 = 1;

/// Magic bytes for tola-listdiff archives.
const MAGIC: [u8; 4] = *b"TLDF";

mod concrete {
    //! Concrete serialization types.

    use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};

    /// Serializable change set.
    #[derive(Archive, RkyvSerialize, RkyvDeserialize, Debug)]
    pub struct SerChanges {
        /// Magic bytes for validation
        pub magic: [u8; 4],
        /// Schema version for compatibility checking
        pub schema_version: u32,
        pub updates: Vec<u64>,
        pub insertions: Vec<u64>,
        pub deletions: Vec<u64>,
        pub moves: Vec<(u64, u64)>,
    }
}

use concrete::*;

use rkyv::rancor::Error as RkyvError;
use rkyv::util::AlignedVec;

/// Serialize a change set to bytes.
pub fn to_bytes(changes: &Changes) -> ListDiffResult<Vec<u8>> {
    let widen = |v: &[usize]| v.iter().map(|&i| i as u64).collect::<Vec<_>>();
    let ser = SerChanges {
        magic: MAGIC,
        schema_version: SCHEMA_VERSION,
        updates: widen(&changes.updates),
        insertions: widen(&changes.insertions),
        deletions: widen(&changes.deletions),
        moves: changes
            .moves
            .iter()
            .map(|&(from, to)| (from as u64, to as u64))
            .collect(),
    };
    let bytes = rkyv::to_bytes::<RkyvError>(&ser)?;
    Ok(bytes.to_vec())
}

/// Deserialize bytes to a change set.
///
/// # Errors
///
/// Returns an error if:
/// - Magic bytes don't match (not a tola-listdiff archive)
/// - Schema version is incompatible
/// - Archive data is corrupted
/// - A position does not fit in `usize` on this platform
pub fn from_bytes(bytes: &[u8]) -> ListDiffResult<Changes> {
    // rkyv validates alignment; callers may hand us any slice
    let mut aligned = AlignedVec::<16>::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);

    let archived = rkyv::access::<ArchivedSerChanges, RkyvError>(&aligned)?;

    let magic: [u8; 4] = archived.magic;
    if magic != MAGIC {
        return Err(ListDiffError::InvalidMagic {
            expected: MAGIC,
            found: magic,
        });
    }

    let version: u32 = archived.schema_version.to_native();
    if version != SCHEMA_VERSION {
        return Err(ListDiffError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found: version,
        });
    }

    let ser = rkyv::deserialize::<SerChanges, RkyvError>(archived)?;
    let narrow = |v: Vec<u64>| -> ListDiffResult<Vec<usize>> {
        v.into_iter().map(narrow_index).collect()
    };
    Ok(Changes {
        updates: narrow(ser.updates)?,
        insertions: narrow(ser.insertions)?,
        deletions: narrow(ser.deletions)?,
        moves: ser
            .moves
            .into_iter()
            .map(|(from, to)| Ok((narrow_index(from)?, narrow_index(to)?)))
            .collect::<ListDiffResult<_>>()?,
    })
}

fn narrow_index(raw: u64) -> ListDiffResult<usize> {
    usize::try_from(raw).map_err(ListDiffError::serialize)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::projection::diff;

    #[test]
    fn test_worked_example_survives_archive() {
        let old = [(0, "Alpha"), (1, "Beta"), (2, "Charlie"), (3, "Delta")].map(Pair::from);
        let new = [(3, "Delta"), (2, "Chocolate"), (1, "Beta"), (5, "Echo")].map(Pair::from);
        let changes = diff(&old, &new);

        let bytes = to_bytes(&changes).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(from_bytes(&bytes).unwrap(), changes);
    }

    #[test]
    fn test_empty_changes() {
        let bytes = to_bytes(&Changes::default()).unwrap();
        assert!(from_bytes(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(from_bytes(b"definitely not an archive").is_err());
    }

    #[derive(PartialEq)]
    struct Pair(u32, &'static str);

    impl From<(u32, &'static str)> for Pair {
        fn from((key, content): (u32, &'static str)) -> Self {
            Pair(key, content)
        }
    }

    impl crate::Diffable for Pair {
        type Key = u32;
        fn diff_key(&self) -> u32 {
            self.0
        }
    }
}
