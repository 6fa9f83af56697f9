//! Error types for tola-listdiff.
//!
//! Diffing itself never fails. Errors come from applying a patch to a list
//! target and from decoding archived change sets.

use thiserror::Error;

use crate::apply::ApplyStage;

/// Errors that can occur while applying or decoding changes.
#[derive(Debug, Error)]
pub enum ListDiffError {
    /// An apply phase was started from the wrong stage
    #[error("apply phase out of order: expected stage {expected}, found {found}")]
    StageOrder {
        /// Stage the phase requires
        expected: ApplyStage,
        /// Stage the apply was in
        found: ApplyStage,
    },

    /// A batch addressed a row that does not exist
    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds {
        /// Offending row index
        index: usize,
        /// Row count at the time
        len: usize,
    },

    /// A batch addressed a section the target does not own
    #[error("section mismatch: target owns section {expected}, batch addressed {found}")]
    SectionMismatch {
        /// Section of the target
        expected: usize,
        /// Section named in the batch
        found: usize,
    },

    /// Row counts before/after a batch do not add up
    #[error("inconsistent batch: expected {expected} rows, found {found}")]
    Inconsistent {
        /// Row count implied by the batch
        expected: usize,
        /// Row count actually available
        found: usize,
    },

    /// The list target failed to apply a batch
    #[error("list target failed: {0}")]
    Target(String),

    /// Archive version mismatch - data was serialized with an incompatible version
    #[error("archive version mismatch: expected v{expected}, found v{found}")]
    VersionMismatch {
        /// Expected schema version
        expected: u32,
        /// Found schema version
        found: u32,
    },

    /// Magic bytes validation failed
    #[error("invalid archive format: expected magic bytes {expected:?}, found {found:?}")]
    InvalidMagic {
        /// Expected magic bytes
        expected: [u8; 4],
        /// Found magic bytes
        found: [u8; 4],
    },

    /// Serialization/deserialization failed
    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Result type alias for apply and archive operations.
pub type ListDiffResult<T> = Result<T, ListDiffError>;

impl ListDiffError {
    /// Wrap a list target's own error.
    pub fn target(err: impl std::fmt::Display) -> Self {
        Self::Target(err.to_string())
    }

    /// Create a serialization error from any error type.
    pub fn serialize(err: impl std::error::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

#[cfg(feature = "archive")]
impl From<rkyv::rancor::Error> for ListDiffError {
    fn from(err: rkyv::rancor::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ListDiffError::VersionMismatch { expected: 2, found: 1 };
        assert_eq!(err.to_string(), "archive version mismatch: expected v2, found v1");

        let err = ListDiffError::IndexOutOfBounds { index: 5, len: 3 };
        assert_eq!(err.to_string(), "index 5 out of bounds for list of length 3");

        let err = ListDiffError::StageOrder {
            expected: ApplyStage::StructuralDone,
            found: ApplyStage::Structural,
        };
        assert_eq!(
            err.to_string(),
            "apply phase out of order: expected stage structural-done, found structural"
        );
    }

    #[test]
    fn test_target_wraps_display() {
        let err = ListDiffError::target("widget detached");
        assert_eq!(err.to_string(), "list target failed: widget detached");
    }

    #[test]
    fn test_error_is_send_sync() {
        static_assertions::assert_impl_all!(ListDiffError: Send, Sync);
    }
}
