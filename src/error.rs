//
// Copyright (c) 2025 Nathan Fiedler
//

//! Errors returned by the fallible list operations.

/// Every variant describes a broken calling contract, the list is left
/// unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    /// Index outside of `[0, len)` for get, set, or remove.
    #[error("index (is {index}) should be < len (is {len})")]
    OutOfRange { index: i64, len: u64 },

    /// Index outside of `[0, len]` for an insertion.
    #[error("insertion index (is {index}) should be <= len (is {len})")]
    InsertOutOfRange { index: i64, len: u64 },

    /// Negative capacity requested at construction.
    #[error("capacity (is {requested}) should be >= 0")]
    InvalidCapacity { requested: i64 },

    /// The elements do not fit in a single contiguous allocation.
    #[error("{len} elements exceed the maximum contiguous allocation")]
    CapacityOverflow { len: u64 },

    /// The list was structurally modified after the cursor was created.
    #[error("list was modified (stamp {actual}, cursor expected {expected})")]
    ConcurrentModification { expected: u64, actual: u64 },

    /// Cursor removal without a preceding call to `next`.
    #[error("cursor has no current element")]
    NoCurrentElement,
}

impl ListError {
    pub(crate) fn out_of_range(index: usize, len: usize) -> Self {
        ListError::OutOfRange {
            index: signed(index),
            len: len as u64,
        }
    }

    pub(crate) fn insert_out_of_range(index: usize, len: usize) -> Self {
        ListError::InsertOutOfRange {
            index: signed(index),
            len: len as u64,
        }
    }

    /// Out of range error for a 64-bit position that may not fit in `usize`.
    pub(crate) fn wide_out_of_range(index: u64, len: usize) -> Self {
        ListError::OutOfRange {
            index: signed(index),
            len: len as u64,
        }
    }

    pub(crate) fn wide_insert_out_of_range(index: u64, len: usize) -> Self {
        ListError::InsertOutOfRange {
            index: signed(index),
            len: len as u64,
        }
    }
}

/// Clamp an unsigned index into the signed range used for error reporting.
fn signed<I: TryInto<i64>>(index: I) -> i64 {
    index.try_into().unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ListError::insert_out_of_range(5, 3);
        assert_eq!(
            err.to_string(),
            "insertion index (is 5) should be <= len (is 3)"
        );
        let err = ListError::out_of_range(3, 3);
        assert_eq!(err.to_string(), "index (is 3) should be < len (is 3)");
        let err = ListError::OutOfRange { index: -1, len: 0 };
        assert_eq!(err.to_string(), "index (is -1) should be < len (is 0)");
    }

    #[test]
    fn test_error_wide_index_kept() {
        let index: u64 = 1 << 40;
        assert_eq!(
            ListError::wide_out_of_range(index, 7),
            ListError::OutOfRange {
                index: 1 << 40,
                len: 7
            }
        );
        assert_eq!(
            ListError::wide_insert_out_of_range(index + 1, 7),
            ListError::InsertOutOfRange {
                index: (1 << 40) + 1,
                len: 7
            }
        );
        let err = ListError::wide_out_of_range(u64::MAX, 0);
        assert_eq!(
            err,
            ListError::OutOfRange {
                index: i64::MAX,
                len: 0
            }
        );
    }

    #[test]
    fn test_error_signed_clamp() {
        let err = ListError::out_of_range(usize::MAX, 10);
        assert_eq!(
            err,
            ListError::OutOfRange {
                index: i64::MAX,
                len: 10
            }
        );
    }
}
