//
// Copyright (c) 2025 Nathan Fiedler
//

//! Capability trait for ordered sequences addressed by 64-bit indices.
//!
//! Implementors provide the five primitive operations, everything else (bulk
//! insertion, range removal, searching for a value) is derived from those.

use std::ops::Range;

use crate::ListError;

/// An ordered sequence of elements with random access by position.
pub trait Sequence {
    /// The type of the elements held in the sequence.
    type Item;

    /// Number of elements in the sequence.
    fn len(&self) -> u64;

    /// Reference to the element at `index`, or `None` if out of range.
    fn get(&self, index: u64) -> Option<&Self::Item>;

    /// Replace the element at `index`, returning the previous element.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::OutOfRange`] if `index` is not less than the length.
    fn set(&mut self, index: u64, value: Self::Item) -> Result<Self::Item, ListError>;

    /// Insert `value` at `index`, shifting later elements up by one.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InsertOutOfRange`] if `index` exceeds the length.
    fn insert(&mut self, index: u64, value: Self::Item) -> Result<(), ListError>;

    /// Remove and return the element at `index`, shifting later elements down
    /// by one.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::OutOfRange`] if `index` is not less than the length.
    fn remove(&mut self, index: u64) -> Result<Self::Item, ListError>;

    /// Returns true if the sequence has a length of 0.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append `value` to the end of the sequence.
    ///
    /// # Errors
    ///
    /// Only fails if the implementation cannot grow any further.
    fn push(&mut self, value: Self::Item) -> Result<(), ListError> {
        self.insert(self.len(), value)
    }

    /// Insert every item of `items` starting at `index`, preserving their
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InsertOutOfRange`] if `index` exceeds the length,
    /// in which case nothing is inserted.
    fn insert_all<I>(&mut self, index: u64, items: I) -> Result<(), ListError>
    where
        I: IntoIterator<Item = Self::Item>,
        Self: Sized,
    {
        let len = self.len();
        if index > len {
            return Err(ListError::InsertOutOfRange {
                index: i64::try_from(index).unwrap_or(i64::MAX),
                len,
            });
        }
        for (offset, item) in (index..).zip(items) {
            self.insert(offset, item)?;
        }
        Ok(())
    }

    /// Remove all elements within `range`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::OutOfRange`] if the range is inverted or extends
    /// past the end, in which case nothing is removed.
    fn remove_range(&mut self, range: Range<u64>) -> Result<(), ListError> {
        let len = self.len();
        if range.start > range.end || range.end > len {
            return Err(ListError::OutOfRange {
                index: i64::try_from(range.end).unwrap_or(i64::MAX),
                len,
            });
        }
        // back to front so the positions still to visit do not move
        for index in range.rev() {
            self.remove(index)?;
        }
        Ok(())
    }

    /// Position of the first element equal to `value`.
    fn index_of(&self, value: &Self::Item) -> Option<u64>
    where
        Self::Item: PartialEq,
    {
        (0..self.len()).find(|index| self.get(*index) == Some(value))
    }

    /// Returns true if some element is equal to `value`.
    fn contains(&self, value: &Self::Item) -> bool
    where
        Self::Item: PartialEq,
    {
        self.index_of(value).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plain vector that only provides the required operations.
    struct VecSequence(Vec<u32>);

    impl Sequence for VecSequence {
        type Item = u32;

        fn len(&self) -> u64 {
            self.0.len() as u64
        }

        fn get(&self, index: u64) -> Option<&u32> {
            self.0.get(index as usize)
        }

        fn set(&mut self, index: u64, value: u32) -> Result<u32, ListError> {
            let len = self.len();
            match self.0.get_mut(index as usize) {
                Some(slot) => Ok(std::mem::replace(slot, value)),
                None => Err(ListError::OutOfRange {
                    index: index as i64,
                    len,
                }),
            }
        }

        fn insert(&mut self, index: u64, value: u32) -> Result<(), ListError> {
            if index > self.len() {
                return Err(ListError::InsertOutOfRange {
                    index: index as i64,
                    len: self.len(),
                });
            }
            self.0.insert(index as usize, value);
            Ok(())
        }

        fn remove(&mut self, index: u64) -> Result<u32, ListError> {
            if index >= self.len() {
                return Err(ListError::OutOfRange {
                    index: index as i64,
                    len: self.len(),
                });
            }
            Ok(self.0.remove(index as usize))
        }
    }

    #[test]
    fn test_sequence_push_and_is_empty() {
        let mut sut = VecSequence(Vec::new());
        assert!(sut.is_empty());
        sut.push(1).unwrap();
        sut.push(2).unwrap();
        assert!(!sut.is_empty());
        assert_eq!(sut.0, vec![1, 2]);
    }

    #[test]
    fn test_sequence_insert_all() {
        let mut sut = VecSequence(vec![1, 5]);
        sut.insert_all(1, [2, 3, 4]).unwrap();
        assert_eq!(sut.0, vec![1, 2, 3, 4, 5]);
        sut.insert_all(5, [6]).unwrap();
        assert_eq!(sut.0, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(
            sut.insert_all(8, [7, 8]),
            Err(ListError::InsertOutOfRange { index: 8, len: 6 })
        );
        assert_eq!(sut.len(), 6);
    }

    #[test]
    fn test_sequence_remove_range() {
        let mut sut = VecSequence((0..10).collect());
        sut.remove_range(2..5).unwrap();
        assert_eq!(sut.0, vec![0, 1, 5, 6, 7, 8, 9]);
        sut.remove_range(3..3).unwrap();
        assert_eq!(sut.len(), 7);
        assert!(sut.remove_range(5..8).is_err());
        #[allow(clippy::reversed_empty_ranges)]
        let inverted = 4..2;
        assert!(sut.remove_range(inverted).is_err());
        assert_eq!(sut.len(), 7);
        sut.remove_range(0..7).unwrap();
        assert!(sut.is_empty());
    }

    #[test]
    fn test_sequence_index_of_and_contains() {
        let sut = VecSequence(vec![4, 8, 15, 16, 23, 42, 15]);
        assert_eq!(sut.index_of(&15), Some(2));
        assert_eq!(sut.index_of(&42), Some(5));
        assert_eq!(sut.index_of(&7), None);
        assert!(sut.contains(&23));
        assert!(!sut.contains(&0));
    }
}
