//
// Copyright (c) 2025 Nathan Fiedler
//

//! Signed 64-bit indexed view over a [`Sequence`].
//!
//! Consumers that track positions as `i64` (and may hold more than
//! `i32::MAX` elements) go through this view. It holds no state of its own,
//! only range checks that report negative positions as errors rather than
//! wrapping them into huge unsigned indices.

use crate::search;
use crate::{ListError, Sequence};

/// Borrowed façade exposing the sequence operations over `i64` positions.
#[derive(Debug)]
pub struct HugeView<'a, S: ?Sized> {
    inner: &'a mut S,
}

impl<'a, S: Sequence + ?Sized> HugeView<'a, S> {
    /// Wrap the given sequence.
    pub fn new(inner: &'a mut S) -> Self {
        Self { inner }
    }

    /// Number of elements, saturated at `i64::MAX`.
    pub fn size(&self) -> i64 {
        i64::try_from(self.inner.len()).unwrap_or(i64::MAX)
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::OutOfRange`] unless `0 <= index < size`.
    pub fn get(&self, index: i64) -> Result<&S::Item, ListError> {
        let position = self.check_index(index)?;
        self.inner.get(position).ok_or(ListError::OutOfRange {
            index,
            len: self.inner.len(),
        })
    }

    /// Replaces the element at `index`, returning the previous element.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::OutOfRange`] unless `0 <= index < size`.
    pub fn set(&mut self, index: i64, value: S::Item) -> Result<S::Item, ListError> {
        let position = self.check_index(index)?;
        self.inner.set(position, value)
    }

    /// Inserts `value` at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InsertOutOfRange`] unless `0 <= index <= size`.
    pub fn insert(&mut self, index: i64, value: S::Item) -> Result<(), ListError> {
        let len = self.inner.len();
        match u64::try_from(index) {
            Ok(position) if position <= len => self.inner.insert(position, value),
            _ => Err(ListError::InsertOutOfRange { index, len }),
        }
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::OutOfRange`] unless `0 <= index < size`.
    pub fn remove(&mut self, index: i64) -> Result<S::Item, ListError> {
        let position = self.check_index(index)?;
        self.inner.remove(position)
    }

    /// See [`search::search_first_not_less`].
    pub fn search_first_not_less(&self, target: &S::Item) -> i64
    where
        S::Item: Ord,
    {
        search::search_first_not_less(&*self.inner, target)
    }

    /// See [`search::search_first_greater`].
    pub fn search_first_greater(&self, target: &S::Item) -> i64
    where
        S::Item: Ord,
    {
        search::search_first_greater(&*self.inner, target)
    }

    fn check_index(&self, index: i64) -> Result<u64, ListError> {
        let len = self.inner.len();
        match u64::try_from(index) {
            Ok(position) if position < len => Ok(position),
            _ => Err(ListError::OutOfRange { index, len }),
        }
    }
}
