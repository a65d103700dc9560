//
// Copyright (c) 2025 Nathan Fiedler
//

//! A block array list: an ordered sequence built from an array of fixed-size
//! circular buffers, in the manner of the tiered vectors of Goodrich and Kloss.
//!
//! Every block has the same power-of-two capacity `2^k`. All blocks are full
//! except possibly the last one that holds any elements, which means the block
//! of a position is found by shifting the index right by `k`. Inserting or
//! removing in the middle of the list shifts elements within one block and
//! then carries a single element across each of the following blocks.
//!
//! # Memory Usage
//!
//! Blocks are allocated lazily as elements arrive. When the list outgrows its
//! blocks, pairs of blocks are merged to double both the number of block slots
//! and the capacity of each block, which keeps the block size on the order of
//! √N. When the list shrinks to a twelfth of its capacity, the blocks are split
//! in halves again. Blocks that become empty are released immediately.
//!
//! # Performance
//!
//! O(1) get and set, amortized O(1) push, and O(√N) insert and remove at
//! arbitrary positions.
//!
//! # Safety
//!
//! The blocks manage their own memory using raw pointers, hence the `unsafe`
//! blocks in the [`block`] module.

use std::alloc::Layout;
use std::fmt;
use std::ops::{Index, IndexMut};

pub mod block;
mod error;
pub mod huge;
pub mod search;
mod sequence;

pub use block::Block;
pub use error::ListError;
pub use huge::HugeView;
pub use sequence::Sequence;

/// Block size exponent of a new list, blocks of 16 elements.
pub const DEFAULT_BLOCK_BITS: usize = 4;

/// The block array never shrinks below this many slots.
const MIN_BLOCKS: usize = 2;

/// Compact once the length times this value no longer exceeds the capacity.
/// Must be at least 8 for the amortized bounds to hold.
const REDUCTION_COEFFICIENT: usize = 12;

/// Ordered sequence with constant time access and O(√N) insertion and removal
/// at any position.
pub struct DynamicList<T> {
    /// each block holds 2^block_bits elements
    block_bits: usize,
    /// block size exponent that `clear()` returns to
    initial_bits: usize,
    /// number of elements in the list
    size: usize,
    /// bumped on every structural change, checked by cursors
    mod_count: u64,
    /// block slots, `None` until first written
    blocks: Vec<Option<Block<T>>>,
}

impl<T> DynamicList<T> {
    /// Return an empty list with the default block size.
    pub fn new() -> Self {
        Self::with_block_bits(DEFAULT_BLOCK_BITS)
    }

    /// Return an empty list that will hold at least `capacity` elements before
    /// it needs to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut list = Self::new();
        list.ensure_capacity(capacity);
        list
    }

    /// Like [`with_capacity()`](Self::with_capacity) for callers that count
    /// with signed 64-bit integers.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidCapacity`] for a negative capacity, and
    /// [`ListError::CapacityOverflow`] if the capacity is not addressable on
    /// this platform.
    pub fn try_with_capacity(capacity: i64) -> Result<Self, ListError> {
        let Ok(wanted) = u64::try_from(capacity) else {
            return Err(ListError::InvalidCapacity {
                requested: capacity,
            });
        };
        let Ok(wanted) = usize::try_from(wanted) else {
            return Err(ListError::CapacityOverflow { len: wanted });
        };
        check_contiguous::<T>(wanted)?;
        Ok(Self::with_capacity(wanted))
    }

    /// Return an empty list whose blocks start out holding `2^bits` elements.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is zero or so large that the capacity would overflow.
    pub fn with_block_bits(bits: usize) -> Self {
        if bits < 1 || bits >= (usize::BITS / 2) as usize {
            panic!(
                "block bits (is {bits}) should be >= 1 and < {}",
                usize::BITS / 2
            );
        }
        Self {
            block_bits: bits,
            initial_bits: bits,
            size: 0,
            mod_count: 0,
            blocks: empty_slots(MIN_BLOCKS),
        }
    }

    /// Number of elements each block can hold.
    #[inline]
    fn block_capacity(&self) -> usize {
        1 << self.block_bits
    }

    #[inline]
    fn block_mask(&self) -> usize {
        self.block_capacity() - 1
    }

    /// Grow until at least `required` elements fit.
    fn ensure_capacity(&mut self, required: usize) {
        while self.capacity() < required {
            self.expand();
        }
    }

    /// Double both the number of block slots and the size of each block by
    /// merging neighboring pairs of blocks.
    fn expand(&mut self) {
        let old_count = self.blocks.len();
        let merged_capacity = self.block_capacity() << 1;
        let mut blocks: Vec<Option<Block<T>>> = Vec::with_capacity(old_count * 2);
        let mut old = std::mem::take(&mut self.blocks).into_iter();
        while let Some(a) = old.next() {
            let b = old.next().flatten();
            let merged = Block::merge(merged_capacity, a, b);
            if merged.is_empty() {
                // only empty blocks follow an empty block
                break;
            }
            blocks.push(Some(merged));
        }
        assert!(
            old.all(|slot| slot.is_none_or(|block| block.is_empty())),
            "non-empty block found after an empty block"
        );
        blocks.resize_with(old_count * 2, || None);
        self.blocks = blocks;
        self.block_bits += 1;
        self.mod_count += 1;
        tracing::debug!(
            block_bits = self.block_bits,
            blocks = self.blocks.len(),
            len = self.size,
            "expanded block array"
        );
    }

    /// Halve the number of block slots and the size of each block, if the list
    /// has become sparse enough.
    fn compact(&mut self) {
        let old_count = self.blocks.len();
        if old_count <= MIN_BLOCKS {
            return;
        }
        if self.size.saturating_mul(REDUCTION_COEFFICIENT) > self.capacity() {
            return;
        }
        let new_count = old_count / 2;
        let mut blocks: Vec<Option<Block<T>>> = Vec::with_capacity(new_count);
        let mut old = std::mem::take(&mut self.blocks).into_iter();
        for slot in old.by_ref() {
            let (left, right) = Block::split(slot);
            let Some(left) = left else {
                break;
            };
            blocks.push(Some(left));
            let Some(right) = right else {
                break;
            };
            blocks.push(Some(right));
        }
        assert!(
            old.all(|slot| slot.is_none_or(|block| block.is_empty())),
            "non-empty block found after a partial block"
        );
        debug_assert!(blocks.len() <= new_count);
        blocks.resize_with(new_count, || None);
        self.blocks = blocks;
        self.block_bits -= 1;
        self.mod_count += 1;
        tracing::debug!(
            block_bits = self.block_bits,
            blocks = self.blocks.len(),
            len = self.size,
            "compacted block array"
        );
    }

    /// Block in the given slot, allocated on first use.
    fn block_mut(&mut self, slot: usize) -> &mut Block<T> {
        let capacity = self.block_capacity();
        self.blocks[slot].get_or_insert_with(|| Block::new(capacity))
    }

    /// Inserts an element at position `index` within the list, shifting all
    /// elements after it up by one.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InsertOutOfRange`] if `index > len`.
    ///
    /// # Time complexity
    ///
    /// O(√N) in the worst case.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), ListError> {
        if index > self.size {
            return Err(ListError::insert_out_of_range(index, self.size));
        }
        self.insert_unchecked(index, value);
        Ok(())
    }

    fn insert_unchecked(&mut self, index: usize, value: T) {
        self.ensure_capacity(self.size + 1);
        let mut slot = index >> self.block_bits;
        let pos = index & self.block_mask();
        let mut carry = self.block_mut(slot).add(pos, value);
        // a full block hands its last element to the front of the next one
        while let Some(value) = carry {
            slot += 1;
            carry = self.block_mut(slot).add_first(value);
        }
        self.size += 1;
        self.mod_count += 1;
    }

    /// Inserts all of the items at position `index`, preserving their order.
    ///
    /// Runs of items that start on a block boundary and span a whole block
    /// are placed as a new block rather than one element at a time.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InsertOutOfRange`] if `index > len`, in which case
    /// nothing is inserted.
    pub fn insert_all<I>(&mut self, index: usize, items: I) -> Result<(), ListError>
    where
        I: IntoIterator<Item = T>,
    {
        if index > self.size {
            return Err(ListError::insert_out_of_range(index, self.size));
        }
        self.insert_all_unchecked(index, items);
        Ok(())
    }

    fn insert_all_unchecked<I>(&mut self, index: usize, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut items = items.into_iter().collect::<Vec<T>>().into_iter();
        // grow once up front, the block size is then fixed for the whole batch
        self.ensure_capacity(self.size + items.len());
        let capacity = self.block_capacity();
        let mut index = index;
        while items.len() > 0 {
            if index & self.block_mask() == 0 && items.len() >= capacity {
                let mut block = Block::new(capacity);
                for value in items.by_ref().take(capacity) {
                    let rejected = block.add_last(value);
                    debug_assert!(rejected.is_none());
                }
                self.insert_block(index >> self.block_bits, block);
                index += capacity;
            } else if let Some(value) = items.next() {
                self.insert_unchecked(index, value);
                index += 1;
            }
        }
    }

    /// Place a full block at `slot`, moving the blocks after it along by one.
    /// An empty block already in that slot is replaced rather than moved.
    fn insert_block(&mut self, slot: usize, block: Block<T>) {
        debug_assert!(block.is_full());
        self.size += block.len();
        self.mod_count += 1;
        if self.blocks[slot].as_ref().is_none_or(Block::is_empty) {
            // nothing follows an empty slot
            self.blocks[slot] = Some(block);
            return;
        }
        // spare capacity guarantees the last slot is unused
        let last = self.blocks.len() - 1;
        assert!(
            self.blocks[last].as_ref().is_none_or(Block::is_empty),
            "no free block slot for insertion"
        );
        self.blocks.pop();
        self.blocks.insert(slot, Some(block));
    }

    /// Appends an element to the back of the list.
    ///
    /// # Time complexity
    ///
    /// Amortized O(1).
    pub fn push(&mut self, value: T) {
        self.insert_unchecked(self.size, value);
    }

    /// Retrieve a reference to the element at the given offset.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.size {
            None
        } else {
            let slot = index >> self.block_bits;
            self.blocks[slot]
                .as_ref()
                .and_then(|block| block.get(index & self.block_mask()))
        }
    }

    /// Returns a mutable reference to an element.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.size {
            None
        } else {
            let slot = index >> self.block_bits;
            let pos = index & self.block_mask();
            self.blocks[slot]
                .as_mut()
                .and_then(|block| block.get_mut(pos))
        }
    }

    /// Replaces the element at `index`, returning the previous element.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::OutOfRange`] if `index >= len`.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn set(&mut self, index: usize, value: T) -> Result<T, ListError> {
        let len = self.size;
        match self.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(ListError::out_of_range(index, len)),
        }
    }

    /// Returns the first element, or `None` if the list is empty.
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the last element, or `None` if the list is empty.
    pub fn last(&self) -> Option<&T> {
        self.size.checked_sub(1).and_then(|index| self.get(index))
    }

    /// Removes an element from position `index` within the list, shifting all
    /// elements after it down by one.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::OutOfRange`] if `index >= len`.
    ///
    /// # Time complexity
    ///
    /// O(√N) in the worst case.
    pub fn remove(&mut self, index: usize) -> Result<T, ListError> {
        if index >= self.size {
            return Err(ListError::out_of_range(index, self.size));
        }
        let mut slot = index >> self.block_bits;
        let pos = index & self.block_mask();
        let removed = self.block_mut(slot).remove(pos);
        // pull the first element of each following block into the gap
        while slot + 1 < self.blocks.len() {
            let Some(value) = self.blocks[slot + 1].as_mut().and_then(Block::remove_first) else {
                break;
            };
            let rejected = self.block_mut(slot).add_last(value);
            debug_assert!(rejected.is_none());
            slot += 1;
        }
        self.size -= 1;
        self.mod_count += 1;
        if slot > 0 && self.blocks[slot].as_ref().is_some_and(Block::is_empty) {
            self.blocks[slot] = None;
            self.compact();
        }
        Ok(removed)
    }

    /// Removes the last element from the list and returns it, or `None` if the
    /// list is empty.
    ///
    /// # Time complexity
    ///
    /// Amortized O(1).
    pub fn pop(&mut self) -> Option<T> {
        if self.size > 0 {
            self.remove(self.size - 1).ok()
        } else {
            None
        }
    }

    /// Removes and returns the last element from a list if the predicate
    /// returns true, or `None` if the predicate returns `false` or the list is
    /// empty (the predicate will not be called in that case).
    pub fn pop_if(&mut self, predicate: impl FnOnce(&mut T) -> bool) -> Option<T> {
        if self.size == 0 {
            None
        } else if let Some(last) = self.get_mut(self.size - 1) {
            if predicate(last) { self.pop() } else { None }
        } else {
            None
        }
    }

    /// Returns an iterator over the list.
    ///
    /// The iterator borrows the list, so the list cannot change while it is in
    /// use. See [`cursor()`](Self::cursor) for iterating across mutations.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            index: 0,
        }
    }

    /// Returns a cursor positioned before the first element.
    ///
    /// The cursor does not borrow the list. Any structural change made other
    /// than through the cursor itself causes its next operation to fail.
    pub fn cursor(&self) -> Cursor {
        Cursor {
            expected_mod_count: self.mod_count,
            next: 0,
            last_returned: None,
        }
    }

    /// Returns a view of this list that is addressed by `i64` positions.
    pub fn huge(&mut self) -> HugeView<'_, Self> {
        HugeView::new(self)
    }

    /// Copies the elements into a single contiguous vector.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::CapacityOverflow`] if the elements would not fit
    /// within one allocation.
    pub fn to_vec(&self) -> Result<Vec<T>, ListError>
    where
        T: Clone,
    {
        check_contiguous::<T>(self.size)?;
        let mut copy = Vec::with_capacity(self.size);
        copy.extend(self.iter().cloned());
        Ok(copy)
    }

    /// Return the number of elements in the list.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Return the number of elements, saturated at `i32::MAX`, for consumers
    /// that count with 32-bit integers. Use [`huge()`](Self::huge) to address
    /// lists longer than that.
    pub fn len_i32(&self) -> i32 {
        i32::try_from(self.size).unwrap_or(i32::MAX)
    }

    /// Returns the total number of elements the list can hold without
    /// reorganizing its blocks.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn capacity(&self) -> usize {
        self.blocks.len().saturating_mul(self.block_capacity())
    }

    /// Returns true if the list has a length of 0.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Clears the list, removing all values and deallocating all blocks.
    ///
    /// # Time complexity
    ///
    /// O(n) if elements are droppable, otherwise O(√N)
    pub fn clear(&mut self) {
        let released = self.blocks.iter().flatten().count();
        self.blocks = empty_slots(MIN_BLOCKS);
        self.block_bits = self.initial_bits;
        self.size = 0;
        self.mod_count += 1;
        tracing::debug!(released, "cleared list");
    }

    fn check_mod_count(&self, expected: u64) -> Result<(), ListError> {
        if self.mod_count == expected {
            Ok(())
        } else {
            Err(ListError::ConcurrentModification {
                expected,
                actual: self.mod_count,
            })
        }
    }
}

/// Fail if `len` elements of `T` cannot be held in one allocation.
fn check_contiguous<T>(len: usize) -> Result<(), ListError> {
    match Layout::array::<T>(len) {
        Ok(_) => Ok(()),
        Err(_) => Err(ListError::CapacityOverflow { len: len as u64 }),
    }
}

fn empty_slots<T>(count: usize) -> Vec<Option<Block<T>>> {
    let mut slots = Vec::with_capacity(count);
    slots.resize_with(count, || None);
    slots
}

impl<T> Default for DynamicList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynamicList<T> {
    /// Duplicates the block structure and clones each element.
    fn clone(&self) -> Self {
        Self {
            block_bits: self.block_bits,
            initial_bits: self.initial_bits,
            size: self.size,
            mod_count: 0,
            blocks: self.blocks.clone(),
        }
    }
}

impl<T> fmt::Display for DynamicList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DynamicList(k: {}, count: {}, blocks: {})",
            self.block_bits,
            self.size,
            self.blocks.len(),
        )
    }
}

impl<T> Index<usize> for DynamicList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        let Some(item) = self.get(index) else {
            panic!("index out of bounds: {}", index);
        };
        item
    }
}

impl<T> IndexMut<usize> for DynamicList<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let Some(item) = self.get_mut(index) else {
            panic!("index out of bounds: {}", index);
        };
        item
    }
}

impl<A> FromIterator<A> for DynamicList<A> {
    fn from_iter<T: IntoIterator<Item = A>>(iter: T) -> Self {
        let mut list: DynamicList<A> = DynamicList::new();
        list.extend(iter);
        list
    }
}

impl<A> Extend<A> for DynamicList<A> {
    fn extend<T: IntoIterator<Item = A>>(&mut self, iter: T) {
        self.insert_all_unchecked(self.size, iter);
    }
}

impl<T> Sequence for DynamicList<T> {
    type Item = T;

    fn len(&self) -> u64 {
        self.size as u64
    }

    fn get(&self, index: u64) -> Option<&T> {
        usize::try_from(index)
            .ok()
            .and_then(|index| DynamicList::get(self, index))
    }

    fn set(&mut self, index: u64, value: T) -> Result<T, ListError> {
        match usize::try_from(index) {
            Ok(index) => DynamicList::set(self, index, value),
            Err(_) => Err(ListError::wide_out_of_range(index, self.size)),
        }
    }

    fn insert(&mut self, index: u64, value: T) -> Result<(), ListError> {
        match usize::try_from(index) {
            Ok(index) => DynamicList::insert(self, index, value),
            Err(_) => Err(ListError::wide_insert_out_of_range(index, self.size)),
        }
    }

    fn remove(&mut self, index: u64) -> Result<T, ListError> {
        match usize::try_from(index) {
            Ok(index) => DynamicList::remove(self, index),
            Err(_) => Err(ListError::wide_out_of_range(index, self.size)),
        }
    }

    fn insert_all<I>(&mut self, index: u64, items: I) -> Result<(), ListError>
    where
        I: IntoIterator<Item = T>,
    {
        match usize::try_from(index) {
            Ok(index) => DynamicList::insert_all(self, index, items),
            Err(_) => Err(ListError::wide_insert_out_of_range(index, self.size)),
        }
    }
}

/// Immutable list iterator.
pub struct Iter<'a, T> {
    list: &'a DynamicList<T>,
    index: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.list.get(self.index);
        if value.is_some() {
            self.index += 1;
        }
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a DynamicList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for DynamicList<T> {
    type Item = T;
    type IntoIter = IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            count: self.size,
            current: None,
            blocks: self.blocks.into_iter(),
        }
    }
}

/// An iterator that moves out of a list.
pub struct IntoIter<T> {
    /// number of remaining elements
    count: usize,
    /// block currently being drained
    current: Option<Block<T>>,
    /// blocks not yet visited
    blocks: std::vec::IntoIter<Option<Block<T>>>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while self.count > 0 {
            if let Some(value) = self.current.as_mut().and_then(Block::remove_first) {
                self.count -= 1;
                return Some(value);
            }
            // absent slots may sit between blocks only if empty, skip them
            self.current = self.blocks.next()?;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.count, Some(self.count))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

/// Fail-fast position within a [`DynamicList`] that does not hold a borrow.
///
/// The cursor records the modification stamp of the list when created. If
/// the list is structurally changed (insert, remove, clear) by anything other
/// than [`Cursor::remove()`], the next call fails with
/// [`ListError::ConcurrentModification`]. Replacing elements with `set` is not
/// a structural change.
#[derive(Debug, Clone)]
pub struct Cursor {
    expected_mod_count: u64,
    /// index of the element returned by the next call to `next()`
    next: usize,
    /// index of the element most recently returned
    last_returned: Option<usize>,
}

impl Cursor {
    /// Returns true if calling `next()` would yield an element.
    pub fn has_next<T>(&self, list: &DynamicList<T>) -> bool {
        self.next < list.len()
    }

    /// Advance to the next element and return it, or `None` at the end.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::ConcurrentModification`] if the list was
    /// structurally changed since the cursor was created.
    pub fn next<'a, T>(&mut self, list: &'a DynamicList<T>) -> Result<Option<&'a T>, ListError> {
        list.check_mod_count(self.expected_mod_count)?;
        let value = list.get(self.next);
        if value.is_some() {
            self.last_returned = Some(self.next);
            self.next += 1;
        }
        Ok(value)
    }

    /// Remove the element most recently returned by `next()`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::ConcurrentModification`] if the list was changed
    /// behind the cursor's back, or [`ListError::NoCurrentElement`] if there
    /// is no element to remove.
    pub fn remove<T>(&mut self, list: &mut DynamicList<T>) -> Result<T, ListError> {
        list.check_mod_count(self.expected_mod_count)?;
        let index = self
            .last_returned
            .take()
            .ok_or(ListError::NoCurrentElement)?;
        let removed = list.remove(index)?;
        self.next = index;
        self.expected_mod_count = list.mod_count;
        Ok(removed)
    }
}
