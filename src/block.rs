//
// Copyright (c) 2025 Nathan Fiedler
//

//! Fixed-capacity circular buffer used as the storage unit of the list.
//!
//! A block holds up to `2^k` elements. Pushing and popping at either end is
//! constant time, while inserting or removing in the interior shifts whichever
//! side of the position is shorter. When a full block is pushed into, the
//! element that falls off the far end is handed back to the caller so that it
//! can be carried into the neighboring block.

use std::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::ptr::NonNull;

/// Circular buffer with a power-of-two capacity.
pub struct Block<T> {
    /// allocated buffer of size `capacity`
    buffer: NonNull<T>,
    /// number of slots allocated in the buffer, always a power of two
    capacity: usize,
    /// physical slot of the first live element
    offset: usize,
    /// number of live elements
    size: usize,
}

impl<T> Block<T> {
    /// Construct an empty block with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of two of at least 2.
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity >= 2 && capacity.is_power_of_two(),
            "block capacity (is {capacity}) should be a power of two >= 2"
        );
        let layout = Layout::array::<T>(capacity).expect("unexpected overflow");
        let buffer = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            let ptr = unsafe { alloc(layout).cast::<T>() };
            match NonNull::new(ptr) {
                Some(ptr) => ptr,
                None => handle_alloc_error(layout),
            }
        };
        Self {
            buffer,
            capacity,
            offset: 0,
            size: 0,
        }
    }

    /// Merge two blocks into a new block of `capacity`, the elements of `a`
    /// followed by those of `b`.
    ///
    /// Either input may be absent. Both inputs, when present, must have a
    /// capacity of exactly half of `capacity`.
    pub fn merge(capacity: usize, a: Option<Block<T>>, b: Option<Block<T>>) -> Self {
        let mut merged = Block::new(capacity);
        for mut other in [a, b].into_iter().flatten() {
            assert_eq!(
                other.capacity * 2,
                capacity,
                "merged blocks must be half the new capacity"
            );
            let count = other.size;
            other.transfer_front(&mut merged, count);
        }
        merged
    }

    /// Split a block into two blocks of half the capacity, the first half of
    /// the elements going to the left block and the remainder to the right.
    ///
    /// Returns two absent blocks if the source is absent or empty, and an
    /// absent right block if all elements fit within the left block.
    pub fn split(block: Option<Block<T>>) -> (Option<Block<T>>, Option<Block<T>>) {
        let Some(mut source) = block else {
            return (None, None);
        };
        if source.is_empty() {
            return (None, None);
        }
        let half = source.capacity / 2;
        assert!(half >= 2, "block of capacity 2 cannot be split");
        let mut left: Block<T> = Block::new(half);
        let count = source.size.min(half);
        source.transfer_front(&mut left, count);
        if source.is_empty() {
            return (Some(left), None);
        }
        let mut right: Block<T> = Block::new(half);
        let count = source.size;
        source.transfer_front(&mut right, count);
        (Some(left), Some(right))
    }

    /// Move `count` elements from the front of this block onto the end of
    /// `dst`, which must be linear (offset zero) and have enough room.
    fn transfer_front(&mut self, dst: &mut Block<T>, count: usize) {
        debug_assert!(count <= self.size);
        debug_assert!(dst.offset == 0 && dst.size + count <= dst.capacity);
        let mut remaining = count;
        while remaining > 0 {
            // at most two runs: up to the physical end, then from slot zero
            let run = remaining.min(self.capacity - self.offset);
            unsafe {
                let src = self.buffer.as_ptr().add(self.offset);
                let dest = dst.buffer.as_ptr().add(dst.size);
                std::ptr::copy_nonoverlapping(src, dest, run);
            }
            dst.size += run;
            self.offset = (self.offset + run) & self.mask();
            self.size -= run;
            remaining -= run;
        }
    }

    /// Appends an element to the back of the block.
    ///
    /// Returns the value back to the caller if the block is already full.
    pub fn add_last(&mut self, value: T) -> Option<T> {
        if self.is_full() {
            return Some(value);
        }
        let slot = self.slot(self.size);
        unsafe { self.write(slot, value) }
        self.size += 1;
        None
    }

    /// Prepends an element to the front of the block.
    ///
    /// If the block was full, the last element is evicted and returned.
    pub fn add_first(&mut self, value: T) -> Option<T> {
        // when full, the slot before the head is the slot of the last element
        let evicted = if self.is_full() {
            self.remove_last()
        } else {
            None
        };
        self.offset = self.slot(self.capacity - 1);
        unsafe { self.write(self.offset, value) }
        self.size += 1;
        evicted
    }

    /// Inserts an element at position `pos`, shifting either the elements
    /// before it to the left or the elements after it to the right, whichever
    /// is fewer.
    ///
    /// If the block was full, the element pushed off the end is returned,
    /// which is `value` itself when `pos` equals the capacity.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is greater than the length.
    pub fn add(&mut self, pos: usize, value: T) -> Option<T> {
        let len = self.size;
        if pos > len {
            panic!("insertion index (is {pos}) should be <= len (is {len})");
        }
        if self.is_full() && pos == len {
            return Some(value);
        }
        let evicted = if self.is_full() {
            self.remove_last()
        } else {
            None
        };
        if pos < self.size / 2 {
            // slide [0, pos) one slot to the left
            self.offset = self.slot(self.capacity - 1);
            for i in 0..pos {
                unsafe { self.shift(i + 1, i) }
            }
        } else {
            // slide [pos, size) one slot to the right
            for i in (pos..self.size).rev() {
                unsafe { self.shift(i, i + 1) }
            }
        }
        let slot = self.slot(pos);
        unsafe { self.write(slot, value) }
        self.size += 1;
        evicted
    }

    /// Removes and returns the element at position `pos`, closing the gap
    /// from whichever side is shorter.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not less than the length.
    pub fn remove(&mut self, pos: usize) -> T {
        let len = self.size;
        if pos >= len {
            panic!("removal index (is {pos}) should be < len (is {len})");
        }
        let removed = unsafe { self.read(self.slot(pos)) };
        if pos < len / 2 {
            // slide [0, pos) one slot to the right
            for i in (0..pos).rev() {
                unsafe { self.shift(i, i + 1) }
            }
            self.offset = self.slot(1);
        } else {
            // slide (pos, size) one slot to the left
            for i in (pos + 1)..len {
                unsafe { self.shift(i, i - 1) }
            }
        }
        self.size -= 1;
        removed
    }

    /// Removes the first element and returns it, or `None` if empty.
    pub fn remove_first(&mut self) -> Option<T> {
        if self.size == 0 {
            return None;
        }
        let value = unsafe { self.read(self.offset) };
        self.offset = self.slot(1);
        self.size -= 1;
        Some(value)
    }

    /// Removes the last element and returns it, or `None` if empty.
    pub fn remove_last(&mut self) -> Option<T> {
        if self.size == 0 {
            return None;
        }
        self.size -= 1;
        let slot = self.slot(self.size);
        Some(unsafe { self.read(slot) })
    }

    /// Provides a reference to the element at the given position.
    pub fn get(&self, pos: usize) -> Option<&T> {
        if pos < self.size {
            unsafe { Some(&*self.buffer.as_ptr().add(self.slot(pos))) }
        } else {
            None
        }
    }

    /// Returns a mutable reference to an element.
    pub fn get_mut(&mut self, pos: usize) -> Option<&mut T> {
        if pos < self.size {
            let slot = self.slot(pos);
            unsafe { Some(&mut *self.buffer.as_ptr().add(slot)) }
        } else {
            None
        }
    }

    /// Replaces the element at `pos`, returning the previous value.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not less than the length.
    pub fn set(&mut self, pos: usize, value: T) -> T {
        match self.get_mut(pos) {
            Some(slot) => std::mem::replace(slot, value),
            None => panic!("index out of bounds: {pos}"),
        }
    }

    /// Clears the block, removing and dropping all values.
    pub fn clear(&mut self) {
        use std::ptr::{drop_in_place, slice_from_raw_parts_mut};

        let len = self.size;
        // forget the elements first so a panicking drop cannot double free
        self.size = 0;
        if len > 0 && std::mem::needs_drop::<T>() {
            let first = len.min(self.capacity - self.offset);
            unsafe {
                drop_in_place(slice_from_raw_parts_mut(
                    self.buffer.as_ptr().add(self.offset),
                    first,
                ));
                drop_in_place(slice_from_raw_parts_mut(self.buffer.as_ptr(), len - first));
            }
        }
        self.offset = 0;
    }

    /// Return the number of elements in the block.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns the total number of elements the block can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true if the block has a length of 0.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns true if the block has a length equal to its capacity.
    pub fn is_full(&self) -> bool {
        self.size == self.capacity
    }

    #[inline]
    fn mask(&self) -> usize {
        self.capacity - 1
    }

    /// Physical slot of the logical position `pos` relative to the head.
    #[inline]
    fn slot(&self, pos: usize) -> usize {
        (self.offset + pos) & self.mask()
    }

    /// Move the element at logical position `from` to logical position `to`.
    unsafe fn shift(&mut self, from: usize, to: usize) {
        let src = self.slot(from);
        let dst = self.slot(to);
        unsafe {
            std::ptr::copy_nonoverlapping(
                self.buffer.as_ptr().add(src),
                self.buffer.as_ptr().add(dst),
                1,
            );
        }
    }

    unsafe fn read(&self, slot: usize) -> T {
        unsafe { std::ptr::read(self.buffer.as_ptr().add(slot)) }
    }

    unsafe fn write(&mut self, slot: usize, value: T) {
        unsafe { std::ptr::write(self.buffer.as_ptr().add(slot), value) }
    }
}

impl<T: Clone> Clone for Block<T> {
    /// Clones the elements into a new block whose contents start at slot zero.
    fn clone(&self) -> Self {
        let mut copy = Block::new(self.capacity);
        for pos in 0..self.size {
            if let Some(value) = self.get(pos) {
                copy.add_last(value.clone());
            }
        }
        copy
    }
}

impl<T> fmt::Display for Block<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block(capacity: {}, offset: {}, size: {})",
            self.capacity, self.offset, self.size,
        )
    }
}

impl<T> Index<usize> for Block<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        let Some(item) = self.get(index) else {
            panic!("index out of bounds: {}", index);
        };
        item
    }
}

impl<T> IndexMut<usize> for Block<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let Some(item) = self.get_mut(index) else {
            panic!("index out of bounds: {}", index);
        };
        item
    }
}

impl<T> Drop for Block<T> {
    fn drop(&mut self) {
        self.clear();
        let layout = Layout::array::<T>(self.capacity).expect("unexpected overflow");
        if layout.size() != 0 {
            unsafe { dealloc(self.buffer.as_ptr().cast::<u8>(), layout) }
        }
    }
}
