//! The two halves of a split `RingBuffer`.
//!
//! A `Producer` owns the write cursor and a `Consumer` owns the read cursor.
//! Neither is `Clone`, so a split ring has exactly one of each and the
//! single-producer / single-consumer discipline holds by construction.

use std::fmt;

use crate::counter::Counter;
use crate::error::Error;

use super::raw::RawRing;
use super::trait_impls::Iter;

/// Write half of a split [`RingBuffer`](crate::RingBuffer).
pub struct Producer<'a, T, C: Counter = usize> {
    raw: RawRing<'a, T, C>,
}

/// Read half of a split [`RingBuffer`](crate::RingBuffer).
pub struct Consumer<'a, T, C: Counter = usize> {
    raw: RawRing<'a, T, C>,
}

// Each handle only touches the slots its cursor range grants it and
// publishes the cursor with release ordering, so moving it to another
// thread is sound as long as the items themselves may move.
unsafe impl<'a, T: Send, C: Counter> Send for Producer<'a, T, C> {}
unsafe impl<'a, T: Send, C: Counter> Send for Consumer<'a, T, C> {}

macro_rules! accounting {
    () => {
        /// Number of items the ring can hold.
        #[inline]
        pub fn capacity(&self) -> usize {
            self.raw.cursors().capacity() - 1
        }

        /// Number of items waiting to be read.
        #[inline]
        pub fn item_count(&self) -> usize {
            self.raw.cursors().item_count()
        }

        /// Number of slots that can be written before the ring is full.
        #[inline]
        pub fn free_count(&self) -> usize {
            self.raw.cursors().free_count()
        }

        /// Returns `true` if the ring holds no items.
        #[inline]
        pub fn is_empty(&self) -> bool {
            self.raw.cursors().is_empty()
        }

        /// Returns `true` if the ring has no free slot.
        #[inline]
        pub fn is_full(&self) -> bool {
            self.raw.cursors().is_full()
        }
    };
}

impl<'a, T: Copy, C: Counter> Producer<'a, T, C> {
    pub(super) unsafe fn new(raw: RawRing<'a, T, C>) -> Self {
        Producer { raw }
    }

    accounting!();

    /// Appends one item, or fails with `Full`.
    ///
    /// See [`RingBuffer::put`](crate::RingBuffer::put).
    #[inline]
    pub fn put(&mut self, item: T) -> Result<(), Error> {
        unsafe { self.raw.put(item) }
    }

    /// Appends as many of `items` as fit.
    ///
    /// See [`RingBuffer::put_many`](crate::RingBuffer::put_many).
    #[inline]
    pub fn put_many(&mut self, items: &[T]) -> Result<usize, Error> {
        unsafe { self.raw.put_many(items) }
    }

    /// Commits up to `count` slots written through `block_write`.
    ///
    /// See [`RingBuffer::advance`](crate::RingBuffer::advance).
    #[inline]
    pub fn advance(&mut self, count: usize) -> Result<usize, Error> {
        unsafe { self.raw.advance(count) }
    }

    /// The free slots that sit contiguously from the write cursor.
    ///
    /// The consumer never reads these slots until they are committed with
    /// [`advance`](Producer::advance).
    #[inline]
    pub fn block_write(&mut self) -> &mut [T] {
        unsafe { self.raw.block_write() }
    }

    /// Length of [`block_write`](Producer::block_write).
    ///
    /// The consumer can only grow this value, never shrink it.
    #[inline]
    pub fn block_write_count(&self) -> usize {
        self.raw.cursors().block_write_count()
    }
}

impl<'a, T: Copy, C: Counter> Consumer<'a, T, C> {
    pub(super) unsafe fn new(raw: RawRing<'a, T, C>) -> Self {
        Consumer { raw }
    }

    accounting!();

    /// Removes the oldest item, or fails with `Empty`.
    #[inline]
    pub fn get(&mut self) -> Result<T, Error> {
        unsafe { self.raw.get() }
    }

    /// Removes up to `out.len()` of the oldest items into `out`.
    ///
    /// See [`RingBuffer::get_many`](crate::RingBuffer::get_many).
    #[inline]
    pub fn get_many(&mut self, out: &mut [T]) -> Result<usize, Error> {
        unsafe { self.raw.get_many(out) }
    }

    /// Copies items starting `offset` after the oldest, without removing them.
    ///
    /// See [`RingBuffer::peek`](crate::RingBuffer::peek).
    #[inline]
    pub fn peek(&self, out: &mut [T], offset: usize) -> Result<usize, Error> {
        unsafe { self.raw.peek(out, offset) }
    }

    /// Drops up to `count` of the oldest items without copying them.
    #[inline]
    pub fn skip(&mut self, count: usize) -> Result<usize, Error> {
        unsafe { self.raw.skip(count) }
    }

    /// The readable items that sit contiguously from the oldest one.
    ///
    /// The producer never writes these slots until they are released with
    /// [`skip`](Consumer::skip).
    #[inline]
    pub fn block_read(&self) -> &[T] {
        unsafe { self.raw.block_read() }
    }

    /// Length of [`block_read`](Consumer::block_read).
    #[inline]
    pub fn block_read_count(&self) -> usize {
        self.raw.cursors().block_read_count()
    }

    /// The items published so far, in order, as two slices.
    #[inline]
    pub fn as_slices(&self) -> (&[T], &[T]) {
        unsafe { self.raw.as_slices() }
    }

    /// Oldest-to-newest iterator over the items published so far.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        let (first, second) = self.as_slices();
        Iter::new(first, second)
    }
}

impl<'a, T, C: Counter> fmt::Debug for Producer<'a, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Producer").finish_non_exhaustive()
    }
}

impl<'a, T, C: Counter> fmt::Debug for Consumer<'a, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Consumer").finish_non_exhaustive()
    }
}
