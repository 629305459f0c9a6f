//! The cursor pair and the operations shared by the exclusive `RingBuffer`
//! surface and the split `Producer` / `Consumer` handles.
//!
//! Each side owns one cursor: the producer moves `tail`, the consumer moves
//! `head`. A side loads its own cursor `Relaxed` (nobody else stores it), the
//! other side's cursor `Acquire`, touches only the slots that range grants it,
//! and publishes its cursor last with a `Release` store:
//!
//! ```text
//! producer: write slots, Release-store tail  ->  consumer: Acquire-load tail, read slots
//! consumer: read slots,  Release-store head  ->  producer: Acquire-load head, write slots
//! ```

use std::cmp;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::slice;
use std::sync::atomic::Ordering;

use crate::copy::{read_wrapping, segments, write_wrapping};
use crate::counter::Counter;
use crate::error::Error;
use crate::utils::*;

macro_rules! check_len {
    ($len:expr) => {
        if cfg!(not(feature = "trusted")) && $len == 0 {
            return Err(Error::InvalidArgument);
        }
    };
}

/// Read and write cursors plus the slot count they wrap at.
pub struct Cursors<C: Counter> {
    head: C::Atomic,
    tail: C::Atomic,
    capacity: usize,
}

impl<C: Counter> Cursors<C> {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity >= 2);
        Cursors {
            head: C::atomic(0),
            tail: C::atomic(0),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn head(&self, order: Ordering) -> usize {
        C::load(&self.head, order)
    }

    #[inline]
    pub fn tail(&self, order: Ordering) -> usize {
        C::load(&self.tail, order)
    }

    #[inline]
    fn publish_head(&self, head: usize) {
        debug_assert!(head < self.capacity);
        C::store(&self.head, head, Ordering::Release)
    }

    #[inline]
    fn publish_tail(&self, tail: usize) {
        debug_assert!(tail < self.capacity);
        C::store(&self.tail, tail, Ordering::Release)
    }

    /// Moves both cursors back to slot 0. Requires exclusive access.
    pub fn reset(&mut self) {
        C::store(&self.head, 0, Ordering::Relaxed);
        C::store(&self.tail, 0, Ordering::Relaxed);
    }

    #[cfg(all(test, not(loom)))]
    pub fn place(&mut self, head: usize, tail: usize) {
        C::store(&self.head, head, Ordering::Relaxed);
        C::store(&self.tail, tail, Ordering::Relaxed);
    }

    #[inline]
    pub fn item_count(&self) -> usize {
        count(self.head(Ordering::Acquire), self.tail(Ordering::Acquire), self.capacity)
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        free(self.head(Ordering::Acquire), self.tail(Ordering::Acquire), self.capacity)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head(Ordering::Acquire) == self.tail(Ordering::Acquire)
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        let head = self.head(Ordering::Acquire);
        let tail = self.tail(Ordering::Acquire);
        wrap_add(tail, 1, self.capacity) == head
    }

    #[inline]
    pub fn block_read_count(&self) -> usize {
        contiguous_readable(self.head(Ordering::Relaxed), self.tail(Ordering::Acquire), self.capacity)
    }

    #[inline]
    pub fn block_write_count(&self) -> usize {
        contiguous_writable(self.head(Ordering::Acquire), self.tail(Ordering::Relaxed), self.capacity)
    }
}

/// Cursors paired with a pointer to the first storage slot.
///
/// Every method is `unsafe`: producer-side methods may only be called by the
/// single producer, consumer-side methods only by the single consumer, and
/// `base` must stay valid for `capacity` slots while the view is alive.
pub struct RawRing<'a, T, C: Counter> {
    cursors: &'a Cursors<C>,
    base: NonNull<T>,
    marker: PhantomData<&'a mut [T]>,
}

impl<'a, T: Copy, C: Counter> RawRing<'a, T, C> {
    #[inline]
    pub unsafe fn new(cursors: &'a Cursors<C>, base: *mut T) -> Self {
        RawRing {
            cursors,
            base: NonNull::new_unchecked(base),
            marker: PhantomData,
        }
    }

    #[inline]
    pub fn cursors(&self) -> &'a Cursors<C> {
        self.cursors
    }

    #[inline]
    fn ptr(&self) -> *mut T {
        self.base.as_ptr()
    }

    // producer side

    pub unsafe fn put(&self, item: T) -> Result<(), Error> {
        let cap = self.cursors.capacity;
        let tail = self.cursors.tail(Ordering::Relaxed);
        let head = self.cursors.head(Ordering::Acquire);

        let next = wrap_add(tail, 1, cap);
        if next == head {
            return Err(Error::Full);
        }

        ptr::write(self.ptr().add(tail), item);
        self.cursors.publish_tail(next);
        Ok(())
    }

    pub unsafe fn put_many(&self, items: &[T]) -> Result<usize, Error> {
        check_len!(items.len());

        let cap = self.cursors.capacity;
        let tail = self.cursors.tail(Ordering::Relaxed);
        let head = self.cursors.head(Ordering::Acquire);

        let free_count = free(head, tail, cap);
        if free_count == 0 {
            return Err(Error::Full);
        }

        let len = cmp::min(items.len(), free_count);
        write_wrapping(self.ptr(), cap, tail, &items[..len]);
        self.cursors.publish_tail(wrap_add(tail, len, cap));

        if len < items.len() {
            Err(Error::InsufficientItems(len))
        } else {
            Ok(len)
        }
    }

    pub unsafe fn advance(&self, advance_count: usize) -> Result<usize, Error> {
        check_len!(advance_count);

        let cap = self.cursors.capacity;
        let tail = self.cursors.tail(Ordering::Relaxed);
        let head = self.cursors.head(Ordering::Acquire);

        let free_count = free(head, tail, cap);
        if free_count == 0 {
            return Err(Error::Full);
        }

        // the cursor never moves further than the free space
        let advanced = cmp::min(advance_count, free_count);
        self.cursors.publish_tail(wrap_add(tail, advanced, cap));

        if advanced < advance_count {
            Err(Error::InsufficientItems(advanced))
        } else {
            Ok(advanced)
        }
    }

    #[allow(clippy::mut_from_ref)]
    pub unsafe fn block_write(&self) -> &mut [T] {
        let tail = self.cursors.tail(Ordering::Relaxed);
        let len = self.cursors.block_write_count();
        slice::from_raw_parts_mut(self.ptr().add(tail), len)
    }

    // consumer side

    pub unsafe fn get(&self) -> Result<T, Error> {
        let cap = self.cursors.capacity;
        let head = self.cursors.head(Ordering::Relaxed);
        let tail = self.cursors.tail(Ordering::Acquire);

        if head == tail {
            return Err(Error::Empty);
        }

        let item = ptr::read(self.ptr().add(head));
        self.cursors.publish_head(wrap_add(head, 1, cap));
        Ok(item)
    }

    pub unsafe fn get_many(&self, out: &mut [T]) -> Result<usize, Error> {
        check_len!(out.len());

        let cap = self.cursors.capacity;
        let head = self.cursors.head(Ordering::Relaxed);
        let tail = self.cursors.tail(Ordering::Acquire);

        let available = count(head, tail, cap);
        if available == 0 {
            return Err(Error::Empty);
        }

        let len = cmp::min(out.len(), available);
        read_wrapping(self.ptr(), cap, head, &mut out[..len]);
        self.cursors.publish_head(wrap_add(head, len, cap));

        if len < out.len() {
            Err(Error::InsufficientItems(len))
        } else {
            Ok(len)
        }
    }

    pub unsafe fn peek(&self, out: &mut [T], offset: usize) -> Result<usize, Error> {
        check_len!(out.len());

        let cap = self.cursors.capacity;
        let head = self.cursors.head(Ordering::Relaxed);
        let tail = self.cursors.tail(Ordering::Acquire);

        if head == tail {
            return Err(Error::Empty);
        }

        let available = count(head, tail, cap);
        if offset >= available {
            return Err(Error::InsufficientItems(0));
        }

        let len = cmp::min(available - offset, out.len());
        read_wrapping(self.ptr(), cap, wrap_add(head, offset, cap), &mut out[..len]);

        if len < out.len() {
            Err(Error::InsufficientItems(len))
        } else {
            Ok(len)
        }
    }

    pub unsafe fn skip(&self, skip_count: usize) -> Result<usize, Error> {
        check_len!(skip_count);

        let cap = self.cursors.capacity;
        let head = self.cursors.head(Ordering::Relaxed);
        let tail = self.cursors.tail(Ordering::Acquire);

        let available = count(head, tail, cap);
        if available == 0 {
            return Err(Error::Empty);
        }

        let skipped = cmp::min(skip_count, available);
        self.cursors.publish_head(wrap_add(head, skipped, cap));

        if skipped < skip_count {
            Err(Error::InsufficientItems(skipped))
        } else {
            Ok(skipped)
        }
    }

    pub unsafe fn block_read(&self) -> &'a [T] {
        let head = self.cursors.head(Ordering::Relaxed);
        let len = self.cursors.block_read_count();
        slice::from_raw_parts(self.ptr().add(head), len)
    }

    pub unsafe fn as_slices(&self) -> (&'a [T], &'a [T]) {
        let cap = self.cursors.capacity;
        let head = self.cursors.head(Ordering::Relaxed);
        let tail = self.cursors.tail(Ordering::Acquire);

        let (first, second) = segments(head, count(head, tail, cap), cap);
        (
            slice::from_raw_parts(self.ptr().add(head), first),
            slice::from_raw_parts(self.ptr(), second),
        )
    }
}
