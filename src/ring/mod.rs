use std::sync::atomic::Ordering;

use crate::counter::Counter;
use crate::error::Error;
use crate::storage::Storage;

use self::raw::{Cursors, RawRing};

mod handles;
mod raw;
mod trait_impls;

pub use self::handles::{Consumer, Producer};
pub use self::trait_impls::Iter;

/// A fixed capacity ring buffer over caller-supplied storage.
///
/// The ring keeps two cursors into `storage`: `head`, the oldest unread
/// item, and `tail`, the next slot to write. Items are `Copy` and move in and
/// out by value; the ring never allocates.
///
/// Used directly, every mutating call takes `&mut self`. For a producer and a
/// consumer running concurrently, [`split`](RingBuffer::split) the ring into a
/// [`Producer`] and a [`Consumer`]; each side then moves only its own cursor
/// and the pair needs no lock.
///
/// `C` is the cursor width, see [`Counter`].
///
/// # Capacity
///
/// Note that the `capacity()` is always `storage.len() - 1`: one slot stays
/// free so that a full ring and an empty ring have different cursors.
pub struct RingBuffer<S: Storage, C: Counter = usize> {
    storage: S,
    cursors: Cursors<C>,
}

impl<S: Storage> RingBuffer<S>
where
    S::Item: Copy,
{
    /// Creates an empty ring over `storage`, with `usize` cursors.
    ///
    /// Fails with `InvalidArgument` if `storage` has fewer than two slots.
    /// The current contents of `storage` are left as they are.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::{Error, RingBuffer};
    ///
    /// let ring = RingBuffer::new([0u8; 16]).unwrap();
    /// assert_eq!(ring.capacity(), 15);
    ///
    /// let mut backing = [0u32; 1];
    /// assert_eq!(RingBuffer::new(&mut backing[..]).unwrap_err(), Error::InvalidArgument);
    /// ```
    #[inline]
    pub fn new(storage: S) -> Result<Self, Error> {
        RingBuffer::with_counter(storage)
    }
}

impl<S: Storage, C: Counter> RingBuffer<S, C>
where
    S::Item: Copy,
{
    /// Creates an empty ring over `storage` with cursors of width `C`.
    ///
    /// Fails with `InvalidArgument` if `storage` has fewer than two slots or
    /// more slots than `C` can index.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::{Error, RingBuffer};
    ///
    /// let ring = RingBuffer::<_, u8>::with_counter([0u16; 256]).unwrap();
    /// assert_eq!(ring.capacity(), 255);
    ///
    /// let err = RingBuffer::<_, u8>::with_counter([0u16; 257]).unwrap_err();
    /// assert_eq!(err, Error::InvalidArgument);
    /// ```
    pub fn with_counter(storage: S) -> Result<Self, Error> {
        let len = Storage::len(&storage);
        if len < 2 || len - 1 > C::MAX {
            return Err(Error::InvalidArgument);
        }
        Ok(RingBuffer {
            storage,
            cursors: Cursors::new(len),
        })
    }

    #[inline]
    fn raw(&mut self) -> RawRing<'_, S::Item, C> {
        let base = self.storage.as_mut_slice().as_mut_ptr();
        unsafe { RawRing::new(&self.cursors, base) }
    }

    /// View for consumer-side reads that never write to storage.
    #[inline]
    fn raw_shared(&self) -> RawRing<'_, S::Item, C> {
        let base = self.storage.as_slice().as_ptr() as *mut S::Item;
        unsafe { RawRing::new(&self.cursors, base) }
    }

    /// Empties the ring by moving both cursors back to the first slot.
    /// Storage contents are not cleared.
    pub fn reset(&mut self) {
        self.cursors.reset();
    }

    /// Releases the storage.
    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Number of items the ring can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cursors.capacity() - 1
    }

    /// Number of slots in the storage, one more than `capacity()`.
    #[inline]
    pub fn storage_len(&self) -> usize {
        self.cursors.capacity()
    }

    /// Number of items waiting to be read.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.cursors.item_count()
    }

    /// Number of slots that can be written before the ring is full.
    #[inline]
    pub fn free_count(&self) -> usize {
        self.cursors.free_count()
    }

    /// Returns `true` if the ring holds no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    /// Returns `true` if the ring holds `capacity()` items.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.cursors.is_full()
    }

    /// Appends one item, or fails with `Full`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::{Error, RingBuffer};
    ///
    /// let mut ring = RingBuffer::new([0i32; 3]).unwrap();
    /// assert_eq!(ring.put(1), Ok(()));
    /// assert_eq!(ring.put(2), Ok(()));
    /// assert_eq!(ring.put(3), Err(Error::Full));
    /// ```
    #[inline]
    pub fn put(&mut self, item: S::Item) -> Result<(), Error> {
        unsafe { self.raw().put(item) }
    }

    /// Removes the oldest item, or fails with `Empty`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::{Error, RingBuffer};
    ///
    /// let mut ring = RingBuffer::new([0i32; 3]).unwrap();
    /// ring.put(7).unwrap();
    /// assert_eq!(ring.get(), Ok(7));
    /// assert_eq!(ring.get(), Err(Error::Empty));
    /// ```
    #[inline]
    pub fn get(&mut self) -> Result<S::Item, Error> {
        unsafe { self.raw().get() }
    }

    /// Appends as many of `items` as fit, in order.
    ///
    /// Returns the number written. If only some fit they are still written
    /// and the call fails with `InsufficientItems(written)`; if none fit it
    /// fails with `Full`. An empty `items` is `InvalidArgument`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::{Error, RingBuffer};
    ///
    /// let mut ring = RingBuffer::new([0u8; 10]).unwrap();
    /// assert_eq!(ring.put_many(b"abcdef"), Ok(6));
    /// assert_eq!(ring.put_many(b"ghijk"), Err(Error::InsufficientItems(3)));
    /// assert!(ring.is_full());
    /// assert_eq!(ring.put_many(b"l"), Err(Error::Full));
    /// ```
    #[inline]
    pub fn put_many(&mut self, items: &[S::Item]) -> Result<usize, Error> {
        unsafe { self.raw().put_many(items) }
    }

    /// Removes up to `out.len()` of the oldest items into `out`.
    ///
    /// Returns the number read. Reading fewer than `out.len()` fails with
    /// `InsufficientItems(read)` after committing the read; reading none
    /// fails with `Empty`. An empty `out` is `InvalidArgument`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::{Error, RingBuffer};
    ///
    /// let mut ring = RingBuffer::new([0u8; 10]).unwrap();
    /// ring.put_many(b"abc").unwrap();
    ///
    /// let mut out = [0u8; 4];
    /// assert_eq!(ring.get_many(&mut out), Err(Error::InsufficientItems(3)));
    /// assert_eq!(&out[..3], b"abc");
    /// assert_eq!(ring.get_many(&mut out), Err(Error::Empty));
    /// ```
    #[inline]
    pub fn get_many(&mut self, out: &mut [S::Item]) -> Result<usize, Error> {
        unsafe { self.raw().get_many(out) }
    }

    /// Copies up to `out.len()` items, starting `offset` items after the
    /// oldest, without removing anything.
    ///
    /// Fails with `Empty` on an empty ring, with `InsufficientItems(0)` if
    /// `offset` is not below `item_count()`, and with
    /// `InsufficientItems(copied)` if fewer than `out.len()` items follow
    /// `offset`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::RingBuffer;
    ///
    /// let mut ring = RingBuffer::new([0u8; 8]).unwrap();
    /// ring.put_many(b"hello").unwrap();
    ///
    /// let mut out = [0u8; 3];
    /// assert_eq!(ring.peek(&mut out, 1), Ok(3));
    /// assert_eq!(&out, b"ell");
    /// assert_eq!(ring.item_count(), 5);
    /// ```
    #[inline]
    pub fn peek(&self, out: &mut [S::Item], offset: usize) -> Result<usize, Error> {
        unsafe { self.raw_shared().peek(out, offset) }
    }

    /// Drops up to `count` of the oldest items without copying them.
    ///
    /// Fails with `Empty` if there was nothing to drop, and with
    /// `InsufficientItems(dropped)` if fewer than `count` were there.
    #[inline]
    pub fn skip(&mut self, count: usize) -> Result<usize, Error> {
        unsafe { self.raw().skip(count) }
    }

    /// Commits up to `count` slots written through
    /// [`block_write`](RingBuffer::block_write) as items.
    ///
    /// The write cursor never moves past the free space: fails with `Full`
    /// if there was none, and with `InsufficientItems(committed)` if there
    /// were fewer than `count` free slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::RingBuffer;
    ///
    /// let mut ring = RingBuffer::new([0u8; 8]).unwrap();
    /// let block = ring.block_write();
    /// block[..3].copy_from_slice(b"dma");
    /// assert_eq!(ring.advance(3), Ok(3));
    /// assert_eq!(ring.block_read(), b"dma");
    /// ```
    #[inline]
    pub fn advance(&mut self, count: usize) -> Result<usize, Error> {
        unsafe { self.raw().advance(count) }
    }

    /// The readable items that sit contiguously from the oldest one.
    ///
    /// When the items wrap past the end of the storage this is only the part
    /// before the end; after a [`skip`](RingBuffer::skip) of its length the
    /// next call returns the rest.
    #[inline]
    pub fn block_read(&self) -> &[S::Item] {
        unsafe { self.raw_shared().block_read() }
    }

    /// Length of [`block_read`](RingBuffer::block_read).
    #[inline]
    pub fn block_read_count(&self) -> usize {
        self.cursors.block_read_count()
    }

    /// The free slots that sit contiguously from the write cursor.
    ///
    /// Data written here becomes readable after [`advance`](RingBuffer::advance).
    #[inline]
    pub fn block_write(&mut self) -> &mut [S::Item] {
        let tail = self.cursors.tail(Ordering::Relaxed);
        let len = self.cursors.block_write_count();
        &mut self.storage.as_mut_slice()[tail..tail + len]
    }

    /// Length of [`block_write`](RingBuffer::block_write).
    #[inline]
    pub fn block_write_count(&self) -> usize {
        self.cursors.block_write_count()
    }

    /// Returns a pair of slices which contain, in order, the items of the
    /// ring.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::RingBuffer;
    ///
    /// let mut ring = RingBuffer::new([0u8; 5]).unwrap();
    /// ring.put_many(b"abc").unwrap();
    /// ring.skip(2).unwrap();
    /// ring.put_many(b"def").unwrap();
    ///
    /// assert_eq!(ring.as_slices(), (&b"cde"[..], &b"f"[..]));
    /// ```
    #[inline]
    pub fn as_slices(&self) -> (&[S::Item], &[S::Item]) {
        unsafe { self.raw_shared().as_slices() }
    }

    /// Returns an oldest-to-newest iterator over the items.
    #[inline]
    pub fn iter(&self) -> Iter<'_, S::Item> {
        let (first, second) = self.as_slices();
        Iter::new(first, second)
    }

    /// Splits the ring into a producer and a consumer that can run on
    /// different threads without a lock.
    ///
    /// The ring stays borrowed until both handles are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::thread;
    /// use arrayring::RingBuffer;
    ///
    /// let mut ring = RingBuffer::new([0u32; 16]).unwrap();
    /// let (mut producer, mut consumer) = ring.split();
    ///
    /// thread::scope(|s| {
    ///     s.spawn(move || {
    ///         for i in 0..100 {
    ///             while producer.put(i).is_err() {
    ///                 thread::yield_now();
    ///             }
    ///         }
    ///     });
    ///
    ///     let mut expected = 0;
    ///     while expected < 100 {
    ///         if let Ok(item) = consumer.get() {
    ///             assert_eq!(item, expected);
    ///             expected += 1;
    ///         }
    ///     }
    /// });
    /// ```
    pub fn split(&mut self) -> (Producer<'_, S::Item, C>, Consumer<'_, S::Item, C>) {
        let base = self.storage.as_mut_slice().as_mut_ptr();
        let cursors = &self.cursors;
        unsafe {
            (
                Producer::new(RawRing::new(cursors, base)),
                Consumer::new(RawRing::new(cursors, base)),
            )
        }
    }

    #[cfg(all(test, not(loom)))]
    fn cursor_positions(&self) -> (usize, usize) {
        (
            self.cursors.head(Ordering::Acquire),
            self.cursors.tail(Ordering::Acquire),
        )
    }

    #[cfg(all(test, not(loom)))]
    fn place_cursors(&mut self, head: usize, tail: usize) {
        assert!(head < self.storage_len() && tail < self.storage_len());
        self.cursors.place(head, tail);
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use std::vec::Vec;

    fn letters() -> [u8; 10] {
        *b"abcdefghij"
    }

    #[test]
    fn new_rejects_short_storage() {
        assert_eq!(RingBuffer::new([0u8; 0]).unwrap_err(), Error::InvalidArgument);
        assert_eq!(RingBuffer::new([0u8; 1]).unwrap_err(), Error::InvalidArgument);
        let ring = RingBuffer::new([0u8; 2]).unwrap();
        assert_eq!(ring.capacity(), 1);
        assert!(ring.is_empty());
    }

    #[test]
    fn new_rejects_storage_wider_than_counter() {
        assert!(RingBuffer::<_, u8>::with_counter([0u8; 256]).is_ok());
        assert_eq!(
            RingBuffer::<_, u8>::with_counter([0u8; 300]).unwrap_err(),
            Error::InvalidArgument
        );
    }

    #[test]
    fn reset_and_release() {
        let mut backing = [0u8; 4];
        let mut ring = RingBuffer::new(&mut backing[..]).unwrap();
        ring.put_many(b"xyz").unwrap();
        assert!(ring.is_full());
        ring.reset();
        assert_eq!(ring.cursor_positions(), (0, 0));
        assert!(ring.is_empty());
        let storage = ring.into_inner();
        // contents stay where they were written
        assert_eq!(&storage[..], b"xyz\0");
    }

    #[test]
    fn accounting_over_every_cursor_pair() {
        let mut ring = RingBuffer::new([0u8; 10]).unwrap();
        for head in 0..10 {
            for tail in 0..10 {
                ring.place_cursors(head, tail);
                let used = (tail + 10 - head) % 10;
                assert_eq!(ring.item_count(), used);
                assert_eq!(ring.free_count(), 9 - used);
                assert_eq!(ring.is_empty(), used == 0);
                assert_eq!(ring.is_full(), used == 9);
                assert!(!(ring.is_empty() && ring.is_full()));
            }
        }
    }

    #[test]
    fn put_until_full_from_every_start() {
        let mut ring = RingBuffer::new([0u8; 10]).unwrap();
        for start in 0..10 {
            ring.place_cursors(start, start);
            for k in 0..9 {
                assert_eq!(ring.put(k as u8), Ok(()));
                assert_eq!(ring.cursor_positions(), (start, (start + k + 1) % 10));
            }
            assert_eq!(ring.put(99), Err(Error::Full));
            assert_eq!(ring.cursor_positions(), (start, (start + 9) % 10));
        }
    }

    #[test]
    fn get_drains_in_order_from_every_start() {
        let mut ring = RingBuffer::new([0u8; 10]).unwrap();
        for start in 0..10 {
            ring.place_cursors(start, start);
            ring.put_many(&letters()[..9]).unwrap();
            for k in 0..9 {
                assert_eq!(ring.get(), Ok(letters()[k]));
            }
            assert_eq!(ring.get(), Err(Error::Empty));
            assert_eq!(ring.cursor_positions(), ((start + 9) % 10, (start + 9) % 10));
        }
    }

    #[test]
    fn put_many_splits_across_the_end() {
        let mut ring = RingBuffer::new([0u8; 10]).unwrap();
        ring.place_cursors(7, 7);
        assert_eq!(ring.put_many(b"abcdef"), Ok(6));
        assert_eq!(ring.cursor_positions(), (7, 3));
        assert_eq!(ring.as_slices(), (&b"abc"[..], &b"def"[..]));

        let storage = ring.into_inner();
        assert_eq!(&storage[7..], b"abc");
        assert_eq!(&storage[..3], b"def");
    }

    #[test]
    fn put_many_partial_fills_the_ring() {
        let mut ring = RingBuffer::new([0u8; 10]).unwrap();
        ring.put_many(b"123456").unwrap();
        assert_eq!(ring.free_count(), 3);

        assert_eq!(ring.put_many(b"abcde"), Err(Error::InsufficientItems(3)));
        assert!(ring.is_full());
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), b"123456abc");
        assert_eq!(ring.put_many(b"z"), Err(Error::Full));
    }

    #[test]
    fn get_many_splits_across_the_end() {
        let mut ring = RingBuffer::new([0u8; 10]).unwrap();
        ring.place_cursors(8, 8);
        ring.put_many(b"abcde").unwrap();

        let mut out = [0u8; 5];
        assert_eq!(ring.get_many(&mut out), Ok(5));
        assert_eq!(&out, b"abcde");
        assert_eq!(ring.cursor_positions(), (3, 3));
    }

    #[test]
    fn get_many_wraps_head_to_zero() {
        let mut ring = RingBuffer::new([0u8; 6]).unwrap();
        ring.place_cursors(3, 3);
        ring.put_many(b"abc").unwrap();
        assert_eq!(ring.cursor_positions(), (3, 0));

        let mut out = [0u8; 3];
        assert_eq!(ring.get_many(&mut out), Ok(3));
        assert_eq!(ring.cursor_positions(), (0, 0));
    }

    #[cfg(not(feature = "trusted"))]
    #[test]
    fn zero_length_requests_are_invalid() {
        let mut ring = RingBuffer::new([0u8; 4]).unwrap();
        ring.put(1).unwrap();
        let mut out = [0u8; 0];
        assert_eq!(ring.put_many(&[]), Err(Error::InvalidArgument));
        assert_eq!(ring.get_many(&mut out), Err(Error::InvalidArgument));
        assert_eq!(ring.peek(&mut out, 0), Err(Error::InvalidArgument));
        assert_eq!(ring.skip(0), Err(Error::InvalidArgument));
        assert_eq!(ring.advance(0), Err(Error::InvalidArgument));
        assert_eq!(ring.item_count(), 1);
    }

    #[test]
    fn peek_with_offset() {
        let mut ring = RingBuffer::new([0u8; 10]).unwrap();
        let mut out = [0u8; 4];
        assert_eq!(ring.peek(&mut out, 0), Err(Error::Empty));

        ring.place_cursors(6, 6);
        ring.put_many(b"abcdefg").unwrap();

        assert_eq!(ring.peek(&mut out, 2), Ok(4));
        assert_eq!(&out, b"cdef");
        assert_eq!(ring.peek(&mut out, 5), Err(Error::InsufficientItems(2)));
        assert_eq!(&out[..2], b"fg");
        assert_eq!(ring.peek(&mut out, 7), Err(Error::InsufficientItems(0)));
        assert_eq!(ring.cursor_positions(), (6, 3));
    }

    #[test]
    fn skip_moves_head_only() {
        let mut ring = RingBuffer::new([0u8; 5]).unwrap();
        assert_eq!(ring.skip(1), Err(Error::Empty));

        ring.place_cursors(3, 3);
        ring.put_many(b"abc").unwrap();
        assert_eq!(ring.skip(2), Ok(2));
        assert_eq!(ring.cursor_positions(), (0, 1));
        assert_eq!(ring.skip(5), Err(Error::InsufficientItems(1)));
        assert!(ring.is_empty());
    }

    #[test]
    fn advance_is_clamped_to_free_space() {
        let mut ring = RingBuffer::new([0u8; 5]).unwrap();
        ring.place_cursors(2, 4);
        assert_eq!(ring.free_count(), 2);

        assert_eq!(ring.advance(4), Err(Error::InsufficientItems(2)));
        assert_eq!(ring.cursor_positions(), (2, 1));
        assert!(ring.is_full());
        assert_eq!(ring.advance(1), Err(Error::Full));
        assert_eq!(ring.cursor_positions(), (2, 1));
    }

    #[test]
    fn block_counts_over_every_cursor_pair() {
        let mut ring = RingBuffer::new([0u8; 7]).unwrap();
        for head in 0..7 {
            for tail in 0..7 {
                ring.place_cursors(head, tail);
                let read = ring.block_read_count();
                let write = ring.block_write_count();
                assert_eq!(ring.block_read().len(), read);
                assert_eq!(ring.block_write().len(), write);
                assert!(read <= ring.item_count());
                assert!(write <= ring.free_count());
                if ring.item_count() > 0 {
                    assert!(read > 0);
                }
                if ring.free_count() > 0 {
                    assert!(write > 0);
                }
            }
        }
    }

    fn readable_views<S: Storage<Item = u8>>(ring: &RingBuffer<S>) -> (&[u8], &[u8], &[u8]) {
        let block = ring.block_read();
        let (first, second) = ring.as_slices();
        (block, first, second)
    }

    #[test]
    fn read_views_borrow_the_ring() {
        let mut ring = RingBuffer::new([0u8; 6]).unwrap();
        ring.place_cursors(4, 4);
        ring.put_many(b"wxyz").unwrap();

        let (block, first, second) = readable_views(&ring);
        let mut out = [0u8; 2];
        assert_eq!(ring.peek(&mut out, 2), Ok(2));
        assert_eq!(block, b"wx");
        assert_eq!((first, second), (&b"wx"[..], &b"yz"[..]));
        assert_eq!(&out, b"yz");
    }

    #[test]
    fn block_read_exposes_the_rest_after_skip() {
        let mut ring = RingBuffer::new([0u8; 6]).unwrap();
        ring.place_cursors(4, 4);
        ring.put_many(b"wxyz").unwrap();

        assert_eq!(ring.block_read(), b"wx");
        ring.skip(2).unwrap();
        assert_eq!(ring.block_read(), b"yz");
        ring.skip(2).unwrap();
        assert_eq!(ring.block_read(), b"");
    }

    #[test]
    fn block_write_keeps_one_slot_when_head_is_zero() {
        let mut ring = RingBuffer::new([0u8; 6]).unwrap();
        assert_eq!(ring.block_write_count(), 5);
        ring.place_cursors(3, 3);
        assert_eq!(ring.block_write_count(), 3);

        ring.block_write().copy_from_slice(b"abc");
        assert_eq!(ring.advance(3), Ok(3));
        assert_eq!(ring.cursor_positions(), (3, 0));
        assert_eq!(ring.block_write_count(), 2);
    }

    #[test]
    fn wide_items_round_trip() {
        #[derive(Clone, Copy, Debug, PartialEq)]
        struct Sample {
            channel: u8,
            value: f64,
        }

        let mut ring = RingBuffer::new([Sample { channel: 0, value: 0.0 }; 4]).unwrap();
        let samples = [
            Sample { channel: 1, value: 0.5 },
            Sample { channel: 2, value: -1.25 },
            Sample { channel: 3, value: 8.0 },
        ];
        ring.place_cursors(2, 2);
        assert_eq!(ring.put_many(&samples), Ok(3));

        let mut out = [Sample { channel: 0, value: 0.0 }; 3];
        assert_eq!(ring.get_many(&mut out), Ok(3));
        assert_eq!(out, samples);
    }
}
