//! A lock-free ring buffer over fixed, caller-supplied storage.
//!
//! It can run over a borrowed slice or own an array directly, and never
//! allocates.
//!
//! A `RingBuffer` moves `Copy` items one at a time (`put` / `get`), in bulk
//! (`put_many` / `get_many`), non-destructively (`peek`), or without copying
//! at all: `block_write` and `block_read` expose the contiguous free and
//! filled regions of the storage, and `advance` / `skip` commit what the
//! caller wrote or read there directly (for DMA or scatter I/O).
//!
//! `split` turns the ring into a `Producer` and a `Consumer` that can run on
//! two threads, or a thread and an interrupt handler, without a lock.
//!
//! # Feature Flags
//! The **arrayring** crate has the following cargo feature flags:
//!
//! - `std`
//!   - Optional, enabled by default
//!   - Use libstd; `Error` implements `std::error::Error`
//!
//!
//! - `use_generic_array`
//!   - Optional
//!   - Depend on generic-array and allow using it just like a fixed
//!     size array for `RingBuffer` storage.
//!
//!
//! - `trusted`
//!   - Optional
//!   - Skip the zero-length request checks. A zero-length request then
//!     moves nothing instead of failing with `InvalidArgument`.
//!
//! # Capacity
//!
//! Note that the `capacity()` is always `storage.len() - 1`: one slot stays
//! free so that the two cursors alone tell a full ring from an empty one.
//!
//! # Cursor width
//!
//! The cursor type defaults to `usize`. When the producer and the consumer
//! run concurrently on a target whose atomic word is narrower, pick the width
//! with `RingBuffer::<_, u16>::with_counter` (or `u8` / `u32`).
//!
//! # Examples
//! ```
//! use arrayring::{Error, RingBuffer};
//!
//! let mut ring = RingBuffer::new([0u8; 10]).unwrap();
//! assert_eq!(ring.capacity(), 9);
//!
//! assert_eq!(ring.put_many(b"abcdefghi"), Ok(9));
//! assert!(ring.is_full());
//!
//! let mut out = [0u8; 4];
//! assert_eq!(ring.get_many(&mut out), Ok(4));
//! assert_eq!(&out, b"abcd");
//!
//! let mut peeked = [0u8; 3];
//! assert_eq!(ring.peek(&mut peeked, 2), Ok(3));
//! assert_eq!(&peeked, b"ghi");
//! assert_eq!(ring.item_count(), 5);
//!
//! assert_eq!(ring.put_many(b"jklmno"), Err(Error::InsufficientItems(4)));
//! ```
//!
//! # Zero-copy blocks
//! ```
//! use arrayring::RingBuffer;
//!
//! let mut backing = [0u8; 8];
//! let mut ring = RingBuffer::new(&mut backing[..]).unwrap();
//!
//! let block = ring.block_write();
//! let n = block.len().min(5);
//! block[..n].copy_from_slice(&b"bytes"[..n]);
//! ring.advance(n).unwrap();
//!
//! assert_eq!(ring.block_read(), b"bytes");
//! let len = ring.block_read_count();
//! ring.skip(len).unwrap();
//! assert!(ring.is_empty());
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(missing_docs)]

#[cfg(not(any(feature = "std", test)))]
extern crate core as std;

#[cfg(feature = "use_generic_array")]
extern crate generic_array;

mod copy;
mod counter;
pub mod error;
mod ring;
mod storage;
mod utils;

pub use counter::Counter;
pub use error::Error;
pub use ring::{Consumer, Iter, Producer, RingBuffer};
pub use storage::Storage;
