//! Copies between a caller slice and a run of ring slots that may cross the
//! physical end of the storage.
//!
//! A run of `len` slots starting at `start` splits into at most two segments:
//!
//! ```text
//!                    start
//!                      v
//!   [ B B _ _ _ _ _ _ A A A ]
//!     \_/              \___/
//!    second            first
//! ```
//!
//! `first` stops at the end of the storage, `second` picks up at index 0.

use std::cmp;
use std::ptr;

/// Lengths of the segment before the wrap point and the one after it.
#[inline]
pub fn segments(start: usize, len: usize, capacity: usize) -> (usize, usize) {
    debug_assert!(start < capacity);
    debug_assert!(len < capacity);
    let first = cmp::min(capacity - start, len);
    (first, len - first)
}

/// Copies `src` into the slots starting at `start`.
///
/// # Safety
///
/// `base` must point to `capacity` slots valid for writes, the `src.len()`
/// slots from `start` must not be read or written by anyone else for the
/// duration of the call, and `src` must not overlap them.
pub unsafe fn write_wrapping<T: Copy>(base: *mut T, capacity: usize, start: usize, src: &[T]) {
    let (first, second) = segments(start, src.len(), capacity);
    ptr::copy_nonoverlapping(src.as_ptr(), base.add(start), first);
    if second > 0 {
        ptr::copy_nonoverlapping(src.as_ptr().add(first), base, second);
    }
}

/// Copies the slots starting at `start` into `dst`.
///
/// # Safety
///
/// `base` must point to `capacity` initialized slots, the `dst.len()` slots
/// from `start` must not be written by anyone else for the duration of the
/// call, and `dst` must not overlap them.
pub unsafe fn read_wrapping<T: Copy>(base: *const T, capacity: usize, start: usize, dst: &mut [T]) {
    let (first, second) = segments(start, dst.len(), capacity);
    ptr::copy_nonoverlapping(base.add(start), dst.as_mut_ptr(), first);
    if second > 0 {
        ptr::copy_nonoverlapping(base, dst.as_mut_ptr().add(first), second);
    }
}
