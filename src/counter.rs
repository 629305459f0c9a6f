//! Cursor widths.

#[cfg(not(loom))]
use std::sync::atomic::{AtomicU16, AtomicU32, AtomicU8, AtomicUsize, Ordering};

#[cfg(loom)]
use loom::sync::atomic::{AtomicU16, AtomicU32, AtomicU8, AtomicUsize, Ordering};

mod sealed {
    pub trait Sealed {}
}

/// Trait for the unsigned integer types a `RingBuffer` can keep its cursors in.
///
/// Both cursors are stored in the matching atomic type, so the width should
/// not exceed the processor's atomic word when the producer and the consumer
/// run on different threads or in interrupt context.
///
/// The ring indexes its storage with whatever `load` returns, so the trait is
/// sealed: it is implemented for `u8`, `u16`, `u32` and `usize` only.
///
/// ```compile_fail
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use arrayring::Counter;
///
/// #[derive(Clone, Copy)]
/// struct Wide;
///
/// impl Counter for Wide {
///     type Atomic = AtomicUsize;
///     const MAX: usize = usize::MAX;
///     fn atomic(value: usize) -> AtomicUsize {
///         AtomicUsize::new(value)
///     }
///     fn load(atomic: &AtomicUsize, order: Ordering) -> usize {
///         atomic.load(order) + 1_000_000
///     }
///     fn store(atomic: &AtomicUsize, value: usize, order: Ordering) {
///         atomic.store(value, order)
///     }
/// }
/// ```
pub trait Counter: sealed::Sealed + Copy + 'static {
    #[doc(hidden)]
    /// The atomic cell holding a cursor of this width.
    type Atomic: Send + Sync;

    /// The largest index representable by this width.
    const MAX: usize;

    #[doc(hidden)]
    /// Creates a cursor cell holding `value`.
    fn atomic(value: usize) -> Self::Atomic;

    #[doc(hidden)]
    /// Loads a cursor.
    fn load(atomic: &Self::Atomic, order: Ordering) -> usize;

    #[doc(hidden)]
    /// Stores a cursor.
    fn store(atomic: &Self::Atomic, value: usize, order: Ordering);
}

macro_rules! counter_impl {
    ($int:ty, $atomic:ident) => {
        impl sealed::Sealed for $int {}

        impl Counter for $int {
            type Atomic = $atomic;

            const MAX: usize = <$int>::MAX as usize;

            #[inline(always)]
            fn atomic(value: usize) -> $atomic {
                debug_assert!(value <= <Self as Counter>::MAX);
                $atomic::new(value as $int)
            }

            #[inline(always)]
            fn load(atomic: &$atomic, order: Ordering) -> usize {
                atomic.load(order) as usize
            }

            #[inline(always)]
            fn store(atomic: &$atomic, value: usize, order: Ordering) {
                debug_assert!(value <= <Self as Counter>::MAX);
                atomic.store(value as $int, order)
            }
        }
    };
}

counter_impl!(u8, AtomicU8);
counter_impl!(u16, AtomicU16);
counter_impl!(u32, AtomicU32);
counter_impl!(usize, AtomicUsize);
