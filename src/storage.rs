//! Backing storage for a `RingBuffer`.

/// Trait for the fixed-length slot arrays a `RingBuffer` can run over.
///
/// The ring never allocates: it is handed a storage value at construction and
/// gives it back from `into_inner`. Borrowed slices keep the memory owned by
/// the caller, arrays make the ring self-contained.
///
/// # Safety
///
/// `as_slice` and `as_mut_slice` must always return views of the same length
/// over the same memory for as long as the value is not moved.
pub unsafe trait Storage {
    /// The slot type.
    type Item;

    /// Views the slots as an immutable slice.
    fn as_slice(&self) -> &[Self::Item];

    /// Views the slots as a mutable slice.
    fn as_mut_slice(&mut self) -> &mut [Self::Item];

    /// Number of slots, including the one a ring always keeps free.
    #[inline(always)]
    fn len(&self) -> usize {
        self.as_slice().len()
    }
}

unsafe impl<T, const N: usize> Storage for [T; N] {
    type Item = T;

    #[inline(always)]
    fn as_slice(&self) -> &[T] {
        self
    }

    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

unsafe impl<'a, T> Storage for &'a mut [T] {
    type Item = T;

    #[inline(always)]
    fn as_slice(&self) -> &[T] {
        self
    }

    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

#[cfg(feature = "use_generic_array")]
mod generic_impl {
    use super::Storage;
    use generic_array::{ArrayLength, GenericArray};

    unsafe impl<T, N> Storage for GenericArray<T, N>
    where
        N: ArrayLength<T>,
    {
        type Item = T;

        #[inline(always)]
        fn as_slice(&self) -> &[T] {
            GenericArray::as_slice(self)
        }

        #[inline(always)]
        fn as_mut_slice(&mut self) -> &mut [T] {
            GenericArray::as_mut_slice(self)
        }
    }

}
