//! Error values.

#[cfg(feature = "std")]
use std::error;
use std::fmt;

/// Error value returned by `RingBuffer` operations.
///
/// Every failing call leaves the ring untouched except `InsufficientItems`,
/// which reports a partial transfer that has already been committed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Error {
    /// A zero-length request, or storage with fewer than two slots or more
    /// slots than the cursor width can index.
    InvalidArgument,
    /// Nothing could be read because the ring holds no items.
    Empty,
    /// Nothing could be written because the ring has no free slot.
    Full,
    /// Fewer items than requested were moved. Holds the number moved.
    InsufficientItems(usize),
}

impl Error {
    /// Number of items the failing call still moved.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::{Error, RingBuffer};
    ///
    /// let mut ring = RingBuffer::new([0u8; 4]).unwrap();
    /// let err = ring.put_many(b"hello").unwrap_err();
    /// assert_eq!(err, Error::InsufficientItems(3));
    /// assert_eq!(err.count(), 3);
    /// ```
    #[inline]
    pub fn count(&self) -> usize {
        match *self {
            Error::InsufficientItems(count) => count,
            _ => 0,
        }
    }

    /// Stable name of the status.
    pub fn as_str(&self) -> &'static str {
        match *self {
            Error::InvalidArgument => "invalid argument",
            Error::Empty => "ring buffer is empty",
            Error::Full => "ring buffer is full",
            Error::InsufficientItems(_) => "insufficient items",
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InsufficientItems(count) => write!(f, "{} (moved {})", self.as_str(), count),
            _ => f.write_str(self.as_str()),
        }
    }
}
