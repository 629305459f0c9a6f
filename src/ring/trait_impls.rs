use std::fmt;
use std::iter::FusedIterator;
use std::slice;

use super::RingBuffer;
use crate::counter::Counter;
use crate::storage::Storage;

/// Oldest-to-newest iterator over the items of a ring.
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
#[derive(Clone)]
pub struct Iter<'a, T: 'a> {
    first: slice::Iter<'a, T>,
    second: slice::Iter<'a, T>,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(first: &'a [T], second: &'a [T]) -> Self {
        Iter {
            first: first.iter(),
            second: second.iter(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.first.next().or_else(|| self.second.next())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.first.len() + self.second.len();
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        self.second.next_back().or_else(|| self.first.next_back())
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, S: Storage, C: Counter> IntoIterator for &'a RingBuffer<S, C>
where
    S::Item: Copy,
{
    type Item = &'a S::Item;
    type IntoIter = Iter<'a, S::Item>;

    fn into_iter(self) -> Iter<'a, S::Item> {
        self.iter()
    }
}

impl<S: Storage, C: Counter> PartialEq for RingBuffer<S, C>
where
    S::Item: Copy + PartialEq,
{
    fn eq(&self, other: &RingBuffer<S, C>) -> bool {
        if self.item_count() != other.item_count() {
            return false;
        }
        let (sa, sb) = self.as_slices();
        let (oa, ob) = other.as_slices();
        if sa.len() == oa.len() {
            sa == oa && sb == ob
        } else if sa.len() < oa.len() {
            // Always divisible in three sections, for example:
            // self:  [a b c|d e f]
            // other: [0 1 2 3|4 5]
            // front = 3, mid = 1,
            // [a b c] == [0 1 2] && [d] == [3] && [e f] == [4 5]
            let front = sa.len();
            let mid = oa.len() - front;

            let (oa_front, oa_mid) = oa.split_at(front);
            let (sb_mid, sb_back) = sb.split_at(mid);
            sa == oa_front && sb_mid == oa_mid && sb_back == ob
        } else {
            let front = oa.len();
            let mid = sa.len() - front;

            let (sa_front, sa_mid) = sa.split_at(front);
            let (ob_mid, ob_back) = ob.split_at(mid);
            sa_front == oa && sa_mid == ob_mid && sb == ob_back
        }
    }
}

impl<S: Storage, C: Counter> Eq for RingBuffer<S, C> where S::Item: Copy + Eq {}

impl<S: Storage, C: Counter> fmt::Debug for RingBuffer<S, C>
where
    S::Item: Copy + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
