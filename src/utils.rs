//! Cursor arithmetic. `capacity` here is the slot count of the storage,
//! one more than the number of items a ring can hold.

#[inline]
pub fn wrap_add(index: usize, addend: usize, capacity: usize) -> usize {
    debug_assert!(index < capacity);
    debug_assert!(addend < capacity);
    let sum = index + addend;
    if sum >= capacity {
        sum - capacity
    } else {
        sum
    }
}

/// Items between the read cursor `head` and the write cursor `tail`.
#[inline]
pub fn count(head: usize, tail: usize, capacity: usize) -> usize {
    debug_assert!(head < capacity);
    debug_assert!(tail < capacity);
    if tail >= head {
        tail - head
    } else {
        capacity + tail - head
    }
}

/// Free slots, keeping one slot back so full and empty stay apart.
#[inline]
pub fn free(head: usize, tail: usize, capacity: usize) -> usize {
    capacity - 1 - count(head, tail, capacity)
}

/// Items readable in one run starting at `head`.
#[inline]
pub fn contiguous_readable(head: usize, tail: usize, capacity: usize) -> usize {
    if head < tail {
        tail - head
    } else if head > tail {
        capacity - head
    } else {
        0
    }
}

/// Slots writable in one run starting at `tail`.
#[inline]
pub fn contiguous_writable(head: usize, tail: usize, capacity: usize) -> usize {
    if head <= tail {
        // writing the last slot would make tail wrap onto head
        if head == 0 {
            capacity - tail - 1
        } else {
            capacity - tail
        }
    } else {
        head - tail - 1
    }
}
