/// What to do when a push finds the buffer full.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Discard the value being pushed. The producer is not told.
    #[default]
    DropNewest,
    /// Evict the oldest queued value to make room.
    DropOldest,
}

/// Outcome of [`RingBuffer::push`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PushOutcome<T> {
    Stored,
    /// The buffer was full and the pushed value was discarded.
    DroppedNewest,
    /// The buffer was full and this oldest value was evicted.
    DroppedOldest(T),
}

/// Fixed-capacity FIFO over a backing array of `N` slots.
///
/// `head` is the next slot to read, `tail` the next slot to write. One slot
/// always stays empty so `head == tail` means empty and
/// `tail + 1 == head` means full, without a separate count; at most
/// `N - 1` values are ever stored.
#[derive(Debug)]
pub struct RingBuffer<T, const N: usize> {
    data: [T; N],
    head: usize,
    tail: usize,
}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    /// All slots start as `value`; usable for statics.
    #[inline]
    pub const fn new_with(value: T) -> Self {
        const { assert!(N >= 2, "ring buffer needs at least two slots") };
        Self {
            data: [value; N],
            head: 0,
            tail: 0,
        }
    }

    /// Number of values that fit, `N - 1`.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    #[inline(always)]
    pub const fn len(&self) -> usize {
        (self.tail + N - self.head) % N
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    #[inline(always)]
    pub const fn is_full(&self) -> bool {
        (self.tail + 1) % N == self.head
    }

    #[inline(always)]
    pub fn reset(&mut self) {
        self.head = 0;
        self.tail = 0;
    }

    /// Push unless full; returns false when the value was not stored.
    #[inline]
    pub fn try_push(&mut self, value: T) -> bool {
        if self.is_full() {
            return false;
        }
        self.data[self.tail] = value;
        self.tail = (self.tail + 1) % N;
        true
    }

    /// Push, evicting and returning the oldest value when full.
    #[inline]
    pub fn push_overwrite(&mut self, value: T) -> Option<T> {
        let evicted = if self.is_full() { self.try_pop() } else { None };
        self.data[self.tail] = value;
        self.tail = (self.tail + 1) % N;
        evicted
    }

    pub fn push(&mut self, value: T, policy: OverflowPolicy) -> PushOutcome<T> {
        match policy {
            OverflowPolicy::DropNewest => {
                if self.try_push(value) {
                    PushOutcome::Stored
                } else {
                    PushOutcome::DroppedNewest
                }
            }
            OverflowPolicy::DropOldest => match self.push_overwrite(value) {
                Some(old) => PushOutcome::DroppedOldest(old),
                None => PushOutcome::Stored,
            },
        }
    }

    #[inline]
    pub fn try_pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let value = self.data[self.head];
        self.head = (self.head + 1) % N;
        Some(value)
    }

    #[inline]
    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            None
        } else {
            Some(&self.data[self.head])
        }
    }
}

impl<T: Copy + Default, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new_with(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_slot_reserved() {
        let mut rb: RingBuffer<u32, 64> = RingBuffer::default();
        assert_eq!(rb.capacity(), 63);
        for i in 0..64 {
            let stored = rb.try_push(i);
            assert_eq!(stored, i < 63, "push {}", i);
        }
        assert!(rb.is_full());
        assert_eq!(rb.len(), 63);
        for i in 0..63 {
            assert_eq!(rb.try_pop(), Some(i));
        }
        assert_eq!(rb.try_pop(), None);
    }

    #[test]
    fn test_wraparound_keeps_fifo() {
        let mut rb: RingBuffer<u8, 4> = RingBuffer::new_with(0);
        for round in 0..10u8 {
            assert!(rb.try_push(round));
            assert!(rb.try_push(round.wrapping_add(100)));
            assert_eq!(rb.len(), 2);
            assert_eq!(rb.try_pop(), Some(round));
            assert_eq!(rb.peek(), Some(&round.wrapping_add(100)));
            assert_eq!(rb.try_pop(), Some(round.wrapping_add(100)));
            assert!(rb.is_empty());
        }
    }

    #[test]
    fn test_drop_oldest_policy() {
        let mut rb: RingBuffer<u8, 4> = RingBuffer::new_with(0);
        for v in 1..=3 {
            assert_eq!(rb.push(v, OverflowPolicy::DropOldest), PushOutcome::Stored);
        }
        assert_eq!(
            rb.push(4, OverflowPolicy::DropOldest),
            PushOutcome::DroppedOldest(1)
        );
        assert_eq!(rb.try_pop(), Some(2));
        assert_eq!(rb.try_pop(), Some(3));
        assert_eq!(rb.try_pop(), Some(4));
    }

    #[test]
    fn test_drop_newest_policy() {
        let mut rb: RingBuffer<u8, 3> = RingBuffer::new_with(0);
        rb.push(1, OverflowPolicy::DropNewest);
        rb.push(2, OverflowPolicy::DropNewest);
        assert_eq!(
            rb.push(3, OverflowPolicy::DropNewest),
            PushOutcome::DroppedNewest
        );
        assert_eq!(rb.try_pop(), Some(1));
        assert_eq!(rb.try_pop(), Some(2));
        assert_eq!(rb.try_pop(), None);
    }

    #[test]
    fn test_reset() {
        let mut rb: RingBuffer<u8, 8> = RingBuffer::new_with(0);
        rb.try_push(1);
        rb.try_push(2);
        rb.reset();
        assert!(rb.is_empty());
        assert_eq!(rb.len(), 0);
    }
}
