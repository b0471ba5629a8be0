//! Lock-free receive queue for inbound serial text.
//!
//! SPSC (single producer, single consumer) byte ring:
//!
//! ```text
//! RX pump task            RxQueue               Keyer loop
//! ────────────            ───────               ──────────
//! UART byte ──push()───▶ [B0][B1][B2] ──pop()──▶ AsciiRelay
//!             tail (producer-owned)   head (consumer-owned)
//! ```
//!
//! # Overflow policy
//!
//! Backpressure, never data loss. A push into a full queue is refused and the
//! byte is handed back in [`RxFull`]; nothing already queued is overwritten.
//! The producer keeps the byte (or leaves it in the UART driver) until
//! [`RxQueue::is_full`] clears. Every refusal is counted.
//!
//! The UART driver's own ring is finite and the keyer line has no flow
//! control. [`BacklogWatch`] turns polled driver fill levels into one event
//! per episode of that ring reaching its limit.
//!
//! # Rules
//!
//! - Only the producer writes `tail`, only the consumer writes `head`
//! - Indices are published with Release and observed with Acquire
//! - No interrupt masking, no locks, no allocation

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Default capacity: 128 bytes.
pub const RX_QUEUE_SIZE: usize = 128;

/// Push refused because the queue is full. Carries the refused byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RxFull(pub u8);

/// Fixed-capacity SPSC byte queue. `N` must be a power of 2.
pub struct RxQueue<const N: usize = RX_QUEUE_SIZE> {
    slots: UnsafeCell<[u8; N]>,
    /// Next slot to read (consumer-owned).
    head: AtomicU32,
    /// Next slot to write (producer-owned).
    tail: AtomicU32,
    /// Pushes refused because the queue was full.
    rejected: AtomicU32,
}

// SAFETY: Single producer, single consumer. The producer only writes the slot
// at `tail` while the queue is not full, the consumer only reads the slot at
// `head` while it is not empty, so the two never touch the same slot.
unsafe impl<const N: usize> Sync for RxQueue<N> {}
unsafe impl<const N: usize> Send for RxQueue<N> {}

impl<const N: usize> RxQueue<N> {
    const MASK: usize = N - 1;

    /// Create a new empty queue.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "RX queue size must be power of 2");
        assert!(N <= u32::MAX as usize / 2, "RX queue too large for u32 indices");

        Self {
            slots: UnsafeCell::new([0; N]),
            head: AtomicU32::new(0),
            tail: AtomicU32::new(0),
            rejected: AtomicU32::new(0),
        }
    }

    /// Queue one inbound byte (producer side).
    ///
    /// Lowercase ASCII is folded to uppercase. Returns [`RxFull`] with the
    /// byte when there is no room.
    #[inline]
    pub fn push(&self, byte: u8) -> Result<(), RxFull> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if tail.wrapping_sub(head) >= N as u32 {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            return Err(RxFull(byte));
        }

        let idx = (tail as usize) & Self::MASK;

        // SAFETY: Slot `idx` is outside [head, tail) so the consumer is not
        // reading it; only this producer writes.
        unsafe {
            (self.slots.get() as *mut u8).add(idx).write(byte.to_ascii_uppercase());
        }

        self.tail.store(tail.wrapping_add(1), Ordering::Release);
        Ok(())
    }

    /// Take the oldest byte (consumer side). `None` if empty.
    #[inline]
    pub fn pop(&self) -> Option<u8> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        if head == tail {
            return None;
        }

        let idx = (head as usize) & Self::MASK;

        // SAFETY: Slot `idx` is inside [head, tail), fully written before the
        // producer's Release store of `tail`.
        let byte = unsafe { (self.slots.get() as *const u8).add(idx).read() };

        self.head.store(head.wrapping_add(1), Ordering::Release);
        Some(byte)
    }

    /// Number of queued bytes.
    ///
    /// Exact from any task, not just the producer and consumer: `tail` is
    /// read between two equal reads of `head`, so both come from the same
    /// instant.
    #[inline]
    pub fn len(&self) -> usize {
        let mut head = self.head.load(Ordering::Acquire);
        loop {
            let tail = self.tail.load(Ordering::Acquire);
            let again = self.head.load(Ordering::Acquire);
            if again == head {
                return (tail.wrapping_sub(head) as usize).min(N);
            }
            head = again;
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True while pushes would be refused.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= N
    }

    /// Free slots.
    #[inline]
    pub fn available(&self) -> usize {
        N - self.len()
    }

    /// Total refused pushes since boot.
    #[inline]
    pub fn rejected(&self) -> u32 {
        self.rejected.load(Ordering::Relaxed)
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

/// Edge detector for a driver-side backlog reaching `limit` bytes.
pub struct BacklogWatch {
    limit: usize,
    full: bool,
}

impl BacklogWatch {
    pub const fn new(limit: usize) -> Self {
        Self { limit, full: false }
    }

    /// Feed the current backlog. True only on the poll where it first
    /// reaches the limit; it must drop below again to re-arm.
    pub fn observe(&mut self, buffered: usize) -> bool {
        let full = buffered >= self.limit;
        let entered = full && !self.full;
        self.full = full;
        entered
    }
}

impl<const N: usize> Default for RxQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_empty() {
        let q = RxQueue::<8>::new();
        assert!(q.is_empty());
        assert_eq!(q.len(), 0);
        assert_eq!(q.pop(), None);
        assert_eq!(q.capacity(), 8);
    }

    #[test]
    fn test_queue_folds_case() {
        let q = RxQueue::<8>::new();
        q.push(b'c').unwrap();
        q.push(b'Q').unwrap();
        q.push(b'5').unwrap();
        q.push(b' ').unwrap();

        assert_eq!(q.pop(), Some(b'C'));
        assert_eq!(q.pop(), Some(b'Q'));
        assert_eq!(q.pop(), Some(b'5'));
        assert_eq!(q.pop(), Some(b' '));
    }

    #[test]
    fn test_queue_full_refuses() {
        let q = RxQueue::<4>::new();
        for b in *b"ABCD" {
            assert!(q.push(b).is_ok());
        }
        assert!(q.is_full());
        assert_eq!(q.push(b'e'), Err(RxFull(b'e')));
        assert_eq!(q.rejected(), 1);
        assert_eq!(q.len(), 4);
    }

    #[test]
    fn test_backlog_watch_fires_once_per_episode() {
        let mut watch = BacklogWatch::new(100);
        assert!(!watch.observe(0));
        assert!(!watch.observe(99));
        assert!(watch.observe(100));
        assert!(!watch.observe(120));

        assert!(!watch.observe(40));
        assert!(watch.observe(101));
    }

    #[test]
    fn test_default_capacity() {
        let q: RxQueue = RxQueue::new();
        assert_eq!(q.capacity(), 128);
        assert_eq!(q.available(), 128);
    }
}
