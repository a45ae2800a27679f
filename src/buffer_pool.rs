//! A fixed-count pool of reusable byte buffers.
//!
//! The pool owns its buffers for its own lifetime (dropping the pool drops
//! every buffer); there is no separate destroy operation. Exhaustion is
//! non-fatal: [`BufferPool::acquire`] returns `None` and callers are
//! expected to fall back to a fresh heap allocation rather than treat an
//! empty pool as an error.

use std::sync::Mutex;

struct Slot {
    data: Vec<u8>,
    in_use: bool,
}

/// A fixed-count pool of same-capacity byte buffers.
pub struct BufferPool {
    capacity: usize,
    slots: Mutex<Vec<Slot>>,
}

/// A handle to an acquired buffer. Returning it to the pool (via
/// [`BufferPool::release`]) is the caller's responsibility; dropping the
/// handle without releasing simply leaks the slot as permanently in-use for
/// the lifetime of the pool. An outstanding handle at pool teardown is a
/// caller bug, not something the pool tries to detect.
pub struct BufferHandle {
    index: usize,
}

impl BufferPool {
    /// Creates a pool of `count` buffers, each `capacity` bytes.
    pub fn new(count: usize, capacity: usize) -> Self {
        let slots = (0..count)
            .map(|_| Slot {
                data: vec![0u8; capacity],
                in_use: false,
            })
            .collect();
        Self {
            capacity,
            slots: Mutex::new(slots),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Scans for the first free buffer, marks it used, and returns a handle.
    /// Returns `None` if every buffer is currently checked out.
    pub fn acquire(&self) -> Option<BufferHandle> {
        let mut slots = self.slots.lock().expect("buffer pool mutex poisoned");
        let index = slots.iter().position(|s| !s.in_use)?;
        let slot = &mut slots[index];
        slot.in_use = true;
        slot.data.iter_mut().for_each(|b| *b = 0);
        Some(BufferHandle { index })
    }

    /// Runs `f` with mutable access to the acquired buffer's bytes.
    pub fn with_buffer_mut<R>(&self, handle: &BufferHandle, f: impl FnOnce(&mut [u8]) -> R) -> R {
        let mut slots = self.slots.lock().expect("buffer pool mutex poisoned");
        f(&mut slots[handle.index].data)
    }

    /// Flips the slot back to free. Idempotent.
    pub fn release(&self, handle: BufferHandle) {
        let mut slots = self.slots.lock().expect("buffer pool mutex poisoned");
        slots[handle.index].in_use = false;
    }

    /// Number of buffers currently checked out.
    #[cfg(test)]
    fn in_use_count(&self) -> usize {
        self.slots
            .lock()
            .expect("buffer pool mutex poisoned")
            .iter()
            .filter(|s| s.in_use)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_then_exhaust_returns_none() {
        let pool = BufferPool::new(2, 16);
        let a = pool.acquire().expect("first acquire");
        let b = pool.acquire().expect("second acquire");
        assert!(pool.acquire().is_none());
        assert_eq!(pool.in_use_count(), 2);
        pool.release(a);
        assert_eq!(pool.in_use_count(), 1);
        pool.release(b);
        assert_eq!(pool.in_use_count(), 0);
    }

    #[test]
    fn acquire_after_release_reuses_slot() {
        let pool = BufferPool::new(1, 8);
        let a = pool.acquire().unwrap();
        pool.with_buffer_mut(&a, |buf| buf[0] = 42);
        pool.release(a);
        let b = pool.acquire().expect("slot should be free again");
        // Released buffers are zeroed on next acquire.
        pool.with_buffer_mut(&b, |buf| assert_eq!(buf[0], 0));
    }
}
