// Criblink - Offline-resilient sensor telemetry core
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.


//! Bounded ring buffer for pending telemetry records
//!
//! Fixed-capacity FIFO store. Once full, a push overwrites the slot under
//! the write cursor and advances it, so the oldest surviving record is
//! always the one sacrificed next. The buffer never fails; it only
//! truncates its own history.

use std::mem;

/// Fixed-capacity overwrite-oldest FIFO
///
/// Owned by exactly one component (the delivery engine); there is no
/// interior mutability and no locking.
#[derive(Debug)]
pub struct RingBuffer<T> {
    capacity: usize,
    items: Vec<T>,
    /// Overwrite position, meaningful only once `items` is full
    write_cursor: usize,
}

impl<T> RingBuffer<T> {
    /// Create a buffer holding at most `capacity` items
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be positive");
        Self {
            capacity,
            items: Vec::with_capacity(capacity),
            write_cursor: 0,
        }
    }

    /// Append an item, overwriting the oldest surviving one when full
    pub fn push(&mut self, item: T) {
        if self.items.len() < self.capacity {
            self.items.push(item);
        } else {
            self.items[self.write_cursor] = item;
            self.write_cursor = (self.write_cursor + 1) % self.capacity;
        }
    }

    /// Atomically take every held item, oldest surviving first, and clear
    ///
    /// The cursor resets; no partial drain state is ever observable.
    pub fn drain_all(&mut self) -> Vec<T> {
        let cursor = mem::take(&mut self.write_cursor);
        let mut items = mem::take(&mut self.items);
        self.items.reserve(self.capacity);
        // After wraparound the slot under the cursor holds the oldest
        // surviving item; start drainage there.
        if cursor > 0 {
            items.rotate_left(cursor);
        }
        items
    }

    /// Number of items currently held
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when the next push will overwrite
    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    /// Maximum number of items
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
