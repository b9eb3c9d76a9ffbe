/*!
 * Data Segment
 * Owned growable byte range with a hard capacity cap
 */

use super::Segment;
use crate::core::limits::{DEFAULT_PAGE_SIZE, DEFAULT_SEGMENT_CAPACITY};
use crate::core::types::{Address, Size};
use log::{debug, warn};

/// In-memory data segment backed by an owned byte buffer.
///
/// Stands in for the process data segment: the break moves by exact byte
/// deltas and growth past the capacity cap fails the way a spent OS resource
/// would. Bytes gained through growth are zeroed.
#[derive(Debug)]
pub struct DataSegment {
    memory: Vec<u8>,
    capacity: Size,
    page_size: Size,
}

impl DataSegment {
    /// Create a fresh, empty segment with the default capacity cap
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SEGMENT_CAPACITY)
    }

    /// Create a fresh segment with a custom capacity cap (useful for testing
    /// exhaustion paths with small arenas)
    pub fn with_capacity(capacity: Size) -> Self {
        Self {
            memory: Vec::new(),
            capacity,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Capacity cap in bytes
    pub fn capacity(&self) -> Size {
        self.capacity
    }
}

impl Default for DataSegment {
    fn default() -> Self {
        Self::new()
    }
}

impl Segment for DataSegment {
    fn start(&self) -> Address {
        0
    }

    fn brk(&self) -> Address {
        self.memory.len()
    }

    fn page_size(&self) -> Size {
        self.page_size
    }

    fn sbrk(&mut self, delta: isize) -> Option<Address> {
        let old_brk = self.memory.len();

        let new_brk = if delta >= 0 {
            let grown = old_brk.checked_add(delta as usize)?;
            if grown > self.capacity {
                warn!(
                    "Segment exhausted: brk {} + delta {} exceeds capacity {}",
                    old_brk, delta, self.capacity
                );
                return None;
            }
            grown
        } else {
            let shrink = delta.unsigned_abs();
            if shrink > old_brk {
                warn!(
                    "Segment shrink of {} bytes rejected: break is at {}",
                    shrink, old_brk
                );
                return None;
            }
            old_brk - shrink
        };

        self.memory.resize(new_brk, 0);
        debug!("Segment break moved {} -> {}", old_brk, new_brk);

        Some(new_brk)
    }

    fn bytes(&self) -> &[u8] {
        &self.memory
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }
}
