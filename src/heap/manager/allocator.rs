/*!
 * Heap Allocator Implementation
 * Allocation, zero-filled allocation, and release
 */

use super::HeapManager;
use crate::core::types::{Address, Size};
use crate::heap::tag::{self, MIN_BLOCK, WORD_SIZE};
use crate::heap::types::{BlockStatus, HeapError, HeapResult};
use crate::segment::Segment;
use log::{debug, info, warn};
use std::cmp;

impl<S: Segment> HeapManager<S> {
    /// Allocate a payload of at least `size` bytes.
    ///
    /// Returns the payload offset, one word past the block header. A zero
    /// size is a benign failure, and a size too large for the block
    /// arithmetic reports `SizeTooLarge`; exhaustion of the data segment
    /// surfaces as `OutOfMemory` with the heap left untouched.
    pub fn allocate(&mut self, size: Size) -> HeapResult<Address> {
        if size == 0 {
            debug!("allocate(0) refused");
            return Err(HeapError::ZeroSize);
        }

        let block_size = size
            .checked_add(2 * WORD_SIZE)
            .and_then(tag::checked_round_up)
            .ok_or(HeapError::SizeTooLarge { requested: size })?;

        let candidate = match self.find_free_block(block_size) {
            Some(header) => header,
            None => self.extend_heap(block_size)?,
        };

        let candidate_size = self.size_at(candidate);
        debug_assert!(candidate_size >= block_size);

        if candidate_size >= block_size + MIN_BLOCK {
            // Split: the remainder is itself a valid block
            self.write_block(candidate, block_size, BlockStatus::Allocated);
            self.write_block(
                candidate + block_size,
                candidate_size - block_size,
                BlockStatus::Free,
            );
        } else {
            // Absorb the whole candidate rather than leave an unusable sliver
            self.write_block(candidate, candidate_size, BlockStatus::Allocated);
        }

        debug!(
            "Allocated {} bytes (block {} at {:#x}) with {} policy",
            size, block_size, candidate, self.policy
        );

        Ok(candidate + WORD_SIZE)
    }

    /// Allocate `count * elem_size` bytes and zero-fill the payload.
    ///
    /// The multiplication is checked: overflow reports `Overflow` instead of
    /// silently wrapping to a tiny allocation.
    pub fn zero_allocate(&mut self, count: Size, elem_size: Size) -> HeapResult<Address> {
        let total = count
            .checked_mul(elem_size)
            .ok_or(HeapError::Overflow { count, elem_size })?;

        let addr = self.allocate(total)?;
        self.payload_mut(addr).fill(0);

        Ok(addr)
    }

    /// Release an allocation.
    ///
    /// `None` and already-free blocks are accepted silently, matching
    /// conventional allocator leniency. The freed block is eagerly coalesced
    /// with free neighbors; a large enough trailing free block is returned to
    /// the data segment.
    pub fn release(&mut self, addr: Option<Address>) {
        let Some(addr) = addr else {
            debug!("release(None) ignored");
            return;
        };

        let mut header = addr - WORD_SIZE;
        if self.status_at(header) == BlockStatus::Free {
            warn!("release of already-free block at {:#x} ignored", addr);
            return;
        }

        let mut size = self.size_at(header);
        self.write_block(header, size, BlockStatus::Free);

        // Coalesce left via the preceding block's footer
        if self.status_at(header - WORD_SIZE) == BlockStatus::Free {
            let left_size = self.size_at(header - WORD_SIZE);
            header -= left_size;
            size += left_size;
            self.write_block(header, size, BlockStatus::Free);
        }

        // Coalesce right
        if self.status_at(header + size) == BlockStatus::Free {
            size += self.size_at(header + size);
            self.write_block(header, size, BlockStatus::Free);
        }

        self.retarget_cursor(header, size);

        debug!("Released block at {:#x}, {} bytes free after coalescing", header, size);

        // Shrink the arena when the merged block ends exactly at heap_end
        if header + size == self.heap_end && size >= self.shrink_threshold {
            if let Some(new_brk) = self.segment_mut().sbrk(-(size as isize)) {
                self.heap_end -= size;
                self.store(self.heap_end, tag::pack(0, BlockStatus::Allocated));
                info!(
                    "Heap shrunk by {} bytes: heap_end now {:#x}, segment break {:#x}",
                    size, self.heap_end, new_brk
                );
            }
        }
    }

    /// Grow the arena enough to hold a block of `block_size` bytes.
    ///
    /// A free block ending at the old heap_end is absorbed into the new
    /// region; the right sentinel is rewritten at the new heap_end. Returns
    /// the header of the resulting free block.
    fn extend_heap(&mut self, block_size: Size) -> HeapResult<Address> {
        let grow_by = cmp::max(self.chunk_size, block_size);

        let Some(new_brk) = self.segment_mut().sbrk(grow_by as isize) else {
            warn!(
                "Segment growth of {} bytes failed, allocation of block {} refused",
                grow_by, block_size
            );
            return Err(HeapError::OutOfMemory {
                requested: block_size,
                grow_by,
                arena: self.arena_size(),
            });
        };

        let old_end = self.heap_end;
        self.heap_end = (new_brk - WORD_SIZE) / MIN_BLOCK * MIN_BLOCK;

        let mut header = old_end;
        let mut size = self.heap_end - old_end;

        // Absorb a free block that ended at the old right sentinel
        if self.status_at(old_end - WORD_SIZE) == BlockStatus::Free {
            let trailing = self.size_at(old_end - WORD_SIZE);
            header -= trailing;
            size += trailing;
        }

        self.write_block(header, size, BlockStatus::Free);
        self.store(self.heap_end, tag::pack(0, BlockStatus::Allocated));
        self.retarget_cursor(header, size);

        info!(
            "Heap grown by {} bytes: arena end {:#x} -> {:#x}, new free block of {} bytes",
            grow_by, old_end, self.heap_end, size
        );

        Ok(header)
    }
}
