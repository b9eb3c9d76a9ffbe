/*!
 * Heap Resize Implementation
 * In-place shrink and grow, with allocate-copy-release as the fallback
 */

use super::HeapManager;
use crate::core::types::{Address, Size};
use crate::heap::tag::{self, WORD_SIZE};
use crate::heap::types::{BlockStatus, HeapError, HeapResult};
use crate::segment::Segment;
use log::debug;

impl<S: Segment> HeapManager<S> {
    /// Resize an allocation to hold at least `size` payload bytes.
    ///
    /// `None` behaves as `allocate`; a zero size releases the block and
    /// reports `ZeroSize`. The address is preserved whenever the block can
    /// shrink in place or grow by absorbing the following free block; only
    /// the relocation fallback moves the payload. When relocation fails the
    /// original block is left untouched.
    pub fn resize(&mut self, addr: Option<Address>, size: Size) -> HeapResult<Address> {
        let Some(addr) = addr else {
            return self.allocate(size);
        };

        if size == 0 {
            self.release(Some(addr));
            return Err(HeapError::ZeroSize);
        }

        let header = addr - WORD_SIZE;
        let old_size = self.size_at(header);
        let new_size = size
            .checked_add(2 * WORD_SIZE)
            .and_then(tag::checked_round_up)
            .ok_or(HeapError::SizeTooLarge { requested: size })?;

        if new_size == old_size {
            return Ok(addr);
        }

        if new_size < old_size {
            self.shrink_in_place(header, old_size, new_size);
            return Ok(addr);
        }

        // Grow in place by absorbing the following free block
        let next = header + old_size;
        if self.status_at(next) == BlockStatus::Free {
            let next_size = self.size_at(next);
            if old_size + next_size >= new_size {
                let remainder = old_size + next_size - new_size;
                // The merge swallows the free block's header at `next`; a
                // cursor resting anywhere in the merged span must move before
                // the tags are rewritten
                self.retarget_cursor(header, old_size + next_size);
                self.write_block(header, new_size, BlockStatus::Allocated);
                if remainder > 0 {
                    self.write_block(header + new_size, remainder, BlockStatus::Free);
                }
                debug!(
                    "Resized block at {:#x} in place: {} -> {} bytes ({} left free)",
                    header, old_size, new_size, remainder
                );
                return Ok(addr);
            }
        }

        // Relocate: allocate first so a failure leaves the original intact
        let new_addr = self.allocate(size)?;
        let old_payload = old_size - 2 * WORD_SIZE;
        self.segment_mut()
            .bytes_mut()
            .copy_within(addr..addr + old_payload, new_addr);
        self.release(Some(addr));

        debug!(
            "Resized block at {:#x} by relocation to {:#x}: {} -> {} bytes",
            header,
            new_addr - WORD_SIZE,
            old_size,
            new_size
        );

        Ok(new_addr)
    }

    /// Split off and free the trailing part of an allocated block, merging
    /// the remainder with a following free block.
    fn shrink_in_place(&mut self, header: Address, old_size: Size, new_size: Size) {
        let mut remainder = old_size - new_size;
        let remainder_header = header + new_size;

        let next = header + old_size;
        if self.status_at(next) == BlockStatus::Free {
            remainder += self.size_at(next);
        }

        self.write_block(remainder_header, remainder, BlockStatus::Free);
        self.write_block(header, new_size, BlockStatus::Allocated);
        self.retarget_cursor(remainder_header, remainder);

        debug!(
            "Shrunk block at {:#x}: {} -> {} bytes, {} bytes freed",
            header, old_size, new_size, remainder
        );
    }
}
