/*!
 * Block Selection Policies
 * First-fit, next-fit, and best-fit scans over the implicit free list
 *
 * All three scan header words only; footers exist for leftward navigation.
 * The sentinels are allocated with size zero, so no size test can match them.
 */

use super::HeapManager;
use crate::core::types::{Address, Size};
use crate::heap::types::{BlockStatus, Policy};
use crate::segment::Segment;
use log::error;

impl<S: Segment> HeapManager<S> {
    /// Find a free block of at least `block_size` bytes under the active
    /// policy. Scans mutate nothing but the next-fit cursor.
    pub(super) fn find_free_block(&mut self, block_size: Size) -> Option<Address> {
        if self.heap_start == self.heap_end {
            return None; // fully shrunk arena holds no blocks
        }
        match self.policy {
            Policy::FirstFit => self.first_fit(block_size),
            Policy::NextFit => self.next_fit(block_size),
            Policy::BestFit => self.best_fit(block_size),
        }
    }

    /// Linear scan from heap_start; the first qualifying block wins
    fn first_fit(&self, block_size: Size) -> Option<Address> {
        let mut current = self.heap_start;

        while current < self.heap_end {
            let size = self.size_at(current);
            if size == 0 {
                error!("Zero-size tag at {:#x} during scan, aborting", current);
                return None;
            }
            if self.status_at(current) == BlockStatus::Free && size >= block_size {
                return Some(current);
            }
            current += size;
        }

        None
    }

    /// Linear scan from the persistent cursor, wrapping once.
    ///
    /// The cursor resets to heap_start when unset or past heap_end, and stays
    /// where the scan stopped so repeated allocations spread across the arena.
    fn next_fit(&mut self, block_size: Size) -> Option<Address> {
        let mut current = match self.cursor {
            Some(cursor) if cursor < self.heap_end => cursor,
            _ => self.heap_start,
        };
        let origin = current;

        loop {
            let size = self.size_at(current);
            if size == 0 {
                error!("Zero-size tag at {:#x} during scan, aborting", current);
                return None;
            }
            if self.status_at(current) == BlockStatus::Free && size >= block_size {
                self.cursor = Some(current);
                return Some(current);
            }

            current += size;
            if current >= self.heap_end {
                current = self.heap_start;
            }
            if current == origin {
                break;
            }
        }

        self.cursor = Some(current);
        None
    }

    /// Full scan tracking the minimum slack; ties go to the lowest address
    /// and an exact fit ends the scan early
    fn best_fit(&self, block_size: Size) -> Option<Address> {
        let mut best: Option<Address> = None;
        let mut smallest_slack = Size::MAX;

        let mut current = self.heap_start;
        while current < self.heap_end {
            let size = self.size_at(current);
            if size == 0 {
                error!("Zero-size tag at {:#x} during scan, aborting", current);
                return None;
            }
            if self.status_at(current) == BlockStatus::Free && size >= block_size {
                let slack = size - block_size;
                if slack < smallest_slack {
                    best = Some(current);
                    smallest_slack = slack;
                    if slack == 0 {
                        break;
                    }
                }
            }
            current += size;
        }

        best
    }
}
