/*!
 * Heap Manager
 * Arena state, boundary-tag navigation, and initialization
 *
 * The arena lives inside a growable data segment. All metadata is
 * self-describing: a block's size and status sit in its header word and are
 * duplicated in its footer word, so navigation works in both directions.
 * Zero-size allocated sentinel half-blocks bracket the arena and stop
 * coalescing from walking out of bounds.
 */

mod allocator;
mod check;
mod policy;
mod resize;

use super::tag::{self, MIN_BLOCK, WORD_SIZE};
use super::types::{BlockStatus, DiagnosticLevel, HeapStats, Policy};
use crate::core::limits::{DEFAULT_CHUNK_SIZE, DEFAULT_SHRINK_THRESHOLD};
use crate::core::types::{Address, Size, Word};
use crate::segment::Segment;
use log::info;

/// Boundary-tag heap allocator over a data segment.
///
/// Owns the segment for its whole lifetime; a second heap over the same
/// memory is therefore impossible by construction. Single-threaded by
/// design: every operation is a bounded synchronous computation.
#[derive(Debug)]
pub struct HeapManager<S: Segment> {
    segment: S,
    /// Logical arena bounds, both MIN_BLOCK-aligned
    heap_start: Address,
    heap_end: Address,
    policy: Policy,
    /// Next-fit scan cursor; reset lazily when it leaves the arena
    cursor: Option<Address>,
    chunk_size: Size,
    shrink_threshold: Size,
    diag_level: DiagnosticLevel,
}

impl<S: Segment> HeapManager<S> {
    /// Initialize a heap over a fresh data segment.
    ///
    /// # Panics
    /// Panics if the segment is dirty (its break differs from its start), if
    /// it reports a zero page size, or if the initial growth fails. These are
    /// programming errors, not runtime conditions to recover from.
    pub fn init(segment: S, policy: Policy) -> Self {
        Self::with_config(segment, policy, DEFAULT_CHUNK_SIZE, DEFAULT_SHRINK_THRESHOLD)
    }

    /// Initialize with custom growth and shrink tuning (useful for testing
    /// growth and shrink paths with small arenas)
    pub fn with_config(
        mut segment: S,
        policy: Policy,
        chunk_size: Size,
        shrink_threshold: Size,
    ) -> Self {
        assert_eq!(
            segment.start(),
            segment.brk(),
            "heap not clean: segment break differs from segment start"
        );
        assert!(segment.page_size() > 0, "segment reported zero page size");
        assert!(
            chunk_size >= 4 * MIN_BLOCK,
            "chunk size too small to hold the sentinels and one block"
        );
        assert_eq!(
            chunk_size % MIN_BLOCK,
            0,
            "chunk size must be a MIN_BLOCK multiple so growth yields whole blocks"
        );

        let start = segment.start();
        let brk = match segment.sbrk(chunk_size as isize) {
            Some(brk) => brk,
            None => panic!("initial segment growth of {chunk_size} bytes failed"),
        };

        // Round the arena inward so both bounds sit on MIN_BLOCK boundaries,
        // leaving room for one sentinel word on each side.
        let heap_start = (start / MIN_BLOCK + 1) * MIN_BLOCK;
        let heap_end = (brk - WORD_SIZE) / MIN_BLOCK * MIN_BLOCK;

        let mut heap = Self {
            segment,
            heap_start,
            heap_end,
            policy,
            cursor: None,
            chunk_size,
            shrink_threshold,
            diag_level: DiagnosticLevel::Off,
        };

        // Left sentinel, one spanning free block, right sentinel
        heap.store(heap_start - WORD_SIZE, tag::pack(0, BlockStatus::Allocated));
        heap.write_block(heap_start, heap_end - heap_start, BlockStatus::Free);
        heap.store(heap_end, tag::pack(0, BlockStatus::Allocated));

        info!(
            "Heap initialized with {} policy: arena [{:#x}, {:#x}), {} bytes free",
            policy,
            heap_start,
            heap_end,
            heap_end - heap_start
        );

        heap
    }

    /// Logical start of the arena
    pub fn heap_start(&self) -> Address {
        self.heap_start
    }

    /// Logical end of the arena (location of the right sentinel)
    pub fn heap_end(&self) -> Address {
        self.heap_end
    }

    /// Active selection policy
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Arena size in bytes
    pub fn arena_size(&self) -> Size {
        self.heap_end - self.heap_start
    }

    /// Set diagnostic verbosity for subsequent operations
    pub fn set_diagnostic_level(&mut self, level: DiagnosticLevel) {
        self.diag_level = level;
    }

    /// Underlying data segment
    pub fn segment(&self) -> &S {
        &self.segment
    }

    /// Underlying data segment, mutable
    pub fn segment_mut(&mut self) -> &mut S {
        &mut self.segment
    }

    /// Payload bytes of an allocated block
    pub fn payload(&self, addr: Address) -> &[u8] {
        let header = addr - WORD_SIZE;
        debug_assert!(header >= self.heap_start && header < self.heap_end);
        let size = self.size_at(header);
        &self.segment.bytes()[addr..header + size - WORD_SIZE]
    }

    /// Payload bytes of an allocated block, mutable
    pub fn payload_mut(&mut self, addr: Address) -> &mut [u8] {
        let header = addr - WORD_SIZE;
        debug_assert!(header >= self.heap_start && header < self.heap_end);
        let size = self.size_at(header);
        &mut self.segment.bytes_mut()[addr..header + size - WORD_SIZE]
    }

    /// Heap statistics from a full block walk
    pub fn stats(&self) -> HeapStats {
        let mut stats = HeapStats {
            heap_start: self.heap_start,
            heap_end: self.heap_end,
            arena_size: self.arena_size(),
            free_bytes: 0,
            allocated_bytes: 0,
            free_blocks: 0,
            allocated_blocks: 0,
            policy: self.policy,
        };

        let mut cur = self.heap_start;
        while cur < self.heap_end {
            let size = self.size_at(cur);
            if size == 0 {
                break; // corrupt tag; the consistency checker reports these
            }
            match self.status_at(cur) {
                BlockStatus::Free => {
                    stats.free_bytes += size;
                    stats.free_blocks += 1;
                }
                BlockStatus::Allocated => {
                    stats.allocated_bytes += size;
                    stats.allocated_blocks += 1;
                }
            }
            cur += size;
        }

        stats
    }

    // ---- boundary-tag word access -------------------------------------

    /// Read the heap word at a byte offset
    pub(super) fn load(&self, offset: Address) -> Word {
        let bytes = &self.segment.bytes()[offset..offset + WORD_SIZE];
        Word::from_ne_bytes(bytes.try_into().expect("word-sized slice"))
    }

    /// Write the heap word at a byte offset
    pub(super) fn store(&mut self, offset: Address, value: Word) {
        let bytes = &mut self.segment.bytes_mut()[offset..offset + WORD_SIZE];
        bytes.copy_from_slice(&value.to_ne_bytes());
    }

    /// Block size read from the tag at `offset`
    pub(super) fn size_at(&self, offset: Address) -> Size {
        tag::size(self.load(offset))
    }

    /// Block status read from the tag at `offset`
    pub(super) fn status_at(&self, offset: Address) -> BlockStatus {
        tag::status(self.load(offset))
    }

    /// Write matching header and footer for a block
    pub(super) fn write_block(&mut self, header: Address, size: Size, status: BlockStatus) {
        let word = tag::pack(size, status);
        self.store(header, word);
        self.store(header + size - WORD_SIZE, word);
    }

    /// Header of the block following the one at `header`
    pub(super) fn next_block(&self, header: Address) -> Address {
        header + self.size_at(header)
    }

    /// Re-point the next-fit cursor when a merge swallowed the block it was
    /// resting on; a mid-block cursor would otherwise read payload bytes as a
    /// tag on the next scan.
    pub(super) fn retarget_cursor(&mut self, merged_header: Address, merged_size: Size) {
        if let Some(cursor) = self.cursor {
            if cursor > merged_header && cursor < merged_header + merged_size {
                self.cursor = Some(merged_header);
            }
        }
    }

    pub(super) fn diag_level(&self) -> DiagnosticLevel {
        self.diag_level
    }
}
