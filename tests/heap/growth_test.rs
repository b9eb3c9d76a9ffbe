/*!
 * Growth and Shrink Tests
 * Arena extension under pressure and memory returned to the segment
 */

use crate::common::small_heap;
use pretty_assertions::assert_eq;
use tagheap::{BlockStatus, Policy, Segment};

#[test]
fn growth_extends_the_arena_by_at_least_one_chunk() {
    let mut heap = small_heap(Policy::FirstFit);

    // Fill the arena exactly: 944 + header + footer = the 960-byte block
    let full = heap.allocate(944).unwrap();
    assert_eq!(heap.stats().free_bytes, 0);

    let end_before = heap.heap_end();
    let addr = heap.allocate(16).unwrap();
    assert!(addr > full);

    // One chunk of growth, minus alignment at the new break
    assert_eq!(heap.heap_end(), end_before + 1024);
    assert!(heap.check_consistency().unwrap().coherent);
}

#[test]
fn growth_absorbs_the_old_trailing_free_block() {
    // Scenario D: the block formed by growth equals the old trailing free
    // space plus the growth increment
    let mut heap = small_heap(Policy::FirstFit);

    let _a = heap.allocate(900).unwrap(); // 928-byte block, 32 bytes left free
    assert_eq!(heap.stats().free_bytes, 32);

    let b = heap.allocate(100).unwrap(); // forces a 1024-byte growth
    assert_eq!(b, 960 + 8); // handed out from the merged 32 + 1024 block

    let report = heap.check_consistency().unwrap();
    assert!(report.coherent);
    assert_eq!(report.blocks.len(), 3);
    assert_eq!(report.blocks[1].offset, 960);
    assert_eq!(report.blocks[1].size, 128);
    assert_eq!(report.blocks[2].size, 32 + 1024 - 128);
    assert_eq!(report.blocks[2].status, BlockStatus::Free);
}

#[test]
fn growth_request_covers_oversized_blocks() {
    let mut heap = small_heap(Policy::FirstFit);

    // Far larger than one chunk: growth must use the block size instead
    let addr = heap.allocate(5000).unwrap();
    assert!(heap.payload(addr).len() >= 5000);
    assert!(heap.check_consistency().unwrap().coherent);
}

#[test]
fn large_trailing_free_block_shrinks_the_heap() {
    let mut heap = small_heap(Policy::FirstFit);

    let keep = heap.allocate(944).unwrap(); // pins the original arena
    let big = heap.allocate(1000).unwrap(); // grown 1024-byte block at the top

    let end_grown = heap.heap_end();
    let brk_grown = heap.segment().brk();
    assert_eq!(end_grown, 2016);

    heap.release(Some(big));

    // The freed 1024-byte block ended at heap_end and met the 1KB threshold
    assert_eq!(heap.heap_end(), end_grown - 1024);
    assert_eq!(heap.segment().brk(), brk_grown - 1024);

    let report = heap.check_consistency().unwrap();
    assert!(report.coherent);
    assert_eq!(report.blocks.len(), 1);
    assert_eq!(report.blocks[0].status, BlockStatus::Allocated);

    heap.release(Some(keep));
    assert!(heap.check_consistency().unwrap().coherent);
}

#[test]
fn small_trailing_free_block_is_kept() {
    let mut heap = small_heap(Policy::FirstFit);

    let a = heap.allocate(100).unwrap();
    let end_before = heap.heap_end();
    heap.release(Some(a));

    // 960 bytes free at the top, below the 1KB shrink threshold
    assert_eq!(heap.heap_end(), end_before);
    assert_eq!(heap.stats().free_bytes, 960);
}

#[test]
fn allocation_still_works_after_a_shrink() {
    let mut heap = small_heap(Policy::FirstFit);

    let keep = heap.allocate(944).unwrap();
    let big = heap.allocate(2000).unwrap();
    heap.release(Some(big)); // shrinks by 2016 bytes

    let addr = heap.allocate(500).unwrap();
    assert!(heap.payload(addr).len() >= 500);
    assert!(heap.check_consistency().unwrap().coherent);

    heap.release(Some(addr));
    heap.release(Some(keep));
}
