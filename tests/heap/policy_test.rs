/*!
 * Selection Policy Tests
 * First-fit, next-fit, and best-fit behavior over crafted hole patterns
 */

use crate::common::small_heap;
use pretty_assertions::assert_eq;
use tagheap::Policy;

#[test]
fn first_fit_reuses_the_lowest_hole() {
    let mut heap = small_heap(Policy::FirstFit);

    // Scenario B: allocate A, free A, allocate a smaller B
    let a = heap.allocate(100).unwrap();
    heap.release(Some(a));

    let b = heap.allocate(50).unwrap();
    assert_eq!(b, a);
}

#[test]
fn first_fit_skips_too_small_holes() {
    let mut heap = small_heap(Policy::FirstFit);

    let a = heap.allocate(16).unwrap(); // 32-byte block
    let b = heap.allocate(200).unwrap(); // 224-byte block
    let _pin = heap.allocate(16).unwrap();
    heap.release(Some(a));
    heap.release(Some(b));

    // 100 bytes needs a 128-byte block; the 32-byte hole at the front loses
    let c = heap.allocate(100).unwrap();
    assert_eq!(c, b);
}

#[test]
fn next_fit_resumes_scanning_from_the_cursor() {
    let mut heap = small_heap(Policy::NextFit);

    let p1 = heap.allocate(16).unwrap();
    let _p2 = heap.allocate(16).unwrap();
    let _p3 = heap.allocate(16).unwrap();
    heap.release(Some(p1));

    // The cursor rests past p3; the hole left by p1 is behind it
    let p4 = heap.allocate(16).unwrap();
    assert_ne!(p4, p1);
    assert_eq!(p4, 136); // first block after the three 32-byte blocks

    let first = heap.check_consistency().unwrap().blocks[0].clone();
    assert_eq!(first.offset, 32);
    assert_eq!(first.status, tagheap::BlockStatus::Free);
}

#[test]
fn next_fit_wraps_around_to_earlier_holes() {
    let mut heap = small_heap(Policy::NextFit);

    let p1 = heap.allocate(16).unwrap();
    let _p2 = heap.allocate(16).unwrap();
    let _p3 = heap.allocate(16).unwrap();
    let _p4 = heap.allocate(830).unwrap(); // 864-byte block, arena now full
    heap.release(Some(p1));

    // Nothing free ahead of the cursor, so the scan must wrap to the hole
    let p5 = heap.allocate(16).unwrap();
    assert_eq!(p5, p1);
}

#[test]
fn best_fit_prefers_the_tightest_hole() {
    let mut heap = small_heap(Policy::BestFit);

    let a = heap.allocate(200).unwrap(); // 224-byte block
    let _b = heap.allocate(16).unwrap();
    let c = heap.allocate(100).unwrap(); // 128-byte block
    let _d = heap.allocate(16).unwrap();
    heap.release(Some(a));
    heap.release(Some(c));

    // 100 bytes needs exactly a 128-byte block: c's hole fits with zero
    // slack, a's would leave 96 bytes
    let e = heap.allocate(100).unwrap();
    assert_eq!(e, c);

    // Next-tightest is a's 224-byte hole
    let f = heap.allocate(100).unwrap();
    assert_eq!(f, a);
}

#[test]
fn best_fit_breaks_ties_toward_the_lowest_address() {
    let mut heap = small_heap(Policy::BestFit);

    let a = heap.allocate(100).unwrap(); // 128-byte block
    let _b = heap.allocate(16).unwrap();
    let c = heap.allocate(100).unwrap(); // 128-byte block
    let _d = heap.allocate(16).unwrap();
    heap.release(Some(a));
    heap.release(Some(c));

    // Both holes fit a 64-byte request equally badly; the lower one wins
    let e = heap.allocate(40).unwrap();
    assert_eq!(e, a);
}

#[test]
fn all_policies_fall_back_to_growth_when_nothing_fits() {
    for policy in [Policy::FirstFit, Policy::NextFit, Policy::BestFit] {
        let mut heap = small_heap(policy);
        let end_before = heap.heap_end();

        let addr = heap.allocate(2000).unwrap();
        assert!(heap.payload(addr).len() >= 2000);
        assert!(heap.heap_end() > end_before);
        assert!(heap.check_consistency().unwrap().coherent);
    }
}
