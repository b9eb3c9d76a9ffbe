/*!
 * Heap Traits
 * Allocator abstractions
 */

use super::manager::HeapManager;
use super::types::{ConsistencyReport, HeapResult, HeapStats};
use crate::core::types::{Address, Size};
use crate::segment::Segment;

/// Heap allocator interface
pub trait Allocator {
    /// Allocate a payload of at least `size` bytes
    fn allocate(&mut self, size: Size) -> HeapResult<Address>;

    /// Allocate `count * elem_size` bytes and zero-fill the payload
    fn zero_allocate(&mut self, count: Size, elem_size: Size) -> HeapResult<Address>;

    /// Resize an allocation; `None` behaves as allocate
    fn resize(&mut self, addr: Option<Address>, size: Size) -> HeapResult<Address>;

    /// Release an allocation; `None` and already-free blocks are no-ops
    fn release(&mut self, addr: Option<Address>);
}

/// Heap diagnostics provider
pub trait HeapIntrospect {
    /// Get overall heap statistics
    fn stats(&self) -> HeapStats;

    /// Walk every block and validate the boundary-tag invariants
    fn check_consistency(&self) -> HeapResult<ConsistencyReport>;
}

impl<S: Segment> Allocator for HeapManager<S> {
    fn allocate(&mut self, size: Size) -> HeapResult<Address> {
        HeapManager::allocate(self, size)
    }

    fn zero_allocate(&mut self, count: Size, elem_size: Size) -> HeapResult<Address> {
        HeapManager::zero_allocate(self, count, elem_size)
    }

    fn resize(&mut self, addr: Option<Address>, size: Size) -> HeapResult<Address> {
        HeapManager::resize(self, addr, size)
    }

    fn release(&mut self, addr: Option<Address>) {
        HeapManager::release(self, addr);
    }
}

impl<S: Segment> HeapIntrospect for HeapManager<S> {
    fn stats(&self) -> HeapStats {
        HeapManager::stats(self)
    }

    fn check_consistency(&self) -> HeapResult<ConsistencyReport> {
        HeapManager::check_consistency(self)
    }
}
