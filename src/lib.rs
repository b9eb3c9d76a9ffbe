/*!
 * Tagheap Library
 * Boundary-tag heap allocator over a growable data segment
 */

pub mod core;
pub mod heap;
pub mod segment;

// Re-exports
pub use heap::{
    Allocator, BlockInfo, BlockStatus, ConsistencyReport, DiagnosticLevel, HeapError,
    HeapIntrospect, HeapManager, HeapResult, HeapStats, Policy,
};
pub use segment::{DataSegment, Segment};
