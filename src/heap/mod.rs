/*!
 * Heap Module
 * Implicit free-list allocator with boundary tags
 */

pub mod manager;
pub mod tag;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use manager::HeapManager;
pub use traits::{Allocator, HeapIntrospect};
pub use types::{
    BlockInfo, BlockStatus, ConsistencyReport, DiagnosticLevel, HeapError, HeapResult, HeapStats,
    Policy,
};
