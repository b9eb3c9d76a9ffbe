/*!
 * Heap Limits and Constants
 *
 * Centralized location for the allocator's tunable thresholds.
 */

use crate::core::types::Size;

/// Minimum data segment growth increment (1KB)
/// The heap never asks the provider for less than this at a time
pub const DEFAULT_CHUNK_SIZE: Size = 1 << 10;

/// Trailing free block size that triggers returning memory to the provider (1KB)
pub const DEFAULT_SHRINK_THRESHOLD: Size = 1 << 10;

/// Default capacity cap for the in-crate data segment (16MB)
/// Growth past this point reports exhaustion, simulating a spent OS resource
pub const DEFAULT_SEGMENT_CAPACITY: Size = 16 * 1024 * 1024;

/// Page size reported by the in-crate data segment (4KB)
pub const DEFAULT_PAGE_SIZE: Size = 4096;
