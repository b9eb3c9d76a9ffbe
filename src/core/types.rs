/*!
 * Core Types
 * Common types used across the crate
 */

/// Byte offset into the data segment; the allocator's notion of an address
pub type Address = usize;

/// Size type for heap operations
pub type Size = usize;

/// Heap word: boundary tags are one word wide
pub type Word = u64;
