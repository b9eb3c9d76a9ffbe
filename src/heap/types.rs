/*!
 * Heap Types
 * Common types for the boundary-tag allocator
 */

use crate::core::types::{Address, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Heap operation result
pub type HeapResult<T> = Result<T, HeapError>;

/// Heap errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeapError {
    #[error("Out of memory: requested {requested} bytes, segment refused to grow by {grow_by} bytes (arena {arena} bytes)")]
    OutOfMemory {
        requested: Size,
        grow_by: Size,
        arena: Size,
    },

    #[error("Zero-size allocation request")]
    ZeroSize,

    #[error("Allocation size overflow: {count} elements of {elem_size} bytes")]
    Overflow { count: Size, elem_size: Size },

    #[error("Allocation of {requested} bytes overflows the block size arithmetic")]
    SizeTooLarge { requested: Size },

    #[error("Heap corruption detected at {offset:#x}: {detail}")]
    CorruptionDetected { offset: Address, detail: String },
}

/// Block status carried in the low bits of a boundary tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockStatus {
    Free = 0,
    Allocated = 1,
}

impl std::fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BlockStatus::Free => write!(f, "free"),
            BlockStatus::Allocated => write!(f, "allocated"),
        }
    }
}

/// Free-block selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    /// Linear scan from heap start, first qualifying block wins
    FirstFit,
    /// Linear scan from a persistent cursor, wrapping once
    NextFit,
    /// Full scan, tightest qualifying block wins (ties to the lowest address)
    BestFit,
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Policy::FirstFit => write!(f, "first fit"),
            Policy::NextFit => write!(f, "next fit"),
            Policy::BestFit => write!(f, "best fit"),
        }
    }
}

/// Diagnostic verbosity for heap operations and the consistency checker
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    #[default]
    Off,
    Info,
    /// Also log the per-block table during consistency checks
    Verbose,
}

/// One block as seen by the consistency walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub offset: Address,
    pub size: Size,
    pub payload_size: Size,
    pub status: BlockStatus,
}

/// Result of a full-heap consistency walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub blocks: Vec<BlockInfo>,
    /// Rule violations that did not make traversal unsafe
    pub errors: usize,
    /// True when the walk covered exactly the arena with no violations
    pub coherent: bool,
    pub free_bytes: Size,
    pub allocated_bytes: Size,
}

/// Heap statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapStats {
    pub heap_start: Address,
    pub heap_end: Address,
    pub arena_size: Size,
    pub free_bytes: Size,
    pub allocated_bytes: Size,
    pub free_blocks: usize,
    pub allocated_blocks: usize,
    pub policy: Policy,
}
