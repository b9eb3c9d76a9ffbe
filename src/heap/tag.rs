/*!
 * Boundary Tags
 * Size and status packed into one heap word, duplicated as header and footer
 */

use super::types::BlockStatus;
use crate::core::types::{Size, Word};

/// Width of a heap word; headers and footers are one word each
pub const WORD_SIZE: Size = std::mem::size_of::<Word>();

/// Minimum block size: header + footer + two payload words.
/// Every block size is a multiple of this, so block starts stay aligned.
pub const MIN_BLOCK: Size = 32;

/// Low bits of a tag carry the block status
pub const STATUS_MASK: Word = 0x7;

/// Remaining bits carry the block size in bytes
pub const SIZE_MASK: Word = !STATUS_MASK;

/// Pack a block size and status into a tag word
pub fn pack(size: Size, status: BlockStatus) -> Word {
    debug_assert_eq!(size % MIN_BLOCK, 0, "block size must be a MIN_BLOCK multiple");
    size as Word | status as Word
}

/// Extract the block size from a tag word
pub fn size(tag: Word) -> Size {
    (tag & SIZE_MASK) as Size
}

/// Extract the block status from a tag word
pub fn status(tag: Word) -> BlockStatus {
    if tag & STATUS_MASK == 0 {
        BlockStatus::Free
    } else {
        BlockStatus::Allocated
    }
}

/// Round a byte count up to the next MIN_BLOCK multiple
pub fn round_up(size: Size) -> Size {
    (size + MIN_BLOCK - 1) / MIN_BLOCK * MIN_BLOCK
}

/// Round a byte count up to the next MIN_BLOCK multiple, or `None` when the
/// rounding itself would overflow
pub fn checked_round_up(size: Size) -> Option<Size> {
    size.checked_add(MIN_BLOCK - 1).map(|n| n / MIN_BLOCK * MIN_BLOCK)
}
