/*!
 * Segment Module
 * Growable address-range provider boundary
 */

mod dataseg;

pub use dataseg::DataSegment;

use crate::core::types::{Address, Size};

/// Growable address-range provider.
///
/// Supplies a contiguous byte range `[start, brk)` that can grow or shrink at
/// its high end. Addresses are byte offsets into the range, so `start` is 0
/// for an owned segment and `brk` is the current length.
pub trait Segment {
    /// Current low bound of the range
    fn start(&self) -> Address;

    /// Current break (one past the highest usable byte)
    fn brk(&self) -> Address;

    /// System page size of the underlying memory
    fn page_size(&self) -> Size;

    /// Extend (positive delta) or shrink (negative delta) the range.
    ///
    /// Returns the new break, or `None` if the underlying resource is
    /// exhausted or the delta would move the break below `start`. A failed
    /// call leaves the range unchanged.
    fn sbrk(&mut self, delta: isize) -> Option<Address>;

    /// Current range contents
    fn bytes(&self) -> &[u8];

    /// Current range contents, mutable
    fn bytes_mut(&mut self) -> &mut [u8];
}
