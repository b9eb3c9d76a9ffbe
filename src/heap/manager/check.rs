/*!
 * Heap Consistency Checker
 * Independent full-heap walk validating the boundary-tag invariants
 *
 * Diagnostic tool, not a recovery mechanism: a tag that makes further
 * traversal unsafe aborts the walk with `CorruptionDetected`.
 */

use super::HeapManager;
use crate::heap::tag::WORD_SIZE;
use crate::heap::types::{
    BlockInfo, BlockStatus, ConsistencyReport, DiagnosticLevel, HeapError, HeapResult,
};
use crate::segment::Segment;
use log::{error, info, warn};

impl<S: Segment> HeapManager<S> {
    /// Walk every block from heap_start to heap_end and validate that each
    /// header equals its footer.
    ///
    /// Traversal-safe rule violations (adjacent free blocks, damaged
    /// sentinels) are counted in the report; a header/footer mismatch or a
    /// zero-size block aborts the walk with an error. Read-only, so two
    /// consecutive calls without intervening mutation yield equal reports.
    pub fn check_consistency(&self) -> HeapResult<ConsistencyReport> {
        let mut report = ConsistencyReport {
            blocks: Vec::new(),
            errors: 0,
            coherent: false,
            free_bytes: 0,
            allocated_bytes: 0,
        };

        if self.diag_level() >= DiagnosticLevel::Verbose {
            info!(
                "Heap check: arena [{:#x}, {:#x}), {} policy",
                self.heap_start(),
                self.heap_end(),
                self.policy()
            );
        }

        // Sentinel half-blocks must read as zero-size and allocated
        for offset in [self.heap_start() - WORD_SIZE, self.heap_end()] {
            if self.size_at(offset) != 0 || self.status_at(offset) != BlockStatus::Allocated {
                warn!("Damaged sentinel at {:#x}: {:#x}", offset, self.load(offset));
                report.errors += 1;
            }
        }

        let mut previous_free = false;
        let mut current = self.heap_start();

        while current < self.heap_end() {
            let header = self.load(current);
            let size = self.size_at(current);
            let status = self.status_at(current);

            if size == 0 {
                error!("Zero-size block at {:#x}, traversal unsafe", current);
                return Err(HeapError::CorruptionDetected {
                    offset: current,
                    detail: format!("zero-size block (header {header:#x})"),
                });
            }
            if current + size > self.heap_end() {
                error!("Block at {:#x} overruns heap end, traversal unsafe", current);
                return Err(HeapError::CorruptionDetected {
                    offset: current,
                    detail: format!("block of {size} bytes overruns heap end"),
                });
            }

            let footer = self.load(current + size - WORD_SIZE);
            if footer != header {
                error!(
                    "Footer mismatch at {:#x}: header {:#x}, footer {:#x}",
                    current, header, footer
                );
                return Err(HeapError::CorruptionDetected {
                    offset: current,
                    detail: format!("footer {footer:#x} disagrees with header {header:#x}"),
                });
            }

            if status == BlockStatus::Free {
                if previous_free {
                    warn!("Adjacent free blocks at {:#x}: coalescing was missed", current);
                    report.errors += 1;
                }
                report.free_bytes += size;
            } else {
                report.allocated_bytes += size;
            }

            if self.diag_level() >= DiagnosticLevel::Verbose {
                info!(
                    "  {:#010x}  offset {:#8x}  size {:8}  payload {:8}  {}",
                    current,
                    current - self.heap_start(),
                    size,
                    size - 2 * WORD_SIZE,
                    status
                );
            }

            report.blocks.push(BlockInfo {
                offset: current,
                size,
                payload_size: size - 2 * WORD_SIZE,
                status,
            });

            previous_free = status == BlockStatus::Free;
            current += size;
        }

        report.coherent = current == self.heap_end() && report.errors == 0;

        if self.diag_level() >= DiagnosticLevel::Info {
            info!(
                "Heap check complete: {} blocks, {} errors, structure {}",
                report.blocks.len(),
                report.errors,
                if report.coherent { "coherent" } else { "incoherent" }
            );
        }

        Ok(report)
    }
}
