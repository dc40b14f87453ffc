//! Memory prefaulting.
//!
//! Touches memory up front so that first-access page faults happen before
//! timed work instead of during it.

use std::hint::black_box;

use tracing::debug;

use crate::error::TunerError;

const PAGE: usize = 4096;

/// Largest stack region [`prefault_stack`] will touch.
pub const MAX_STACK_PREFAULT_KB: usize = 1024;

/// Touches `size_kb` KB of the calling thread's stack, one page per frame.
///
/// Requests above [`MAX_STACK_PREFAULT_KB`] are clamped. Returns the number
/// of bytes touched.
pub fn prefault_stack(size_kb: usize) -> usize {
    let pages = (size_kb.min(MAX_STACK_PREFAULT_KB) * 1024).div_ceil(PAGE);
    touch_stack_pages(pages);
    debug!(pages, "stack prefaulted");
    pages * PAGE
}

#[inline(never)]
fn touch_stack_pages(remaining: usize) {
    if remaining == 0 {
        return;
    }
    let mut page = [0u8; PAGE];
    page[0] = 1;
    page[PAGE - 1] = 1;
    black_box(&mut page);
    touch_stack_pages(remaining - 1);
}

/// Allocates `size_mb` MB, writes every byte, and releases it.
///
/// Returns the number of bytes touched. A size that overflows `usize` or
/// cannot be reserved is an error; allocation failure never aborts.
pub fn prefault_heap(size_mb: usize) -> Result<usize, TunerError> {
    let bytes = size_mb
        .checked_mul(1024 * 1024)
        .ok_or_else(|| TunerError::Prefault {
            size_mb,
            reason: "size overflows the address space".to_string(),
        })?;
    if bytes == 0 {
        return Ok(0);
    }

    let mut buffer: Vec<u8> = Vec::new();
    buffer
        .try_reserve_exact(bytes)
        .map_err(|err| TunerError::Prefault {
            size_mb,
            reason: err.to_string(),
        })?;
    buffer.resize(bytes, 0xA5);
    black_box(&buffer);
    debug!(size_mb, "heap prefaulted");
    Ok(bytes)
}
