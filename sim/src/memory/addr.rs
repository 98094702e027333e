//! Virtual address decoding
//!
//! Splits a virtual byte address into (page, offset) using the power-of-two
//! page size. Pure; a range violation is reported to the caller and nothing
//! else happens.

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};

/// Split `addr` into a page index and the byte offset within that page.
/// `addr` must lie in `[0, total_size)`.
pub fn decode(addr: i64, cfg: &SimConfig) -> SimResult<(usize, usize)> {
    if addr < 0 || addr >= cfg.total_size() as i64 {
        return Err(SimError::AddressRange(addr));
    }
    let a = addr as usize;
    Ok((a >> cfg.page_shift(), a & (cfg.page_size - 1)))
}
