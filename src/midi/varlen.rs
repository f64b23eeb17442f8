//! MIDI variable-length quantities
//!
//! Seven data bits per byte, most-significant group first; the top bit of
//! each byte flags that another byte follows.

use super::{DecodeError, Result};

/// Longest quantity a Standard MIDI File may hold (0x0FFFFFFF)
pub const MAX_VARLEN_BYTES: usize = 4;

/// Read a variable-length quantity starting at `offset`.
///
/// Returns the decoded value and the offset just past its last byte.
pub fn read_varlen(data: &[u8], offset: usize) -> Result<(u64, usize)> {
    let mut value = 0u64;
    let mut idx = offset;
    loop {
        if idx - offset == MAX_VARLEN_BYTES {
            return Err(DecodeError::VarlenTooLong { offset });
        }
        let byte = *data.get(idx).ok_or(DecodeError::Truncated { offset: idx })?;
        idx += 1;
        value = (value << 7) | u64::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok((value, idx));
        }
    }
}

/// Encode a value as a variable-length quantity
pub fn encode_varlen(value: u64) -> Vec<u8> {
    let mut groups = vec![(value & 0x7F) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        groups.push(((rest & 0x7F) as u8) | 0x80);
        rest >>= 7;
    }
    groups.reverse();
    groups
}
