//! Standard MIDI File decoding
//!
//! Turns raw SMF bytes into ticks-per-quarter, per-track metadata and a flat
//! list of sounding notes. Only metrical (ticks-per-quarter) timing is
//! supported; SMPTE divisions are rejected.
//!
//! # Module Structure
//!
//! - **model**: Decoded data (`DecodedSmf`, `TrackMeta`, `NoteEvent`)
//! - **varlen**: Variable-length quantity reading/encoding
//! - **decoder**: Chunk walking and per-track event state machine

mod decoder;
mod model;
pub mod varlen;

pub use decoder::decode_smf;
pub use model::*;

use thiserror::Error;

/// Structural failures while decoding an SMF byte stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("expected chunk tag {expected:?} at byte {offset}, found {found:?}")]
    BadTag {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("header chunk length {0} is shorter than the 6 required bytes")]
    ShortHeader(u32),

    #[error("SMPTE time division 0x{0:04X} is not supported")]
    SmpteDivision(u16),

    #[error("ticks-per-quarter division is zero")]
    ZeroDivision,

    #[error("unexpected end of data at byte {offset}")]
    Truncated { offset: usize },

    #[error("variable-length quantity at byte {offset} is longer than 4 bytes")]
    VarlenTooLong { offset: usize },

    #[error("track time overflows at byte {offset}")]
    TickOverflow { offset: usize },

    #[error("unknown MIDI status byte 0x{status:02X} at byte {offset}")]
    UnknownStatus { status: u8, offset: usize },

    #[error("running status at byte {offset} before any status byte")]
    RunningStatusWithoutStatus { offset: usize },
}

pub type Result<T> = std::result::Result<T, DecodeError>;
