//! Models module
//!
//! Small value types shared by the decoder, the configuration layer and the
//! score builder.

pub mod time_signature;

// Re-export commonly used types
pub use time_signature::TimeSignature;
