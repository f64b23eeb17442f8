//! Gayageum Score
//!
//! Converts Standard MIDI Files into single-staff MusicXML scores for solo
//! gayageum. The most melodic track is picked, snapped to a grid, reduced to
//! one voice and laid out in measures.

pub mod analysis;
pub mod config;
pub mod converters;
pub mod dataset;
pub mod errors;
pub mod ir;
pub mod job;
pub mod midi;
pub mod models;
pub mod quantize;
pub mod renderers;

// Re-export commonly used types
pub use config::ConversionSettings;
pub use converters::{convert_file, convert_midi_to_musicxml, ConversionReport, ConversionResult};
pub use errors::{ConversionError, Result};
pub use models::TimeSignature;
