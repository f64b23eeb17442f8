//! Format converters
//!
//! Pipelines from an input format to a rendered score.

pub mod midi_to_musicxml;

pub use midi_to_musicxml::{
    convert_file, convert_midi_to_musicxml, ConversionReport, ConversionResult,
};
