//! Default values for conversion
//!
//! Used whenever neither the command line nor the MIDI file supplies a value.

use crate::models::TimeSignature;

/// Default quantize grid as a note denominator (32 => 1/32 notes)
pub const DEFAULT_GRID: u32 = 32;

/// Default tempo in beats per minute
pub const DEFAULT_TEMPO_BPM: f64 = 120.0;

/// Default meter
pub const DEFAULT_TIME_SIGNATURE: TimeSignature = TimeSignature::new(4, 4);

/// Default instrument label shown in the score
pub const DEFAULT_INSTRUMENT: &str = "Gayageum (solo)";

/// Default work title when none is given
pub const DEFAULT_TITLE: &str = "Gayageum solo (from MIDI)";

/// MIDI channel 10 (index 9) carries General MIDI percussion
pub const PERCUSSION_CHANNEL: u8 = 9;

/// Suffix inserted before the extension of the default output file
pub const OUTPUT_SUFFIX: &str = "_gayageum";

/// Extension of the default output file
pub const OUTPUT_EXTENSION: &str = "musicxml";

/// Title used when converting a named input file
pub fn title_for_input(file_name: &str) -> String {
    format!("{} — {}", DEFAULT_TITLE, file_name)
}
