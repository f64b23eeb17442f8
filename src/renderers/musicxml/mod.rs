//! MusicXML export module
//!
//! Renders a `crate::ir::ScoreDocument` as MusicXML 3.1 partwise text.
//!
//! # Module Structure
//!
//! - **emitter**: Document walk producing the XML text (quick-xml writer)
//! - **duration**: Division counts to note type and dots
//! - **pitch**: MIDI note numbers to step/alter/octave and note names

pub mod duration;
pub mod emitter;
pub mod pitch;

pub use duration::{duration_to_type_and_dots, DURATION_TOLERANCE};
pub use emitter::emit_musicxml;
pub use pitch::{midi_note_name, midi_pitch_to_pitch_info};
