//! Renderers module
//!
//! Output formats for a built score. MusicXML is the only one.

pub mod musicxml;

pub use musicxml::emit_musicxml;
