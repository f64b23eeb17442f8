//! Score Intermediate Representation (IR)
//!
//! Bridges the quantized monophonic line and the MusicXML emitter:
//!
//! ```text
//! Vec<MonophonicEvent>
//!     ↓
//! ScoreBuilder (measure splitting, ties, note types)
//!     ↓
//! ScoreDocument
//!     ↓
//! renderers::musicxml::emit_musicxml
//! ```
//!
//! # Modules
//!
//! - **types**: Document, measure and notation types
//! - **builder**: `ScoreBuilder` and the `build_score` convenience wrapper

pub mod builder;
pub mod types;

pub use builder::{build_score, ScoreBuilder, ScoreSettings};
pub use types::*;
