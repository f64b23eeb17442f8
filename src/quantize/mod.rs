//! Quantization and monophonic reduction
//!
//! - **grid**: Tick to grid-unit conversion (exact rational rounding)
//! - **monophonic**: Collapses a track's notes into one voice plus rests

pub mod grid;
pub mod monophonic;

pub use grid::QuantizeGrid;
pub use monophonic::{extract_monophonic_events, MonophonicEvent};
