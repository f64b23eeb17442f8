//! Track analysis and melody track selection
//!
//! - **stats**: Per-track note count, polyphony (sweep line) and pitch range
//! - **selector**: Picks the track to notate (explicit index, name match, or
//!   least-polyphonic-then-busiest)

pub mod selector;
pub mod stats;

pub use selector::{select_best_track, TrackSelection};
pub use stats::{compute_track_stats, max_simultaneous, TrackStats};
