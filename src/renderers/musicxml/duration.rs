// Duration helpers for MusicXML export

use crate::ir::{NotatedType, NoteType};

/// Maximum difference (in divisions) for a note type to count as a match
pub const DURATION_TOLERANCE: f64 = 1e-6;

/// Length multiplier for `dots` augmentation dots: 1, 1.5, 1.75
fn dot_multiplier(dots: u8) -> f64 {
    2.0 - 0.5f64.powi(i32::from(dots))
}

/// Express a duration of `units` divisions as a note type with 0-2 dots.
///
/// Types are tried longest first, and for each type 0, 1, then 2 dots; the
/// first match wins. Returns `None` when nothing fits, in which case the
/// note carries only its numeric `<duration>`.
///
/// # Examples
/// ```
/// use gayageum_score::ir::NoteType;
/// use gayageum_score::renderers::musicxml::duration::duration_to_type_and_dots;
///
/// let dotted = duration_to_type_and_dots(12, 8).unwrap();
/// assert_eq!((dotted.note_type, dotted.dots), (NoteType::Quarter, 1));
/// assert_eq!(duration_to_type_and_dots(11, 8), None);
/// ```
pub fn duration_to_type_and_dots(units: u64, divisions: u32) -> Option<NotatedType> {
    let divisions = f64::from(divisions);
    let target = units as f64;

    NoteType::DESCENDING.iter().find_map(|&note_type| {
        let base = divisions * note_type.quarter_length();
        (0..=2u8)
            .find(|&dots| (base * dot_multiplier(dots) - target).abs() < DURATION_TOLERANCE)
            .map(|dots| NotatedType { note_type, dots })
    })
}
