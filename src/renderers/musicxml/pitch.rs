// Pitch mapping for MusicXML export

use crate::ir::PitchInfo;

/// Pitch-class spelling, sharps only
const STEP_ALTER: [(&str, i8); 12] = [
    ("C", 0),
    ("C", 1),
    ("D", 0),
    ("D", 1),
    ("E", 0),
    ("F", 0),
    ("F", 1),
    ("G", 0),
    ("G", 1),
    ("A", 0),
    ("A", 1),
    ("B", 0),
];

const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// Octave number where MIDI 60 is octave 4
fn octave_of(midi_pitch: u8) -> i8 {
    (midi_pitch / 12) as i8 - 1
}

/// Convert a MIDI note number to MusicXML step/alter/octave
///
/// Black keys are always spelled as sharps (61 -> C#4).
pub fn midi_pitch_to_pitch_info(midi_pitch: u8) -> PitchInfo {
    let (step, alter) = STEP_ALTER[usize::from(midi_pitch % 12)];
    PitchInfo {
        step,
        alter,
        octave: octave_of(midi_pitch),
    }
}

/// Human-readable note name such as `C4` or `F#5`
pub fn midi_note_name(midi_pitch: u8) -> String {
    format!(
        "{}{}",
        NOTE_NAMES[usize::from(midi_pitch % 12)],
        octave_of(midi_pitch)
    )
}
