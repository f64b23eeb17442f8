//! Score document types
//!
//! A single-part, single-voice score already split into measures. Durations
//! are integer MusicXML divisions; everything the emitter needs (pitch
//! spelling, note type, ties) is resolved here so rendering is a plain walk.

use crate::models::TimeSignature;

/// Notated note value, longest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteType {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
    OneHundredTwentyEighth,
}

impl NoteType {
    /// Search order for duration matching
    pub const DESCENDING: [NoteType; 8] = [
        NoteType::Whole,
        NoteType::Half,
        NoteType::Quarter,
        NoteType::Eighth,
        NoteType::Sixteenth,
        NoteType::ThirtySecond,
        NoteType::SixtyFourth,
        NoteType::OneHundredTwentyEighth,
    ];

    /// MusicXML `<type>` text
    pub fn xml_name(&self) -> &'static str {
        match self {
            NoteType::Whole => "whole",
            NoteType::Half => "half",
            NoteType::Quarter => "quarter",
            NoteType::Eighth => "eighth",
            NoteType::Sixteenth => "16th",
            NoteType::ThirtySecond => "32nd",
            NoteType::SixtyFourth => "64th",
            NoteType::OneHundredTwentyEighth => "128th",
        }
    }

    /// Undotted length in quarter notes
    pub fn quarter_length(&self) -> f64 {
        match self {
            NoteType::Whole => 4.0,
            NoteType::Half => 2.0,
            NoteType::Quarter => 1.0,
            NoteType::Eighth => 0.5,
            NoteType::Sixteenth => 0.25,
            NoteType::ThirtySecond => 0.125,
            NoteType::SixtyFourth => 0.0625,
            NoteType::OneHundredTwentyEighth => 0.03125,
        }
    }
}

/// Note type plus augmentation dots (0-2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotatedType {
    pub note_type: NoteType,
    pub dots: u8,
}

/// MusicXML pitch spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PitchInfo {
    pub step: &'static str,
    pub alter: i8,
    pub octave: i8,
}

/// One `<note>` element
#[derive(Debug, Clone, PartialEq)]
pub enum Notation {
    Rest {
        duration: u64,
        notated: Option<NotatedType>,
    },
    Note {
        midi_pitch: u8,
        pitch: PitchInfo,
        duration: u64,
        notated: Option<NotatedType>,
        /// Continues into the next segment
        tie_start: bool,
        /// Continues from the previous segment
        tie_stop: bool,
    },
}

impl Notation {
    pub fn duration(&self) -> u64 {
        match self {
            Notation::Rest { duration, .. } | Notation::Note { duration, .. } => *duration,
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Notation::Rest { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clef {
    pub sign: &'static str,
    pub line: u8,
}

impl Clef {
    pub const fn treble() -> Self {
        Self { sign: "G", line: 2 }
    }
}

/// `<attributes>` block carried by the first measure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureAttributes {
    pub divisions: u32,
    pub time: TimeSignature,
    pub clef: Clef,
}

/// Metronome mark plus the playback tempo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoDirection {
    pub beat_unit: NoteType,
    /// Displayed marking (rounded)
    pub per_minute: u32,
    /// Exact playback tempo for `<sound tempo>`
    pub sound_tempo: f64,
}

impl TempoDirection {
    pub fn quarter(bpm: f64) -> Self {
        Self {
            beat_unit: NoteType::Quarter,
            per_minute: bpm.round().max(0.0) as u32,
            sound_tempo: bpm,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Barline {
    pub location: &'static str,
    pub bar_style: &'static str,
}

impl Barline {
    /// Light-heavy double bar at the right edge
    pub const fn final_bar() -> Self {
        Self {
            location: "right",
            bar_style: "light-heavy",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    pub number: u32,
    pub attributes: Option<MeasureAttributes>,
    pub direction: Option<TempoDirection>,
    pub notations: Vec<Notation>,
    pub barline: Option<Barline>,
}

impl Measure {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            attributes: None,
            direction: None,
            notations: Vec::new(),
            barline: None,
        }
    }

    /// Sum of all notation durations
    pub fn filled_units(&self) -> u64 {
        self.notations.iter().map(Notation::duration).sum()
    }
}

/// `<score-part>` identity and playback defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartInfo {
    pub id: String,
    pub name: String,
    pub instrument_id: String,
    pub instrument_name: String,
    pub midi_channel: u8,
    pub midi_program: u8,
}

impl PartInfo {
    /// Single part `P1` playing on MIDI channel 1, program 0
    pub fn solo(instrument_name: &str) -> Self {
        Self {
            id: "P1".to_string(),
            name: instrument_name.to_string(),
            instrument_id: "P1-I1".to_string(),
            instrument_name: instrument_name.to_string(),
            midi_channel: 1,
            midi_program: 0,
        }
    }
}

/// Complete single-part score ready for emission
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreDocument {
    pub title: String,
    pub part: PartInfo,
    pub divisions: u32,
    pub time_signature: TimeSignature,
    pub tempo_bpm: f64,
    pub measures: Vec<Measure>,
}

impl ScoreDocument {
    pub fn notations(&self) -> impl Iterator<Item = &Notation> {
        self.measures.iter().flat_map(|m| m.notations.iter())
    }

    /// Number of `<note>` elements that are pitched
    pub fn note_count(&self) -> usize {
        self.notations().filter(|n| !n.is_rest()).count()
    }

    pub fn rest_count(&self) -> usize {
        self.notations().filter(|n| n.is_rest()).count()
    }
}
