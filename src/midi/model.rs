use crate::models::TimeSignature;

/// Decoded representation of a Standard MIDI File
///
/// Only what the notation pipeline needs: timing resolution, a few meta
/// values per track, and matched note-on/note-off pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSmf {
    pub format: u16,
    pub ticks_per_quarter: u16,
    pub tracks: Vec<TrackMeta>, // One per MTrk chunk, in file order
    pub notes: Vec<NoteEvent>,  // All tracks, in close order per track
}

/// Metadata gathered from one track's meta events (first occurrence wins)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMeta {
    pub tempo_us_per_quarter: Option<u32>,
    pub time_signature: Option<TimeSignature>,
    pub track_name: Option<String>,
}

/// A sounding note reconstructed from a note-on / note-off pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    pub pitch: u8,
    pub start_tick: u64,
    pub end_tick: u64,
    pub velocity: u8,
    pub channel: u8, // 0-15 (MIDI channel 1 == 0)
    pub track_index: usize,
}

impl NoteEvent {
    pub fn duration_ticks(&self) -> u64 {
        self.end_tick.saturating_sub(self.start_tick)
    }
}

impl DecodedSmf {
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Notes belonging to a single track
    pub fn track_notes(&self, track_index: usize) -> impl Iterator<Item = &NoteEvent> {
        self.notes.iter().filter(move |n| n.track_index == track_index)
    }

    /// First tempo found scanning tracks in index order
    pub fn first_tempo(&self) -> Option<u32> {
        self.tracks.iter().find_map(|t| t.tempo_us_per_quarter)
    }

    /// First time signature found scanning tracks in index order
    pub fn first_time_signature(&self) -> Option<TimeSignature> {
        self.tracks.iter().find_map(|t| t.time_signature)
    }

    /// Track name, or `Track {index}` when the track has none
    pub fn display_track_name(&self, track_index: usize) -> String {
        self.tracks
            .get(track_index)
            .and_then(|t| t.track_name.clone())
            .unwrap_or_else(|| format!("Track {}", track_index))
    }
}

/// Convert a tempo in microseconds per quarter note to beats per minute
pub fn tempo_to_bpm(us_per_quarter: u32) -> f64 {
    60_000_000.0 / us_per_quarter as f64
}
