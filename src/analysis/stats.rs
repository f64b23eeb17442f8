use crate::config::defaults::PERCUSSION_CHANNEL;
use crate::midi::NoteEvent;

/// Summary of one track's melodic (non-percussion) notes
#[derive(Debug, Clone, PartialEq)]
pub struct TrackStats {
    pub track_index: usize,
    pub note_count: usize,
    /// Peak number of notes sounding at once
    pub max_simultaneous: usize,
    pub min_pitch: u8,
    pub max_pitch: u8,
    pub avg_pitch: f64,
}

/// Compute statistics for a track, ignoring the percussion channel.
///
/// Returns `None` when the track has no qualifying notes.
pub fn compute_track_stats(notes: &[NoteEvent], track_index: usize) -> Option<TrackStats> {
    let track_notes: Vec<&NoteEvent> = notes
        .iter()
        .filter(|n| n.track_index == track_index && n.channel != PERCUSSION_CHANNEL)
        .collect();

    let min_pitch = track_notes.iter().map(|n| n.pitch).min()?;
    let max_pitch = track_notes.iter().map(|n| n.pitch).max()?;
    let pitch_sum: u64 = track_notes.iter().map(|n| u64::from(n.pitch)).sum();

    Some(TrackStats {
        track_index,
        note_count: track_notes.len(),
        max_simultaneous: max_simultaneous(track_notes.iter().copied()),
        min_pitch,
        max_pitch,
        avg_pitch: pitch_sum as f64 / track_notes.len() as f64,
    })
}

/// Peak polyphony via a sweep over start (+1) and end (-1) events.
///
/// Events are ordered by (tick, delta), so a note ending exactly where
/// another starts does not count as an overlap.
pub fn max_simultaneous<'a>(notes: impl IntoIterator<Item = &'a NoteEvent>) -> usize {
    let mut sweep: Vec<(u64, i8)> = Vec::new();
    for note in notes {
        sweep.push((note.start_tick, 1));
        sweep.push((note.end_tick, -1));
    }
    sweep.sort_unstable();

    let mut active = 0i64;
    let mut peak = 0i64;
    for (_, delta) in sweep {
        active += i64::from(delta);
        peak = peak.max(active);
    }
    peak as usize
}
