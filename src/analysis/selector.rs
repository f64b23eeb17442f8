use log::{debug, info, warn};

use super::stats::{compute_track_stats, TrackStats};
use crate::config::defaults::PERCUSSION_CHANNEL;
use crate::errors::{ConversionError, Result};
use crate::midi::{NoteEvent, TrackMeta};

/// User overrides for track selection (both optional)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackSelection {
    /// Use this track, no questions asked
    pub track_index: Option<usize>,
    /// Case-insensitive substring of the track name
    pub track_name: Option<String>,
}

/// Pick the track to notate.
///
/// Priority:
/// 1. Explicit track index
/// 2. First track (in index order) whose name contains the substring and
///    that has at least one non-percussion note
/// 3. Least polyphonic track, ties broken by most notes, then lowest index
pub fn select_best_track(
    tracks: &[TrackMeta],
    notes: &[NoteEvent],
    selection: &TrackSelection,
) -> Result<usize> {
    if let Some(index) = selection.track_index {
        if index >= tracks.len() {
            return Err(ConversionError::InvalidConfiguration(format!(
                "track index {} is out of range (file has {} tracks)",
                index,
                tracks.len()
            )));
        }
        info!("Using track {} (explicit index)", index);
        return Ok(index);
    }

    if let Some(name) = selection.track_name.as_deref().filter(|n| !n.is_empty()) {
        let needle = name.to_lowercase();
        let matched = tracks.iter().enumerate().position(|(index, meta)| {
            meta.track_name
                .as_ref()
                .is_some_and(|track_name| track_name.to_lowercase().contains(&needle))
                && has_melodic_notes(notes, index)
        });
        match matched {
            Some(index) => {
                info!("Using track {} (name matches '{}')", index, name);
                return Ok(index);
            }
            None => warn!(
                "No track with notes has a name containing '{}'; selecting automatically",
                name
            ),
        }
    }

    let candidates: Vec<TrackStats> = (0..tracks.len())
        .filter_map(|index| compute_track_stats(notes, index))
        .collect();
    for stats in &candidates {
        debug!(
            "Track {}: {} notes, max simultaneous {}, pitch {}..{} (avg {:.1})",
            stats.track_index,
            stats.note_count,
            stats.max_simultaneous,
            stats.min_pitch,
            stats.max_pitch,
            stats.avg_pitch
        );
    }

    let best = candidates
        .iter()
        .min_by(|a, b| {
            a.max_simultaneous
                .cmp(&b.max_simultaneous)
                .then(b.note_count.cmp(&a.note_count))
        })
        .ok_or_else(|| ConversionError::NoNotesFound("no note events found in MIDI".to_string()))?;

    info!(
        "Selected track {} automatically ({} notes, max simultaneous {})",
        best.track_index, best.note_count, best.max_simultaneous
    );
    Ok(best.track_index)
}

fn has_melodic_notes(notes: &[NoteEvent], track_index: usize) -> bool {
    notes
        .iter()
        .any(|n| n.track_index == track_index && n.channel != PERCUSSION_CHANNEL)
}
