use std::collections::BTreeMap;

use log::{debug, trace};

use super::grid::QuantizeGrid;
use crate::config::defaults::PERCUSSION_CHANNEL;
use crate::errors::Result;
use crate::midi::NoteEvent;

/// One event of a single-voice line, in grid units
///
/// INVARIANT: `duration > 0`; a sequence produced by
/// `extract_monophonic_events` is gapless from unit 0 and never overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonophonicEvent {
    Rest { start: u64, duration: u64 },
    Note { start: u64, duration: u64, pitch: u8 },
}

impl MonophonicEvent {
    pub fn start(&self) -> u64 {
        match *self {
            MonophonicEvent::Rest { start, .. } | MonophonicEvent::Note { start, .. } => start,
        }
    }

    pub fn duration(&self) -> u64 {
        match *self {
            MonophonicEvent::Rest { duration, .. } | MonophonicEvent::Note { duration, .. } => {
                duration
            }
        }
    }

    pub fn end(&self) -> u64 {
        self.start() + self.duration()
    }

    pub fn pitch(&self) -> Option<u8> {
        match *self {
            MonophonicEvent::Rest { .. } => None,
            MonophonicEvent::Note { pitch, .. } => Some(pitch),
        }
    }
}

/// Quantized note chosen to represent one start position
#[derive(Debug, Clone, Copy)]
struct Candidate {
    end: u64,
    pitch: u8,
    velocity: u8,
}

impl Candidate {
    /// Higher velocity wins, then higher pitch; equal candidates keep the
    /// earlier one
    fn beats(&self, other: &Candidate) -> bool {
        (self.velocity, self.pitch) > (other.velocity, other.pitch)
    }
}

/// Reduce one track to a monophonic line of notes and rests.
///
/// 1. Quantize start/end (zero-length notes get one unit)
/// 2. Keep one note per quantized start (velocity, then pitch, then input order)
/// 3. Walk starts in order, filling gaps with rests and truncating overlaps
pub fn extract_monophonic_events(
    notes: &[NoteEvent],
    track_index: usize,
    grid: &QuantizeGrid,
) -> Result<Vec<MonophonicEvent>> {
    let mut by_start: BTreeMap<u64, Candidate> = BTreeMap::new();

    for note in notes
        .iter()
        .filter(|n| n.track_index == track_index && n.channel != PERCUSSION_CHANNEL)
    {
        let start = grid.ticks_to_units(note.start_tick)?;
        let mut end = grid.ticks_to_units(note.end_tick)?;
        if end <= start {
            end = start.saturating_add(1);
        }
        let candidate = Candidate {
            end,
            pitch: note.pitch,
            velocity: note.velocity,
        };

        by_start
            .entry(start)
            .and_modify(|current| {
                if candidate.beats(current) {
                    *current = candidate;
                }
            })
            .or_insert(candidate);
    }

    let mut events = Vec::with_capacity(by_start.len() * 2);
    let mut cursor = 0u64;

    for (start, chosen) in by_start {
        let mut start = start;
        if start > cursor {
            events.push(MonophonicEvent::Rest {
                start: cursor,
                duration: start - cursor,
            });
            cursor = start;
        }
        if start < cursor {
            start = cursor;
        }
        if chosen.end <= start {
            trace!(
                "Dropping pitch {} at unit {}: fully covered by the previous note",
                chosen.pitch,
                start
            );
            continue;
        }
        let duration = chosen.end - start;
        events.push(MonophonicEvent::Note {
            start,
            duration,
            pitch: chosen.pitch,
        });
        cursor = start + duration;
    }

    debug!(
        "Track {}: {} monophonic events ({} notes)",
        track_index,
        events.len(),
        events.iter().filter(|e| e.pitch().is_some()).count()
    );
    Ok(events)
}
