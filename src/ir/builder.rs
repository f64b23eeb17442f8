//! Monophonic events to measure-structured score
//!
//! `ScoreBuilder` keeps a write position inside the current measure. Each
//! appended note or rest is cut at barlines; note segments are tied to each
//! other, rest segments are not.

use log::debug;

use super::types::*;
use crate::models::TimeSignature;
use crate::quantize::MonophonicEvent;
use crate::renderers::musicxml::duration::duration_to_type_and_dots;
use crate::renderers::musicxml::pitch::midi_pitch_to_pitch_info;

/// Global values for one score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSettings {
    pub divisions: u32,
    pub tempo_bpm: f64,
    pub time_signature: TimeSignature,
    pub title: String,
    pub instrument: String,
}

/// Incremental score builder
pub struct ScoreBuilder {
    settings: ScoreSettings,
    measure_units: u64,
    completed: Vec<Measure>,
    current: Measure,
    position: u64,
}

impl ScoreBuilder {
    /// Open measure 1 with the attribute block and tempo marking
    pub fn new(settings: ScoreSettings) -> Self {
        let measure_units = settings.time_signature.measure_units(settings.divisions);
        let mut first = Measure::new(1);
        first.attributes = Some(MeasureAttributes {
            divisions: settings.divisions,
            time: settings.time_signature,
            clef: Clef::treble(),
        });
        first.direction = Some(TempoDirection::quarter(settings.tempo_bpm));

        Self {
            settings,
            measure_units,
            completed: Vec::new(),
            current: first,
            position: 0,
        }
    }

    /// Capacity of every measure in divisions
    pub fn measure_units(&self) -> u64 {
        self.measure_units
    }

    /// Close the current measure and open the next one
    pub fn start_measure(&mut self) {
        let next = Measure::new(self.current.number + 1);
        let done = std::mem::replace(&mut self.current, next);
        self.completed.push(done);
        self.position = 0;
    }

    pub fn append_note(&mut self, midi_pitch: u8, duration: u64) {
        let pitch = midi_pitch_to_pitch_info(midi_pitch);
        let divisions = self.settings.divisions;

        self.place(duration, |segment, remaining_after, is_first| Notation::Note {
            midi_pitch,
            pitch,
            duration: segment,
            notated: duration_to_type_and_dots(segment, divisions),
            tie_start: remaining_after > 0,
            tie_stop: !is_first,
        });
    }

    pub fn append_rest(&mut self, duration: u64) {
        let divisions = self.settings.divisions;
        self.place(duration, |segment, _, _| Notation::Rest {
            duration: segment,
            notated: duration_to_type_and_dots(segment, divisions),
        });
    }

    pub fn append_event(&mut self, event: &MonophonicEvent) {
        match *event {
            MonophonicEvent::Rest { duration, .. } => self.append_rest(duration),
            MonophonicEvent::Note { duration, pitch, .. } => self.append_note(pitch, duration),
        }
    }

    /// Split `duration` at barlines, building one notation per segment.
    ///
    /// `make` receives the segment length, what is left after it, and whether
    /// it is the first segment. A new measure is opened only when there is
    /// still something to place.
    fn place(&mut self, duration: u64, make: impl Fn(u64, u64, bool) -> Notation) {
        let mut remaining = duration;
        while remaining > 0 {
            if self.position >= self.measure_units {
                self.start_measure();
            }
            let is_first = remaining == duration;
            let segment = remaining.min(self.measure_units - self.position);
            remaining -= segment;
            self.current.notations.push(make(segment, remaining, is_first));
            self.position += segment;
        }
    }

    /// Add the final barline and return the document
    pub fn finish(mut self) -> ScoreDocument {
        self.current.barline = Some(Barline::final_bar());
        self.completed.push(self.current);

        debug!(
            "Built {} measures of {} divisions",
            self.completed.len(),
            self.measure_units
        );

        ScoreDocument {
            title: self.settings.title,
            part: PartInfo::solo(&self.settings.instrument),
            divisions: self.settings.divisions,
            time_signature: self.settings.time_signature,
            tempo_bpm: self.settings.tempo_bpm,
            measures: self.completed,
        }
    }
}

/// Build a score from a monophonic event stream
pub fn build_score(events: &[MonophonicEvent], settings: ScoreSettings) -> ScoreDocument {
    let mut builder = ScoreBuilder::new(settings);
    for event in events {
        builder.append_event(event);
    }
    builder.finish()
}
