//! MIDI to MusicXML converter module
//!
//! Turns a Standard MIDI File into a single-staff solo score.
//!
//! # Overview
//!
//! The converter is a strictly forward pipeline:
//! 1. **Decode**: SMF bytes to track metadata and notes (`crate::midi`)
//! 2. **Select**: Pick the most melodic track (`crate::analysis`)
//! 3. **Quantize**: Snap to the grid and reduce to one voice (`crate::quantize`)
//! 4. **Build**: Split into measures with ties and note types (`crate::ir`)
//! 5. **Emit**: MusicXML 3.1 partwise text (`crate::renderers::musicxml`)
//!
//! Any failure aborts the conversion; `convert_file` writes its output only
//! after the whole document exists in memory.
//!
//! # Basic Usage
//!
//! ```ignore
//! use gayageum_score::{convert_midi_to_musicxml, ConversionSettings};
//!
//! let bytes = std::fs::read("arirang.mid")?;
//! let result = convert_midi_to_musicxml(&bytes, &ConversionSettings::default())?;
//! println!("{} measures", result.report.measure_count);
//! std::fs::write("arirang.musicxml", result.musicxml)?;
//! ```

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::analysis::select_best_track;
use crate::config::defaults::{title_for_input, DEFAULT_TEMPO_BPM, DEFAULT_TIME_SIGNATURE};
use crate::config::ConversionSettings;
use crate::errors::{ConversionError, Result};
use crate::ir::{build_score, ScoreSettings};
use crate::midi::{decode_smf, tempo_to_bpm, DecodedSmf};
use crate::models::TimeSignature;
use crate::quantize::{extract_monophonic_events, MonophonicEvent, QuantizeGrid};
use crate::renderers::musicxml::{emit_musicxml, midi_note_name};

/// What a conversion decided and produced
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub track_index: usize,
    /// Track name, or `Track {index}` when unnamed
    pub track_name: String,
    pub tempo_bpm: f64,
    pub time_signature: TimeSignature,
    pub grid: u32,
    pub divisions_per_quarter: u32,
    /// Lowest and highest emitted MIDI pitch
    pub pitch_range: (u8, u8),
    pub note_count: usize,
    pub rest_count: usize,
    pub measure_count: usize,
}

impl ConversionReport {
    /// `55(G3) .. 67(G4)`
    pub fn pitch_range_label(&self) -> String {
        let (low, high) = self.pitch_range;
        format!(
            "{}({}) .. {}({})",
            low,
            midi_note_name(low),
            high,
            midi_note_name(high)
        )
    }
}

/// Successful conversion output
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub musicxml: String,
    pub report: ConversionReport,
}

/// Tempo: override, else first tempo in the file, else the default
fn resolve_tempo(smf: &DecodedSmf, settings: &ConversionSettings) -> f64 {
    settings
        .tempo_override
        .or_else(|| smf.first_tempo().map(tempo_to_bpm))
        .unwrap_or(DEFAULT_TEMPO_BPM)
}

/// Meter: override, else first time signature in the file, else 4/4
fn resolve_time_signature(smf: &DecodedSmf, settings: &ConversionSettings) -> TimeSignature {
    settings
        .time_override
        .or_else(|| smf.first_time_signature())
        .unwrap_or(DEFAULT_TIME_SIGNATURE)
}

/// Convert SMF bytes to a MusicXML document.
///
/// # Errors
///
/// * `InvalidConfiguration` - bad grid or tempo, a track index past the last
///   track, or note times too large for the chosen grid
/// * `MalformedFile` - the bytes are not a decodable SMF
/// * `NoNotesFound` - no track has melodic notes, or the chosen one has none
pub fn convert_midi_to_musicxml(
    data: &[u8],
    settings: &ConversionSettings,
) -> Result<ConversionResult> {
    settings.validate()?;
    let divisions = settings.divisions_per_quarter()?;

    let smf = decode_smf(data)?;
    let tempo_bpm = resolve_tempo(&smf, settings);
    let time_signature = resolve_time_signature(&smf, settings);

    let track_index = select_best_track(&smf.tracks, &smf.notes, &settings.track_selection())?;
    let track_name = smf.display_track_name(track_index);

    let grid = QuantizeGrid::new(smf.ticks_per_quarter, divisions)?;
    let events = extract_monophonic_events(&smf.notes, track_index, &grid)?;

    let pitches = events.iter().filter_map(MonophonicEvent::pitch);
    let pitch_range = match (pitches.clone().min(), pitches.max()) {
        (Some(low), Some(high)) => (low, high),
        _ => {
            return Err(ConversionError::NoNotesFound(format!(
                "selected track {} ({}) has no notes",
                track_index, track_name
            )))
        }
    };

    info!(
        "Converting track {} ({}) at {:.2} BPM, {}, grid 1/{}",
        track_index, track_name, tempo_bpm, time_signature, settings.grid
    );

    let doc = build_score(
        &events,
        ScoreSettings {
            divisions,
            tempo_bpm,
            time_signature,
            title: settings.title_or_default(),
            instrument: settings.instrument.clone(),
        },
    );
    let musicxml = emit_musicxml(&doc)?;

    let report = ConversionReport {
        track_index,
        track_name,
        tempo_bpm,
        time_signature,
        grid: settings.grid,
        divisions_per_quarter: divisions,
        pitch_range,
        note_count: doc.note_count(),
        rest_count: doc.rest_count(),
        measure_count: doc.measures.len(),
    };
    debug!("{:?}", report);

    Ok(ConversionResult { musicxml, report })
}

/// Convert `input` and write the score to `output`.
///
/// Without an explicit title the input file name is appended to the default
/// one. Missing parent directories of `output` are created.
pub fn convert_file(
    input: &Path,
    output: &Path,
    settings: &ConversionSettings,
) -> Result<ConversionReport> {
    let data = fs::read(input).map_err(|e| ConversionError::io(input, e))?;

    let mut settings = settings.clone();
    if settings.title.is_none() {
        if let Some(name) = input.file_name() {
            settings.title = Some(title_for_input(&name.to_string_lossy()));
        }
    }

    let result = convert_midi_to_musicxml(&data, &settings)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ConversionError::io(parent, e))?;
    }
    fs::write(output, result.musicxml.as_bytes()).map_err(|e| ConversionError::io(output, e))?;
    info!("Wrote {}", output.display());

    Ok(result.report)
}
