//! Conversion settings and command-line parsing
//!
//! # Modules
//!
//! - **defaults**: Fallback values (grid, tempo, meter, labels)
//! - **cli**: `CliArgs` parsed from `std::env::args`

pub mod cli;
pub mod defaults;

pub use cli::{CliArgs, CliCommand};

use crate::analysis::TrackSelection;
use crate::errors::{ConversionError, Result};
use crate::models::TimeSignature;
use defaults::*;

/// Options controlling one MIDI to MusicXML conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSettings {
    /// Quantize grid as a note denominator (32 = 1/32 notes); must be a positive multiple of 4
    pub grid: u32,

    /// Force this track (0-based)
    pub track_index: Option<usize>,

    /// Prefer the first track whose name contains this (case-insensitive)
    pub track_name: Option<String>,

    /// Tempo in BPM, replacing any tempo in the file
    pub tempo_override: Option<f64>,

    /// Meter, replacing any time signature in the file
    pub time_override: Option<TimeSignature>,

    /// Work title; `None` uses the default title
    pub title: Option<String>,

    /// Part and instrument name
    pub instrument: String,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            grid: DEFAULT_GRID,
            track_index: None,
            track_name: None,
            tempo_override: None,
            time_override: None,
            title: None,
            instrument: DEFAULT_INSTRUMENT.to_string(),
        }
    }
}

impl ConversionSettings {
    /// MusicXML divisions per quarter note (`grid / 4`)
    pub fn divisions_per_quarter(&self) -> Result<u32> {
        if self.grid == 0 || self.grid % 4 != 0 {
            return Err(ConversionError::InvalidConfiguration(format!(
                "--grid must be a positive multiple of 4 (e.g. 16, 32, 64), got {}",
                self.grid
            )));
        }
        Ok(self.grid / 4)
    }

    /// Check every setting that can be checked before reading the file
    pub fn validate(&self) -> Result<()> {
        self.divisions_per_quarter()?;
        if let Some(bpm) = self.tempo_override {
            if !bpm.is_finite() || bpm <= 0.0 {
                return Err(ConversionError::InvalidConfiguration(format!(
                    "tempo must be a positive number of beats per minute, got {}",
                    bpm
                )));
            }
        }
        Ok(())
    }

    pub fn track_selection(&self) -> TrackSelection {
        TrackSelection {
            track_index: self.track_index,
            track_name: self.track_name.clone(),
        }
    }

    /// Explicit title, or the default one
    pub fn title_or_default(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }
}
