use std::fmt;
use std::str::FromStr;

use crate::errors::ConversionError;

/// Meter as (beats per measure, beat unit)
///
/// The beat unit is stored as the plain denominator (4 for quarter notes,
/// 8 for eighths), not the SMF power-of-two exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSignature {
    pub beats: u32,
    pub beat_type: u32,
}

impl TimeSignature {
    pub const fn new(beats: u32, beat_type: u32) -> Self {
        Self { beats, beat_type }
    }

    /// Units that fit in one measure on a grid of `divisions` per quarter note.
    ///
    /// Falls back to a 4/4 measure when the meter yields no capacity.
    pub fn measure_units(&self, divisions: u32) -> u64 {
        let units = if self.beat_type == 0 {
            0.0
        } else {
            (f64::from(divisions) * f64::from(self.beats) * 4.0 / f64::from(self.beat_type)).round()
        };
        if units <= 0.0 {
            u64::from(divisions) * 4
        } else {
            units as u64
        }
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.beats, self.beat_type)
    }
}

/// Parse "N/D" (whitespace around either number is allowed)
impl FromStr for TimeSignature {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            ConversionError::InvalidConfiguration(format!(
                "time signature must look like '4/4', got '{}'",
                s
            ))
        };

        let (beats, beat_type) = s.split_once('/').ok_or_else(invalid)?;
        let beats: u32 = beats.trim().parse().map_err(|_| invalid())?;
        let beat_type: u32 = beat_type.trim().parse().map_err(|_| invalid())?;
        if beats == 0 || beat_type == 0 {
            return Err(invalid());
        }
        Ok(Self::new(beats, beat_type))
    }
}
