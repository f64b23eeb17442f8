use num_rational::Ratio;

use crate::errors::{ConversionError, Result};

/// Quantization grid mapping MIDI ticks onto MusicXML divisions
///
/// A tick converts to `round(tick * divisions / ticks_per_quarter)`. The
/// quotient is kept as an exact fraction and exact halves round away from
/// zero, so grid boundaries never depend on floating-point error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizeGrid {
    ticks_per_quarter: u64,
    divisions_per_quarter: u64,
}

impl QuantizeGrid {
    pub fn new(ticks_per_quarter: u16, divisions_per_quarter: u32) -> Result<Self> {
        if ticks_per_quarter == 0 || divisions_per_quarter == 0 {
            return Err(ConversionError::InvalidConfiguration(format!(
                "cannot quantize {} ticks per quarter onto {} divisions per quarter",
                ticks_per_quarter, divisions_per_quarter
            )));
        }
        Ok(Self {
            ticks_per_quarter: u64::from(ticks_per_quarter),
            divisions_per_quarter: u64::from(divisions_per_quarter),
        })
    }

    pub fn divisions_per_quarter(&self) -> u64 {
        self.divisions_per_quarter
    }

    /// Length of one grid unit in ticks (may be fractional)
    pub fn unit_ticks(&self) -> Ratio<u64> {
        Ratio::new(self.ticks_per_quarter, self.divisions_per_quarter)
    }

    /// Nearest grid unit for an absolute tick
    pub fn ticks_to_units(&self, ticks: u64) -> Result<u64> {
        rescale(ticks, self.divisions_per_quarter, self.ticks_per_quarter).ok_or_else(|| {
            ConversionError::InvalidConfiguration(format!(
                "tick {} does not fit on a grid of {} divisions per quarter",
                ticks, self.divisions_per_quarter
            ))
        })
    }

    /// Nearest tick for a grid unit
    pub fn units_to_ticks(&self, units: u64) -> Result<u64> {
        rescale(units, self.ticks_per_quarter, self.divisions_per_quarter).ok_or_else(|| {
            ConversionError::InvalidConfiguration(format!(
                "unit {} is past the last representable tick",
                units
            ))
        })
    }
}

/// `round(value * numer / denom)`, or `None` when it does not fit in a u64
fn rescale(value: u64, numer: u64, denom: u64) -> Option<u64> {
    let scaled = Ratio::new(u128::from(value) * u128::from(numer), u128::from(denom));
    u64::try_from(scaled.round().to_integer()).ok()
}
