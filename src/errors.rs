//! Error types for MIDI to MusicXML conversion
//!
//! Every failure is fatal for the current run: nothing is written when any
//! stage returns an error.

use std::path::PathBuf;

use thiserror::Error;

use crate::midi::DecodeError;

/// Top-level conversion error type
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The input is not a structurally valid Standard MIDI File
    #[error("malformed MIDI file: {0}")]
    MalformedFile(#[from] DecodeError),

    /// The chosen track (or every track) has no usable notes
    #[error("no notes found: {0}")]
    NoNotesFound(String),

    /// Bad grid, time signature, track selector or other setting
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// MusicXML text could not be produced (should not happen for in-memory output)
    #[error("MusicXML serialization failed: {0}")]
    Serialization(String),

    #[error("failed to encode job payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConversionError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConversionError::Io {
            path: path.into(),
            source,
        }
    }

    /// Short machine-friendly name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionError::MalformedFile(_) => "MalformedFile",
            ConversionError::NoNotesFound(_) => "NoNotesFound",
            ConversionError::InvalidConfiguration(_) => "InvalidConfiguration",
            ConversionError::Serialization(_) => "Serialization",
            ConversionError::Payload(_) => "Payload",
            ConversionError::Io { .. } => "Io",
        }
    }
}

impl From<quick_xml::Error> for ConversionError {
    fn from(err: quick_xml::Error) -> Self {
        ConversionError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_converts_to_malformed_file() {
        let err: ConversionError = DecodeError::UnknownStatus {
            status: 0xF4,
            offset: 31,
        }
        .into();

        assert_eq!(err.kind(), "MalformedFile");
        assert_eq!(
            err.to_string(),
            "malformed MIDI file: unknown MIDI status byte 0xF4 at byte 31"
        );
    }

    #[test]
    fn test_io_error_names_path() {
        let err = ConversionError::io(
            "missing.mid",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.kind(), "Io");
        assert!(err.to_string().contains("missing.mid"));
    }
}
