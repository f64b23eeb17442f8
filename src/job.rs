//! Job-runner interface
//!
//! When the converter runs as a job behind the upload service, the score is
//! stored under a job-scoped key and the outcome is reported as a small JSON
//! callback payload.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ConversionError, Result};

/// Environment variable naming the local storage root
pub const STORAGE_ROOT_ENV: &str = "LOCAL_STORAGE_ROOT";

/// File name of the score inside a job directory
pub const SCORE_FILE_NAME: &str = "score.musicxml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Completed,
    Failed,
}

/// Body posted to the job callback: `{"status", "outputPath", "error"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackPayload {
    pub status: JobStatus,
    pub output_path: Option<String>,
    pub error: Option<String>,
}

impl CallbackPayload {
    pub fn completed(output_key: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Completed,
            output_path: Some(output_key.into()),
            error: None,
        }
    }

    pub fn failed(error: &ConversionError) -> Self {
        Self {
            status: JobStatus::Failed,
            output_path: None,
            error: Some(error.to_string()),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Reject ids that could escape the storage root
fn validate_job_id(job_id: &str) -> Result<()> {
    let valid = !job_id.is_empty()
        && job_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ConversionError::InvalidConfiguration(format!(
            "job id '{}' may only contain ASCII letters, digits, '-' and '_'",
            job_id
        )))
    }
}

/// Storage key relative to the root: `output/{job_id}/score.musicxml`
pub fn job_output_key(job_id: &str) -> Result<String> {
    validate_job_id(job_id)?;
    Ok(format!("output/{}/{}", job_id, SCORE_FILE_NAME))
}

/// Absolute location of the job's score under `storage_root`
pub fn job_output_path(storage_root: &Path, job_id: &str) -> Result<PathBuf> {
    validate_job_id(job_id)?;
    Ok(storage_root.join("output").join(job_id).join(SCORE_FILE_NAME))
}
