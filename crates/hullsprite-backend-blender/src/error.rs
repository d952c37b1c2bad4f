//! Error types for the Blender backend.

use hullsprite_spec::BackendError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for Blender backend operations.
pub type BlenderResult<T> = Result<T, BlenderError>;

/// Errors that can occur while rendering through Blender.
#[derive(Debug, Error)]
pub enum BlenderError {
    /// Blender executable not found.
    #[error("Blender executable not found. Ensure Blender is installed and in PATH, or set BLENDER_PATH environment variable")]
    BlenderNotFound,

    /// Failed to spawn Blender process.
    #[error("Failed to spawn Blender process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// Blender process timed out.
    #[error("Blender process timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Blender process exited with non-zero status.
    #[error("Blender process exited with status {exit_code}: {stderr}")]
    ProcessFailed { exit_code: i32, stderr: String },

    /// Failed to write the render job for Blender.
    #[error("Failed to write render job: {0}")]
    WriteJobFailed(#[source] std::io::Error),

    /// Failed to read report from Blender.
    #[error("Failed to read Blender report from {path}: {source}")]
    ReadReportFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse report JSON from Blender.
    #[error("Failed to parse Blender report: {0}")]
    ParseReportFailed(#[source] serde_json::Error),

    /// The entrypoint script reported an error.
    #[error("Blender render failed: {message}")]
    RenderFailed { message: String },

    /// Failed to serialize the render job.
    #[error("Failed to serialize render job: {0}")]
    SerializeFailed(#[source] serde_json::Error),

    /// Input mesh does not exist.
    #[error("Input mesh not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Output file not found after rendering.
    #[error("Expected output file not found: {path}")]
    OutputNotFound { path: PathBuf },

    /// Python entrypoint script not found.
    #[error("Python entrypoint script not found at: {path}")]
    EntrypointNotFound { path: PathBuf },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The render job is inconsistent.
    #[error("Invalid render job: {message}")]
    InvalidJob { message: String },
}

impl BlenderError {
    /// Creates a new process failed error.
    pub fn process_failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::ProcessFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Creates a new render failed error.
    pub fn render_failed(message: impl Into<String>) -> Self {
        Self::RenderFailed {
            message: message.into(),
        }
    }

    pub fn invalid_job(message: impl Into<String>) -> Self {
        Self::InvalidJob {
            message: message.into(),
        }
    }
}

impl BackendError for BlenderError {
    fn code(&self) -> &'static str {
        match self {
            BlenderError::BlenderNotFound => "BLENDER_001",
            BlenderError::SpawnFailed(_) => "BLENDER_002",
            BlenderError::Timeout { .. } => "BLENDER_003",
            BlenderError::ProcessFailed { .. } => "BLENDER_004",
            BlenderError::WriteJobFailed(_) => "BLENDER_005",
            BlenderError::ReadReportFailed { .. } => "BLENDER_006",
            BlenderError::ParseReportFailed(_) => "BLENDER_007",
            BlenderError::RenderFailed { .. } => "BLENDER_008",
            BlenderError::SerializeFailed(_) => "BLENDER_009",
            BlenderError::InputNotFound { .. } => "BLENDER_010",
            BlenderError::OutputNotFound { .. } => "BLENDER_011",
            BlenderError::EntrypointNotFound { .. } => "BLENDER_012",
            BlenderError::Io(_) => "BLENDER_013",
            BlenderError::InvalidJob { .. } => "BLENDER_014",
        }
    }

    fn category(&self) -> &'static str {
        "blender"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BlenderError::BlenderNotFound;
        assert!(err.to_string().contains("Blender executable not found"));

        let err = BlenderError::Timeout { timeout_secs: 300 };
        assert!(err.to_string().contains("300 seconds"));

        let err = BlenderError::process_failed(1, "something went wrong");
        assert!(err.to_string().contains("something went wrong"));
    }

    #[test]
    fn test_codes_and_category() {
        assert_eq!(BlenderError::BlenderNotFound.code(), "BLENDER_001");
        let err = BlenderError::InputNotFound {
            path: PathBuf::from("ship.stl"),
        };
        assert_eq!(err.code(), "BLENDER_010");
        assert_eq!(err.category(), "blender");
        assert_eq!(err.message(), "Input mesh not found: ship.stl");
    }
}
