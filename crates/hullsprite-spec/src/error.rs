//! Error types for configuration loading.

use std::path::Path;

use thiserror::Error;

use crate::framing::CurveError;

/// Errors raised while loading the orientation, size or catalog tables.
///
/// All of these are fatal at load time: a malformed table aborts the run
/// instead of being partially applied.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read {origin}: {source}")]
    Read {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or has the wrong shape.
    #[error("malformed JSON in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// A single entry has an invalid value.
    #[error("invalid entry '{key}' in {origin}: {message}")]
    InvalidEntry {
        origin: String,
        key: String,
        message: String,
    },

    /// The `_fill_curve` section is out of range.
    #[error("invalid fill curve in {origin}: {source}")]
    Curve {
        origin: String,
        #[source]
        source: CurveError,
    },
}

impl ConfigError {
    pub(crate) fn invalid_entry(
        origin: &str,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidEntry {
            origin: origin.to_string(),
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Reads a JSON table, treating a missing file as absent.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            origin: path.display().to_string(),
            source,
        }),
    }
}

/// Trait implemented by backend error types for uniform reporting.
///
/// ```
/// use hullsprite_spec::BackendError;
///
/// fn report<E: BackendError>(err: &E) -> String {
///     format!("[{}] {}", err.code(), err.message())
/// }
/// ```
pub trait BackendError: std::error::Error {
    /// Stable error code such as "BLENDER_001".
    fn code(&self) -> &'static str;

    /// Human-readable message.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Error category, e.g. "blender".
    fn category(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_optional_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_optional(&dir.path().join("absent.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_entry_display() {
        let err = ConfigError::invalid_entry("ship_sizes.json", "amarr/frigate/x", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid entry 'amarr/frigate/x' in ship_sizes.json: must be positive"
        );
    }
}
