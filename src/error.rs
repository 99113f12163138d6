use thiserror::Error;

use crate::model::FileKind;

/// Errors reported for individual files or outputs during a merge run.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Unable to read {kind} file '{name}': {cause}")]
    UnreadableFile {
        name: String,
        kind: FileKind,
        cause: String,
    },
    #[error("Failed to write merged {kind} output: {cause}")]
    Serialize { kind: FileKind, cause: String },
}

impl MergeError {
    pub fn unreadable(name: &str, kind: FileKind, cause: impl ToString) -> Self {
        MergeError::UnreadableFile {
            name: name.to_string(),
            kind,
            cause: cause.to_string(),
        }
    }

    /// Name of the file the error refers to, if it concerns a single input.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            MergeError::UnreadableFile { name, .. } => Some(name),
            MergeError::Serialize { .. } => None,
        }
    }
}

/// Raised when none of the configured encodings decodes a byte stream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("No candidate encoding decoded the input (tried: {})", .tried.join(", "))]
pub struct DecodeFailure {
    pub tried: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown encoding '{0}'")]
    UnknownEncoding(String),
    #[error("At least one candidate encoding must be configured")]
    NoEncodings,
    #[error("Reading config file {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parsing config file {path:?}: {source}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
