use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DstError {
    #[error("Unable to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to parse JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unable to read zip archive {}: {source}", .path.display())]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Dialogue {dialogue_idx} is missing from the raw sessions")]
    MissingDialogue { dialogue_idx: String },

    #[error("Dialogue {dialogue_idx} has no message at position {position}")]
    MissingMessage {
        dialogue_idx: String,
        position: usize,
    },

    #[error(
        "Dialogue {dialogue_idx}, turn {turn_id}: expected role \"usr\" at message {position}, found {found:?}"
    )]
    RoleMismatch {
        dialogue_idx: String,
        turn_id: usize,
        position: usize,
        found: Option<String>,
    },

    #[error("Cannot compute metrics over zero turns")]
    NoTurns,

    #[error("Unknown data type {0:?}, expected one of train, dev, test")]
    UnknownDataType(String),
}

impl DstError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DstError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        DstError::Json {
            path: path.into(),
            source,
        }
    }
}
