use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    /// The datasheet could not be read or does not hold a usable spectrum.
    #[error("{}: {}", .path.display(), .reason)]
    InputParse { path: PathBuf, reason: String },

    #[error("invalid settings: {0}")]
    Config(String),
}

impl TableError {
    pub fn input_parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        TableError::InputParse {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
