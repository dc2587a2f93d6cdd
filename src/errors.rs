//! Definition of errors.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The model file does not describe a well-formed model.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// A corpus token could not be split into a word/tag pair.
    #[error("malformed corpus at line {line}: {msg}")]
    MalformedCorpus { line: usize, msg: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Output and reference files handed to the evaluator differ in length.
    #[error("no. of lines in output ({output}) and reference ({reference}) do not match")]
    LineCountMismatch { output: usize, reference: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_model<S: Into<String>>(msg: S) -> Self {
        Self::InvalidModel(msg.into())
    }

    pub(crate) fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn malformed_corpus<S: Into<String>>(line: usize, msg: S) -> Self {
        Self::MalformedCorpus {
            line,
            msg: msg.into(),
        }
    }
}
