use crate::logging::{codes, Code};

/// Failures loading source text; parse diagnostics are not errors here
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Source not found: {path}")]
    SourceNotFound { path: String },

    #[error("Source too large: {size} bytes (max: {max_size})")]
    SourceTooLarge { size: u64, max_size: u64 },

    #[error("Invalid UTF-8 encoding in source: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading source: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::SourceNotFound { .. } => codes::source::SOURCE_NOT_FOUND,
            Self::SourceTooLarge { .. } => codes::source::SOURCE_TOO_LARGE,
            Self::InvalidEncoding { .. } => codes::source::INVALID_ENCODING,
            Self::Io(_) => codes::source::IO_ERROR,
        }
    }
}
