use crate::request::DocumentId;
use thiserror::Error;

/// Errors surfaced by the viewer state machine and the document loader
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewerError {
    #[error("unsupported file type: {detail}")]
    UnsupportedFormat { detail: String },

    #[error("page {page} is outside 1..={page_count}")]
    OutOfRange { page: usize, page_count: usize },

    #[error("invalid page jump input {input:?}")]
    InvalidJumpInput { input: String },

    #[error("could not read {file_name}: {reason}")]
    Read { file_name: String, reason: String },

    #[error("rendering engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error(transparent)]
    Render(#[from] RenderFailure),
}

impl ViewerError {
    pub fn unsupported(detail: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            detail: detail.into(),
        }
    }
}

/// A single page could not be produced. Never fatal to the session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderFailure {
    #[error("page {page} failed to render: {reason}")]
    Page { page: usize, reason: String },

    #[error("scale {scale} is not a positive finite number")]
    InvalidScale { scale: f32 },

    #[error("{document} is no longer loaded")]
    DocumentReleased { document: DocumentId },

    #[error("render worker unavailable: {reason}")]
    Unavailable { reason: String },
}

impl RenderFailure {
    pub fn page(page: usize, reason: impl ToString) -> Self {
        Self::Page {
            page,
            reason: reason.to_string(),
        }
    }
}

/// Failure reported by a rendering engine implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Invalid viewer configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be {requirement}, got {value}")]
    Invalid {
        field: &'static str,
        requirement: &'static str,
        value: f32,
    },
}
