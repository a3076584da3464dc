//! Error types for interaction and pose recognition.

use std::path::PathBuf;

/// Errors surfaced by the interaction core.
///
/// Routine input noise (unknown contact ids, a full grab, a degenerate span)
/// is not an error; those cases are ignored where they happen.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InteractionError {
    #[error("Template fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Malformed pose template: {0}")]
    MalformedTemplate(String),

    #[error("Template cache has been shut down")]
    CacheShutdown,

    #[error("No supported input profile among {candidates:?} and default '{default}' is not supported")]
    ProfileNotFound {
        candidates: Vec<String>,
        default: String,
    },

    #[error("Cannot attach contact {contact}: {reason}")]
    AttachRejected { contact: u32, reason: String },

    #[error("Failed to read config {path}: {reason}")]
    ConfigRead { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, InteractionError>;
