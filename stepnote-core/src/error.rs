//! Error types for stepnote operations

use thiserror::Error;

/// Record codec errors.
///
/// Decoding is all-or-nothing: any of these discards the whole parse.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Document missing front-matter delimiters")]
    MalformedDocument,

    #[error("Step record missing identifier")]
    MissingIdentifier,

    #[error("Step record missing title")]
    MissingTitle,

    #[error("Invalid step order: {value}")]
    InvalidOrder { value: String },

    #[error("Invalid step status: {value}")]
    InvalidStatus { value: String },

    #[error("Invalid updated_at value: {value}")]
    InvalidTimestamp { value: String },

    #[error("Invalid support_ticket_id: {value}")]
    InvalidSupportTicketId { value: String },

    #[error("Unsupported document type: {kind}")]
    UnsupportedDocumentType { kind: String },
}

/// Tag index scheme errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TagError {
    #[error("{field} is required to build tags")]
    InvalidKey { field: &'static str },
}

/// Content safety gate errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SafetyError {
    #[error("Unsafe content: {reason}")]
    UnsafeContent { reason: String },
}

/// Optimistic concurrency errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("Step not found: {step_id} in checklist {checklist_key}")]
    NotFound {
        checklist_key: String,
        step_id: String,
    },

    #[error("Version conflict: client read {client_seen}, server has {server_current}")]
    VersionConflict {
        client_seen: crate::Timestamp,
        server_current: crate::Timestamp,
    },
}

/// Document store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store rejected credentials")]
    Unauthorized,

    #[error("Rate limited by store, gave up after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("Store request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Store unreachable: {reason}")]
    Unreachable { reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration value: {field}")]
    MissingRequired { field: &'static str },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Identity/authorization errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Agent not authorized")]
    Forbidden,
}

/// Top-level error type unifying all stepnote errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StepnoteError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Tag(#[from] TagError),

    #[error(transparent)]
    Safety(#[from] SafetyError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Result type for stepnote operations.
pub type StepnoteResult<T> = Result<T, StepnoteError>;

impl StepnoteError {
    /// Whether the caller can recover by re-reading and retrying.
    ///
    /// Conflicts and not-found are recoverable; everything else either
    /// needs a corrected request or operator attention.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StepnoteError::Sync(SyncError::VersionConflict { .. })
                | StepnoteError::Sync(SyncError::NotFound { .. })
        )
    }
}
