//! Unified application error types for DocHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The referenced project, entity, or folder does not exist, or a
    /// positional path computed earlier no longer resolves.
    NotFound,
    /// A name failed the path-safety rules, resolved to a blocked reserved
    /// name at the top level, or the resulting path exceeds the length limit.
    InvalidName,
    /// A sibling in the destination folder already has the same name.
    DuplicateName,
    /// Two entities in a bulk-built structure share a full path.
    DuplicateEntity,
    /// The move destination is the source folder or a descendant of it.
    InvalidMove,
    /// Attempt to delete, rename, or move the root folder.
    NonDeletableEntity,
    /// The project's entity-count ceiling was exceeded.
    ProjectTooLarge,
    /// Bulk folder-structure creation attempted on a non-empty project.
    AlreadyPopulated,
    /// The per-project lock could not be acquired in time. Retryable.
    LockTimeout,
    /// An internal sanity check failed. Fatal, no automatic repair.
    ConsistencyViolation,
    /// A database error occurred.
    Database,
    /// A lock-store / cache error occurred.
    Cache,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A downstream service call failed after the local write committed.
    ExternalService,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether a caller may retry the failed operation as-is.
    ///
    /// Everything else requires re-resolving from scratch or fixing the
    /// request before retrying.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::LockTimeout)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::InvalidName => write!(f, "INVALID_NAME"),
            Self::DuplicateName => write!(f, "DUPLICATE_NAME"),
            Self::DuplicateEntity => write!(f, "DUPLICATE_ENTITY"),
            Self::InvalidMove => write!(f, "INVALID_MOVE"),
            Self::NonDeletableEntity => write!(f, "NON_DELETABLE_ENTITY"),
            Self::ProjectTooLarge => write!(f, "PROJECT_TOO_LARGE"),
            Self::AlreadyPopulated => write!(f, "ALREADY_POPULATED"),
            Self::LockTimeout => write!(f, "LOCK_TIMEOUT"),
            Self::ConsistencyViolation => write!(f, "CONSISTENCY_VIOLATION"),
            Self::Database => write!(f, "DATABASE"),
            Self::Cache => write!(f, "CACHE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::ExternalService => write!(f, "EXTERNAL_SERVICE"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout DocHub.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. Every failure path carries a kind; the
/// engine never produces an opaque error without one.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an invalid-name error.
    pub fn invalid_name(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidName, message)
    }

    /// Create a duplicate-name error.
    pub fn duplicate_name(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateName, message)
    }

    /// Create a duplicate-entity error.
    pub fn duplicate_entity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateEntity, message)
    }

    /// Create an invalid-move error.
    pub fn invalid_move(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidMove, message)
    }

    /// Create a non-deletable-entity error.
    pub fn non_deletable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NonDeletableEntity, message)
    }

    /// Create a project-too-large error.
    pub fn project_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProjectTooLarge, message)
    }

    /// Create an already-populated error.
    pub fn already_populated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyPopulated, message)
    }

    /// Create a lock-timeout error.
    pub fn lock_timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LockTimeout, message)
    }

    /// Create a consistency-violation error.
    pub fn consistency_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConsistencyViolation, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a lock-store / cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cache, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an external-service error.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::DuplicateName.to_string(), "DUPLICATE_NAME");
        assert_eq!(ErrorKind::LockTimeout.to_string(), "LOCK_TIMEOUT");
    }

    #[test]
    fn test_only_lock_timeout_is_retryable() {
        assert!(ErrorKind::LockTimeout.is_retryable());
        assert!(!ErrorKind::NotFound.is_retryable());
        assert!(!ErrorKind::ConsistencyViolation.is_retryable());
    }

    #[test]
    fn test_error_message_includes_kind() {
        let err = AppError::invalid_move("destination folder is a child folder of me");
        assert_eq!(
            err.to_string(),
            "INVALID_MOVE: destination folder is a child folder of me"
        );
    }
}
