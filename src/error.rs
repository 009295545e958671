//! Error types for the status engine and the services around it.
//!
//! Errors are classified by who can fix them:
//! - Input: a form field or periodicity value the user must correct
//! - Access: the session lacks the role for the operation
//! - Storage: the document store failed and the operation may be retried

use thiserror::Error;

use crate::db::DbError;
use crate::session::Role;

/// Validation failures raised by the status engine itself.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatusError {
    #[error("Communication periodicity must be a positive number of days, got {0}")]
    InvalidPeriodicity(f64),
}

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn required(field: &'static str) -> Self {
        Self::new(field, "is required")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Requires the {required} role")]
    Forbidden { required: Role, redirect_to: Role },
}

/// Error type returned by every service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error("Storage error: {0}")]
    Storage(#[from] DbError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl ServiceError {
    pub fn not_found(kind: &'static str, id: &str) -> Self {
        ServiceError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Returns true if the caller fixed nothing and may simply try again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::Storage(_))
    }

    /// Returns true if the user has to change their input.
    pub fn is_input_error(&self) -> bool {
        matches!(self, ServiceError::Validation(_) | ServiceError::Status(_))
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "Correct the highlighted field and submit again.",
            ServiceError::Access(AccessError::NotSignedIn) => "Sign in and try again.",
            ServiceError::Access(AccessError::Forbidden { .. }) => {
                "Ask an administrator to perform this action."
            }
            ServiceError::Status(_) => "Set a positive communication periodicity for the company.",
            ServiceError::Storage(_) => "Check the data directory is writable and try again.",
            ServiceError::NotFound { .. } => "Refresh the list; the record may have been deleted.",
        }
    }
}

/// Serializable error representation for the view layer.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub message: String,
    pub error_type: ErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    pub can_retry: bool,
    pub recovery_suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Input,
    Access,
    Storage,
    Missing,
}

impl From<&ServiceError> for ErrorPayload {
    fn from(err: &ServiceError) -> Self {
        let (error_type, field, redirect_to) = match err {
            ServiceError::Validation(v) => (ErrorType::Input, Some(v.field.to_string()), None),
            ServiceError::Status(_) => (
                ErrorType::Input,
                Some("communicationPeriodicity".to_string()),
                None,
            ),
            ServiceError::Access(AccessError::NotSignedIn) => {
                (ErrorType::Access, None, Some("/login".to_string()))
            }
            ServiceError::Access(AccessError::Forbidden { redirect_to, .. }) => {
                (ErrorType::Access, None, Some(redirect_to.home_path().to_string()))
            }
            ServiceError::Storage(_) => (ErrorType::Storage, None, None),
            ServiceError::NotFound { .. } => (ErrorType::Missing, None, None),
        };

        ErrorPayload {
            message: err.to_string(),
            error_type,
            field,
            redirect_to,
            can_retry: err.is_retryable(),
            recovery_suggestion: err.recovery_suggestion().to_string(),
        }
    }
}
