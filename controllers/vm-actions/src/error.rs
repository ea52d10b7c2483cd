//! Action error types.
//!
//! Every failure an action can produce falls into one of a small set of
//! categories. The category decides the HTTP status and is exposed to clients
//! in the `x-error-category` header so they can tell a retryable conflict
//! from a rejected request without parsing the message.

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use kubevirt_client::StoreError;
use thiserror::Error;

/// Response header carrying the machine-readable error category
pub const ERROR_CATEGORY_HEADER: &str = "x-error-category";

/// Machine-readable error category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidInput,
    IllegalState,
    NotFound,
    PreconditionFailed,
    Conflict,
    PartialFailure,
    Internal,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::InvalidInput => "InvalidInput",
            ErrorCategory::IllegalState => "IllegalState",
            ErrorCategory::NotFound => "NotFound",
            ErrorCategory::PreconditionFailed => "PreconditionFailed",
            ErrorCategory::Conflict => "Conflict",
            ErrorCategory::PartialFailure => "PartialFailure",
            ErrorCategory::Internal => "Internal",
        }
    }

    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorCategory::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCategory::IllegalState | ErrorCategory::Conflict => StatusCode::CONFLICT,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::PreconditionFailed => StatusCode::PRECONDITION_FAILED,
            ErrorCategory::PartialFailure | ErrorCategory::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while serving VM actions.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Missing or malformed request fields, or malformed annotation JSON
    #[error("{0}")]
    InvalidInput(String),

    /// The action is not legal in the object's current state
    #[error("{0}")]
    IllegalState(String),

    /// A referenced VM, instance, node, claim, backup or disk is absent
    #[error("{0}")]
    NotFound(String),

    /// A cluster-wide prerequisite (backup target) is not in place
    #[error("{0}")]
    PreconditionFailed(String),

    /// The object changed between read and write; the caller may retry
    #[error("{0}")]
    Conflict(String),

    /// The first write was committed but the dependent call failed
    #[error("{0}")]
    PartialFailure(String),

    /// Unclassified store or transport failure
    #[error("{0}")]
    Internal(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Kubernetes client setup error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// HTTP listener error
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    /// A background task ended unexpectedly
    #[error("Task failed: {0}")]
    Task(String),
}

impl ActionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ActionError::InvalidInput(_) => ErrorCategory::InvalidInput,
            ActionError::IllegalState(_) => ErrorCategory::IllegalState,
            ActionError::NotFound(_) => ErrorCategory::NotFound,
            ActionError::PreconditionFailed(_) => ErrorCategory::PreconditionFailed,
            ActionError::Conflict(_) => ErrorCategory::Conflict,
            ActionError::PartialFailure(_) => ErrorCategory::PartialFailure,
            ActionError::Internal(_)
            | ActionError::InvalidConfig(_)
            | ActionError::Kube(_)
            | ActionError::Server(_)
            | ActionError::Task(_) => ErrorCategory::Internal,
        }
    }

    /// Rebuild an error of `category` carrying `message`
    fn with_category(category: ErrorCategory, message: String) -> Self {
        match category {
            ErrorCategory::InvalidInput => ActionError::InvalidInput(message),
            ErrorCategory::IllegalState => ActionError::IllegalState(message),
            ErrorCategory::NotFound => ActionError::NotFound(message),
            ErrorCategory::PreconditionFailed => ActionError::PreconditionFailed(message),
            ErrorCategory::Conflict => ActionError::Conflict(message),
            ErrorCategory::PartialFailure => ActionError::PartialFailure(message),
            ErrorCategory::Internal => ActionError::Internal(message),
        }
    }

    /// Prefix the message with `context`, keeping the category
    pub fn context(self, context: impl std::fmt::Display) -> Self {
        let category = self.category();
        Self::with_category(category, format!("{}, {}", context, self))
    }

    /// Report a failed dependent call after a committed write
    pub fn partial(self, context: impl std::fmt::Display) -> Self {
        ActionError::PartialFailure(format!("{}, {}", context, self))
    }
}

impl From<StoreError> for ActionError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => ActionError::NotFound(e.to_string()),
            StoreError::Conflict(_) => ActionError::Conflict(e.to_string()),
            StoreError::InvalidObject(_) => ActionError::InvalidInput(e.to_string()),
            StoreError::Api { code, .. } if code == 422 || code == 400 => {
                ActionError::InvalidInput(e.to_string())
            }
            other => ActionError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        let category = self.category();
        let mut response = (category.status_code(), self.to_string()).into_response();
        response.headers_mut().insert(
            ERROR_CATEGORY_HEADER,
            HeaderValue::from_static(category.as_str()),
        );
        response
    }
}
