//! Object store errors

use thiserror::Error;

/// Errors that can occur when talking to the object store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport or client-side Kubernetes error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// The API server refused the request with a status other than 404/409
    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    /// Resource not found
    #[error("{kind} {name} not found")]
    NotFound {
        kind: &'static str,
        name: String,
    },

    /// The object changed since it was read (resource version mismatch)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The object passed in cannot be written as-is (e.g., no namespace)
    #[error("Invalid object: {0}")]
    InvalidObject(String),

    /// A reflector cache did not finish its initial sync
    #[error("Cache sync failed: {0}")]
    CacheSync(String),

    /// Building a raw subresource request failed
    #[error("Request error: {0}")]
    Request(#[from] http::Error),
}

impl StoreError {
    /// Classify a kube error for a named object.
    ///
    /// 404 becomes [`StoreError::NotFound`] and 409 becomes
    /// [`StoreError::Conflict`] so callers can branch on them without
    /// inspecting status codes.
    pub fn from_kube(err: kube::Error, kind: &'static str, name: impl Into<String>) -> Self {
        match err {
            kube::Error::Api(ae) if ae.code == 404 => StoreError::NotFound {
                kind,
                name: name.into(),
            },
            kube::Error::Api(ae) if ae.code == 409 => StoreError::Conflict(ae.message.clone()),
            kube::Error::Api(ae) => StoreError::Api {
                code: ae.code,
                message: ae.message.clone(),
            },
            other => StoreError::Kube(other),
        }
    }

    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}
