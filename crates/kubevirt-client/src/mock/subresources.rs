//! Subresource recording and failure injection for MockKubeVirtClient

use crate::error::StoreError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A subresource request observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct SubresourceCall {
    /// `virtualmachines` or `virtualmachineinstances`
    pub resource: String,
    pub namespace: String,
    pub name: String,
    /// Subresource path segment (`restart`, `pause`, `addvolume`, ...)
    pub subresource: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InjectedFailure {
    ServerError,
    Conflict,
}

/// Operations configured to fail, keyed by operation name.
///
/// Operation names are trait method names (`update_vm`, `create_migration`)
/// or subresource path segments (`restart`, `addvolume`).
#[derive(Debug, Clone, Default)]
pub(crate) struct FailurePlan {
    failures: Arc<Mutex<HashMap<String, InjectedFailure>>>,
}

impl FailurePlan {
    pub(crate) fn set(&self, operation: &str, failure: InjectedFailure) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation.to_string(), failure);
    }

    pub(crate) fn clear(&self) {
        self.failures.lock().unwrap().clear();
    }

    pub(crate) fn check(&self, operation: &str) -> Result<(), StoreError> {
        match self.failures.lock().unwrap().get(operation) {
            None => Ok(()),
            Some(InjectedFailure::ServerError) => Err(StoreError::Api {
                code: 500,
                message: format!("injected failure for {}", operation),
            }),
            Some(InjectedFailure::Conflict) => Err(StoreError::Conflict(format!(
                "injected conflict for {}",
                operation
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CallLog {
    calls: Arc<Mutex<Vec<SubresourceCall>>>,
}

impl CallLog {
    pub(crate) fn record(&self, call: SubresourceCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub(crate) fn snapshot(&self) -> Vec<SubresourceCall> {
        self.calls.lock().unwrap().clone()
    }
}
