//! Generic in-memory object store used by every resource kind of the mock
//!
//! Objects are keyed by `(namespace, name)`; cluster-scoped kinds use an
//! empty namespace. Writes follow API server semantics closely enough for
//! the action server: creates honour `generateName`, replaces check the
//! resource version and every write bumps it.

use crate::error::StoreError;
use kube::{Resource, ResourceExt};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub(crate) type Key = (String, String);

/// Shared counters for resource versions and generated name suffixes
#[derive(Debug, Default)]
pub(crate) struct Sequence(AtomicU64);

impl Sequence {
    pub(crate) fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

pub(crate) struct ObjectStore<K> {
    kind: &'static str,
    objects: Arc<Mutex<BTreeMap<Key, K>>>,
    sequence: Arc<Sequence>,
}

impl<K> Clone for ObjectStore<K> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            objects: Arc::clone(&self.objects),
            sequence: Arc::clone(&self.sequence),
        }
    }
}

fn key_of<K: Resource>(obj: &K) -> Key {
    (obj.namespace().unwrap_or_default(), obj.name_any())
}

impl<K: Resource + Clone> ObjectStore<K> {
    pub(crate) fn new(kind: &'static str, sequence: Arc<Sequence>) -> Self {
        Self {
            kind,
            objects: Arc::new(Mutex::new(BTreeMap::new())),
            sequence,
        }
    }

    /// Insert or overwrite without any checks (test setup)
    pub(crate) fn insert(&self, mut obj: K) {
        if obj.meta().resource_version.is_none() {
            obj.meta_mut().resource_version = Some(self.sequence.next().to_string());
        }
        let key = key_of(&obj);
        self.objects.lock().unwrap().insert(key, obj);
    }

    pub(crate) fn find(&self, namespace: &str, name: &str) -> Option<K> {
        self.objects
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    pub(crate) fn get(&self, namespace: &str, name: &str) -> Result<K, StoreError> {
        self.find(namespace, name)
            .ok_or_else(|| StoreError::not_found(self.kind, display_name(namespace, name)))
    }

    pub(crate) fn list(&self, namespace: &str) -> Vec<K> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .filter(|((ns, _), _)| ns == namespace)
            .map(|(_, obj)| obj.clone())
            .collect()
    }

    pub(crate) fn all(&self) -> Vec<K> {
        self.objects.lock().unwrap().values().cloned().collect()
    }

    pub(crate) fn create(&self, obj: &K) -> Result<K, StoreError> {
        let mut created = obj.clone();
        let meta = created.meta_mut();
        if meta.namespace.as_deref().is_none_or(str::is_empty) {
            return Err(StoreError::InvalidObject(format!(
                "{} {} has no namespace",
                self.kind,
                obj.name_any()
            )));
        }
        if meta.name.as_deref().is_none_or(str::is_empty) {
            match meta.generate_name.as_deref() {
                Some(prefix) if !prefix.is_empty() => {
                    meta.name = Some(format!("{}{:05x}", prefix, self.sequence.next()));
                }
                _ => {
                    return Err(StoreError::InvalidObject(format!(
                        "{} has neither name nor generateName",
                        self.kind
                    )));
                }
            }
        }
        meta.uid = Some(uuid::Uuid::new_v4().to_string());
        meta.resource_version = Some(self.sequence.next().to_string());

        let key = key_of(&created);
        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(&key) {
            return Err(StoreError::Conflict(format!(
                "{} {} already exists",
                self.kind,
                display_name(&key.0, &key.1)
            )));
        }
        objects.insert(key, created.clone());
        Ok(created)
    }

    pub(crate) fn replace(&self, obj: &K) -> Result<K, StoreError> {
        let key = key_of(obj);
        let mut objects = self.objects.lock().unwrap();
        let current = objects
            .get(&key)
            .ok_or_else(|| StoreError::not_found(self.kind, display_name(&key.0, &key.1)))?;

        if let Some(expected) = obj.meta().resource_version.as_deref()
            && current.meta().resource_version.as_deref() != Some(expected)
        {
            return Err(StoreError::Conflict(format!(
                "the object has been modified; please apply your changes to the latest version of {} {}",
                self.kind,
                display_name(&key.0, &key.1)
            )));
        }

        let mut updated = obj.clone();
        updated.meta_mut().resource_version = Some(self.sequence.next().to_string());
        objects.insert(key, updated.clone());
        Ok(updated)
    }

    pub(crate) fn delete(&self, namespace: &str, name: &str) -> Result<(), StoreError> {
        self.objects
            .lock()
            .unwrap()
            .remove(&(namespace.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(self.kind, display_name(namespace, name)))
    }
}

fn display_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", namespace, name)
    }
}
