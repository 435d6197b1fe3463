//! Fixed in-memory collections.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{ReportError, ReportResult};

use super::{RecordStore, Resource};

/// A store over collections held in memory.
///
/// A resource that was never set fetches as an empty array.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    collections: HashMap<Resource, Value>,
    unavailable: Vec<Resource>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the payload returned for a resource.
    pub fn with(mut self, resource: Resource, payload: Value) -> Self {
        self.collections.insert(resource, payload);
        self
    }

    /// Makes every fetch of a resource fail.
    pub fn with_unavailable(mut self, resource: Resource) -> Self {
        self.unavailable.push(resource);
        self
    }
}

impl RecordStore for InMemoryStore {
    fn fetch(&self, resource: Resource) -> ReportResult<Value> {
        if self.unavailable.contains(&resource) {
            return Err(ReportError::FetchFailed {
                resource: resource.name().to_string(),
                message: "resource marked unavailable".to_string(),
            });
        }

        Ok(self
            .collections
            .get(&resource)
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new())))
    }
}
