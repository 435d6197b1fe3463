//! Record store access.
//!
//! The reports read four collections owned by the school dashboard. A
//! [`RecordStore`] hands each one back as a raw JSON array; this module
//! decodes the records leniently and assembles them into [`ReportInputs`].
//!
//! A failed fetch is always an error. It is never reported as an empty
//! collection, so "no data" and "data unavailable" stay distinguishable.

mod json_dir;
mod memory;

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ReportError, ReportResult};
use crate::models::ReportInputs;

pub use json_dir::JsonDirStore;
pub use memory::InMemoryStore;

/// A record collection the reports read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    /// The student roster.
    Students,
    /// The class sections.
    Classes,
    /// Finance transactions.
    Finance,
    /// The staff list.
    Staff,
}

impl Resource {
    /// Every resource, in fetch order.
    pub const ALL: [Resource; 4] = [
        Resource::Students,
        Resource::Classes,
        Resource::Finance,
        Resource::Staff,
    ];

    /// The name the store knows the collection by.
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Students => "students",
            Resource::Classes => "classes",
            Resource::Finance => "finance",
            Resource::Staff => "staff",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A source of record collections.
///
/// `fetch` returns the complete collection as a JSON array. Implementations
/// may block; async callers should run them on a blocking thread.
pub trait RecordStore: Send + Sync {
    /// Fetches the full collection for a resource.
    fn fetch(&self, resource: Resource) -> ReportResult<Value>;
}

/// Fetches a collection and decodes each record.
///
/// Records that fail to decode are skipped with a warning. A payload that is
/// not an array fails with [`ReportError::MalformedCollection`].
pub fn fetch_collection<T: DeserializeOwned>(
    store: &dyn RecordStore,
    resource: Resource,
) -> ReportResult<Vec<T>> {
    let payload = store.fetch(resource)?;

    let Value::Array(records) = payload else {
        return Err(ReportError::MalformedCollection {
            resource: resource.name().to_string(),
            message: format!("expected an array, found {}", json_kind(&payload)),
        });
    };

    let total = records.len();
    let decoded: Vec<T> = records
        .into_iter()
        .enumerate()
        .filter_map(|(position, record)| match serde_json::from_value(record) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(
                    resource = resource.name(),
                    position,
                    error = %e,
                    "Skipping record that could not be decoded"
                );
                None
            }
        })
        .collect();

    debug!(
        resource = resource.name(),
        total,
        decoded = decoded.len(),
        "Fetched collection"
    );

    Ok(decoded)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl ReportInputs {
    /// Fetches only the listed collections; the others stay empty.
    ///
    /// # Example
    ///
    /// ```
    /// use school_reports::models::ReportInputs;
    /// use school_reports::store::{InMemoryStore, Resource};
    /// use serde_json::json;
    ///
    /// let store = InMemoryStore::new()
    ///     .with(Resource::Staff, json!([{"id": 1, "name": "Grace Okafor", "role": "Teacher"}]))
    ///     .with(Resource::Students, json!([{"id": 1, "name": "Amina"}]));
    ///
    /// let inputs = ReportInputs::fetch(&store, &[Resource::Staff]).unwrap();
    /// assert_eq!(inputs.staff.len(), 1);
    /// assert!(inputs.students.is_empty());
    /// ```
    pub fn fetch(store: &dyn RecordStore, resources: &[Resource]) -> ReportResult<Self> {
        let mut inputs = ReportInputs::default();

        for resource in resources {
            match resource {
                Resource::Students => inputs.students = fetch_collection(store, *resource)?,
                Resource::Classes => inputs.classes = fetch_collection(store, *resource)?,
                Resource::Finance => inputs.transactions = fetch_collection(store, *resource)?,
                Resource::Staff => inputs.staff = fetch_collection(store, *resource)?,
            }
        }

        Ok(inputs)
    }
}
