//! Collections read from a directory of JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::{ReportError, ReportResult};

use super::{RecordStore, Resource};

/// A store that reads `<dir>/<resource>.json` on every fetch.
///
/// # Directory Structure
///
/// ```text
/// data/sample/
/// ├── students.json
/// ├── classes.json
/// ├── finance.json
/// └── staff.json
/// ```
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    /// Creates a store over the given directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// The directory the store reads from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, resource: Resource) -> PathBuf {
        self.dir.join(format!("{}.json", resource.name()))
    }
}

impl RecordStore for JsonDirStore {
    fn fetch(&self, resource: Resource) -> ReportResult<Value> {
        let path = self.path_for(resource);
        debug!(resource = resource.name(), path = %path.display(), "Reading collection");

        let content = fs::read_to_string(&path).map_err(|e| ReportError::FetchFailed {
            resource: resource.name().to_string(),
            message: format!("{}: {}", path.display(), e),
        })?;

        serde_json::from_str(&content).map_err(|e| ReportError::MalformedCollection {
            resource: resource.name().to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportInputs;

    fn sample_dir() -> &'static str {
        "./data/sample"
    }

    #[test]
    fn test_reads_sample_collections() {
        let store = JsonDirStore::new(sample_dir());
        let inputs = ReportInputs::fetch(&store, &Resource::ALL).unwrap();

        assert!(!inputs.students.is_empty());
        assert!(!inputs.classes.is_empty());
        assert!(!inputs.transactions.is_empty());
        assert!(!inputs.staff.is_empty());
    }

    #[test]
    fn test_missing_file_is_fetch_failure() {
        let store = JsonDirStore::new("./data/does-not-exist");

        match store.fetch(Resource::Students) {
            Err(ReportError::FetchFailed { resource, message }) => {
                assert_eq!(resource, "students");
                assert!(message.contains("students.json"));
            }
            other => panic!("Expected FetchFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_path_uses_resource_name() {
        let store = JsonDirStore::new("/srv/school");
        assert_eq!(
            store.path_for(Resource::Finance),
            PathBuf::from("/srv/school/finance.json")
        );
    }
}
