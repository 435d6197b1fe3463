//! Student and class section records.
//!
//! These are read-only snapshots of roster data owned by the dashboard's
//! student and class collections.

use serde::{Deserialize, Serialize};

use super::lenient;

/// A student on the school roster.
///
/// # Example
///
/// ```
/// use school_reports::models::Student;
///
/// let student: Student = serde_json::from_str(
///     r#"{"id": 1, "name": "Amina Yusuf", "class_id": 101}"#,
/// ).unwrap();
/// assert_eq!(student.id, "1");
/// assert!(student.is_enrolled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier for the student.
    #[serde(deserialize_with = "lenient::record_id")]
    pub id: String,
    /// The student's full name.
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    /// The class section the student belongs to.
    #[serde(
        default,
        alias = "classId",
        deserialize_with = "lenient::optional_id"
    )]
    pub class_id: Option<String>,
    /// Whether the student is currently active.
    #[serde(default = "lenient::enabled", deserialize_with = "lenient::active_flag")]
    pub is_active: bool,
    /// Whether the student sits in the recycle bin.
    #[serde(default, deserialize_with = "lenient::deleted_flag")]
    pub is_deleted: bool,
}

impl Student {
    /// Returns true if the student is active and not deleted.
    pub fn is_enrolled(&self) -> bool {
        self.is_active && !self.is_deleted
    }
}

/// A class section, e.g. "Grade 1-A" at the "Primary" level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSection {
    /// Unique identifier for the class.
    #[serde(deserialize_with = "lenient::record_id")]
    pub id: String,
    /// Display name of the class.
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    /// The school level the class belongs to.
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub level: Option<String>,
}
