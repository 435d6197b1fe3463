//! Staff member records.

use serde::{Deserialize, Serialize};

use super::lenient;

/// A member of staff: teacher, administrator or worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Unique identifier for the staff member.
    #[serde(deserialize_with = "lenient::record_id")]
    pub id: String,
    /// The staff member's full name.
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    /// Role such as "Teacher", "Admin" or "Worker".
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub role: Option<String>,
    /// Subject taught, or job title for non-teaching staff.
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub subject: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_teacher() {
        let json = r#"{"id": 3, "name": "Grace Okafor", "role": "Teacher", "subject": "Maths"}"#;
        let staff: StaffMember = serde_json::from_str(json).unwrap();

        assert_eq!(staff.id, "3");
        assert_eq!(staff.name, "Grace Okafor");
        assert_eq!(staff.role.as_deref(), Some("Teacher"));
        assert_eq!(staff.subject.as_deref(), Some("Maths"));
    }

    #[test]
    fn test_blank_role_is_none() {
        let staff: StaffMember =
            serde_json::from_str(r#"{"id": 4, "name": "Tom", "role": " "}"#).unwrap();
        assert!(staff.role.is_none());
        assert!(staff.subject.is_none());
    }
}
