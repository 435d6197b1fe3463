//! The in-memory collections a report is computed from.

use serde::{Deserialize, Serialize};

use super::{ClassSection, FinanceTransaction, StaffMember, Student};

/// Snapshot of every collection the aggregators read.
///
/// Callers fill in the collections a report needs and leave the rest empty;
/// an empty collection is valid input, never a sign of a failed fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportInputs {
    /// The student roster.
    #[serde(default)]
    pub students: Vec<Student>,
    /// The class sections.
    #[serde(default)]
    pub classes: Vec<ClassSection>,
    /// Finance transactions of every category.
    #[serde(default)]
    pub transactions: Vec<FinanceTransaction>,
    /// The staff list.
    #[serde(default)]
    pub staff: Vec<StaffMember>,
}

impl ReportInputs {
    /// Returns true if no collection holds any record.
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
            && self.classes.is_empty()
            && self.transactions.is_empty()
            && self.staff.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_inputs_are_empty() {
        assert!(ReportInputs::default().is_empty());
    }

    #[test]
    fn test_missing_collections_deserialize_as_empty() {
        let inputs: ReportInputs =
            serde_json::from_str(r#"{"students": [{"id": 1, "name": "Ada"}]}"#).unwrap();
        assert_eq!(inputs.students.len(), 1);
        assert!(inputs.classes.is_empty());
        assert!(inputs.transactions.is_empty());
        assert!(inputs.staff.is_empty());
        assert!(!inputs.is_empty());
    }
}
