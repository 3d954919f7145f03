use crate::course::{CourseId, Enrollment, EnrollmentId};

/// Append-only list of enrollments.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentLedger {
    enrollments: Vec<Enrollment>,
}

impl EnrollmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All enrollments in insertion order.
    pub fn list_all(&self) -> &[Enrollment] {
        &self.enrollments
    }

    /// Record a new enrollment. Its ID is the ledger length plus one.
    pub fn append(&mut self, student_name: impl Into<String>, course_id: CourseId) -> &Enrollment {
        let id = EnrollmentId::new(self.enrollments.len() as u64 + 1);
        self.enrollments.push(Enrollment::new(id, student_name, course_id));
        &self.enrollments[self.enrollments.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.enrollments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enrollments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_assigns_sequential_ids() {
        let mut ledger = EnrollmentLedger::new();
        assert!(ledger.is_empty());

        let first = ledger.append("Alice", CourseId::new(1)).clone();
        let second = ledger.append("Bob", CourseId::new(2)).clone();

        assert_eq!(first.id(), EnrollmentId::new(1));
        assert_eq!(second.id(), EnrollmentId::new(2));
        assert_eq!(second.student_name(), "Bob");
        assert_eq!(second.course_id(), CourseId::new(2));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_list_all_keeps_insertion_order() {
        let mut ledger = EnrollmentLedger::new();
        ledger.append("Zed", CourseId::new(3));
        ledger.append("Amy", CourseId::new(1));

        let students: Vec<&str> = ledger
            .list_all()
            .iter()
            .map(Enrollment::student_name)
            .collect();
        assert_eq!(students, vec!["Zed", "Amy"]);
    }
}
