/* 📖 # Why newtypes for course and enrollment IDs?

Both identifiers are plain integers on the wire. Wrapping them keeps a course ID from
being passed where an enrollment ID is expected, while `#[serde(transparent)]` keeps
the JSON identical to a bare number.
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique, externally assigned course identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(u64);

impl CourseId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequential enrollment identifier, assigned by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentId(u64);

impl EnrollmentId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A course offered for enrollment.
///
/// `available_slots` only ever goes down, one per successful enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    id: CourseId,
    name: String,
    available_slots: u32,
    popularity: i64,
}

impl Course {
    pub fn new(
        id: CourseId,
        name: impl Into<String>,
        available_slots: u32,
        popularity: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            available_slots,
            popularity,
        }
    }

    pub fn id(&self) -> CourseId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn available_slots(&self) -> u32 {
        self.available_slots
    }

    pub fn popularity(&self) -> i64 {
        self.popularity
    }

    pub fn has_capacity(&self) -> bool {
        self.available_slots > 0
    }

    /// Consume one slot and return the slots left. Callers check
    /// [`has_capacity`](Self::has_capacity) first.
    pub(crate) fn decrement_slots(&mut self) -> u32 {
        debug_assert!(self.has_capacity(), "course {} has no free slot", self.id);
        self.available_slots = self.available_slots.saturating_sub(1);
        self.available_slots
    }
}

/// A student's enrollment in a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    id: EnrollmentId,
    student_name: String,
    course_id: CourseId,
}

impl Enrollment {
    pub fn new(id: EnrollmentId, student_name: impl Into<String>, course_id: CourseId) -> Self {
        Self {
            id,
            student_name: student_name.into(),
            course_id,
        }
    }

    pub fn id(&self) -> EnrollmentId {
        self.id
    }

    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    pub fn course_id(&self) -> CourseId {
        self.course_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn test_course_json_shape() {
        let course = Course::new(CourseId::new(8), "Computer Science", 25, 200);
        let json = serde_json::to_string(&course).unwrap();
        expect![[r#"{"id":8,"name":"Computer Science","availableSlots":25,"popularity":200}"#]]
            .assert_eq(&json);
    }

    #[test]
    fn test_enrollment_json_shape() {
        let enrollment = Enrollment::new(EnrollmentId::new(3), "Charlie", CourseId::new(8));
        let json = serde_json::to_string(&enrollment).unwrap();
        expect![[r#"{"id":3,"studentName":"Charlie","courseId":8}"#]].assert_eq(&json);
    }

    #[test]
    fn test_decrement_slots() {
        let mut course = Course::new(CourseId::new(6), "Political Science", 1, 70);
        assert!(course.has_capacity());
        assert_eq!(course.decrement_slots(), 0);
        assert_eq!(course.available_slots(), 0);
        assert!(!course.has_capacity());
    }
}
