//! Demo data loaded at startup unless `seed_demo_data = false`.

use crate::course::{Course, CourseId};
use crate::store::{CourseCatalog, EnrollmentLedger, EnrollmentStore};

const DEMO_COURSES: [(u64, &str, u32, i64); 10] = [
    (1, "Mathematics", 15, 150),
    (2, "Physics", 12, 120),
    (3, "Chemistry", 10, 110),
    (4, "Biology", 8, 105),
    (5, "History", 20, 80),
    (6, "Political Science", 5, 70),
    (7, "Economics", 7, 95),
    (8, "Computer Science", 25, 200),
    (9, "Engineering Graphics", 18, 170),
    (10, "Philosophy", 6, 50),
];

const DEMO_ENROLLMENTS: [(&str, u64); 15] = [
    ("Alice", 1),
    ("Bob", 2),
    ("Charlie", 8),
    ("Daisy", 6),
    ("Edward", 4),
    ("Fiona", 8),
    ("George", 3),
    ("Hannah", 7),
    ("Ivy", 5),
    ("Jack", 9),
    ("Kate", 9),
    ("Liam", 10),
    ("Mona", 3),
    ("Nina", 1),
    ("Oliver", 2),
];

pub fn demo_courses() -> Vec<Course> {
    DEMO_COURSES
        .iter()
        .map(|&(id, name, slots, popularity)| {
            Course::new(CourseId::new(id), name, slots, popularity)
        })
        .collect()
}

/// Catalog and ledger with the demo records.
///
/// The demo enrollments are historical records; they do not consume course slots.
pub fn demo_store() -> EnrollmentStore {
    let mut ledger = EnrollmentLedger::new();
    for (student_name, course_id) in DEMO_ENROLLMENTS {
        ledger.append(student_name, CourseId::new(course_id));
    }
    EnrollmentStore::new(CourseCatalog::from_courses(demo_courses()), ledger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::EnrollmentId;

    #[test]
    fn test_demo_store_contents() {
        let store = demo_store();
        assert_eq!(store.catalog.len(), 10);
        assert_eq!(store.ledger.len(), 15);

        let last = &store.ledger.list_all()[14];
        assert_eq!(last.id(), EnrollmentId::new(15));
        assert_eq!(last.student_name(), "Oliver");

        let history = store.catalog.find_by_id(CourseId::new(5)).unwrap();
        assert_eq!(history.available_slots(), 20);
    }

    #[test]
    fn test_demo_enrollments_reference_demo_courses() {
        let store = demo_store();
        for enrollment in store.ledger.list_all() {
            assert!(store.catalog.find_by_id(enrollment.course_id()).is_some());
        }
    }
}
