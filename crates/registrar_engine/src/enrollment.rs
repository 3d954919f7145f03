/* 📖 # Why keep validation, lookup and commit in one write-locked closure?

The capacity check and the slot decrement must observe the same catalog state. Running
steps from lookup to decrement inside a single `StoreHandle::write` call means no other
enrollment can slip in between, so `availableSlots` can never be driven below zero and a
failed attempt leaves catalog and ledger exactly as they were.
*/

use std::fmt;

use registrar_base::pal::http::HttpStatusCode;
use serde::Deserialize;
use serde_json::Number;
use tracing::{debug, info};

use crate::course::{CourseId, Enrollment};
use crate::store::StoreHandle;

/// Body of `POST /api/enroll`.
///
/// Both fields are optional at the serde level so that a missing field is reported as a
/// validation failure rather than a malformed body. `course_id` accepts any JSON number;
/// numbers that cannot be a course ID (negative, fractional, too large) simply match no
/// course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub course_id: Option<Number>,
}

impl EnrollmentRequest {
    pub fn new(student_name: impl Into<String>, course_id: CourseId) -> Self {
        Self {
            student_name: Some(student_name.into()),
            course_id: Some(Number::from(course_id.value())),
        }
    }

    /// Returns the name and course number if both are present, non-empty and non-zero.
    fn validated(&self) -> Option<(&str, &Number)> {
        let student_name = self.student_name.as_deref().filter(|name| !name.is_empty())?;
        let course_id = self
            .course_id
            .as_ref()
            .filter(|number| number.as_f64() != Some(0.0))?;
        Some((student_name, course_id))
    }
}

/// The course ID a JSON number denotes, if any. `1.0` denotes course 1.
fn course_id_from_number(number: &Number) -> Option<CourseId> {
    if let Some(id) = number.as_u64() {
        return Some(CourseId::new(id));
    }
    let value = number.as_f64()?;
    let is_id = value.fract() == 0.0 && value >= 0.0 && value < u64::MAX as f64;
    is_id.then(|| CourseId::new(value as u64))
}

/// Why an enrollment was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentError {
    /// Student name or course ID missing.
    Validation,
    /// `course_id` is `None` when the requested number cannot be a course ID at all.
    CourseNotFound { course_id: Option<CourseId> },
    NoCapacity { course_id: CourseId },
}

impl EnrollmentError {
    pub fn status_code(&self) -> HttpStatusCode {
        match self {
            Self::Validation | Self::NoCapacity { .. } => HttpStatusCode::BadRequest,
            Self::CourseNotFound { .. } => HttpStatusCode::NotFound,
        }
    }
}

impl fmt::Display for EnrollmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "Student name and course ID are required."),
            Self::CourseNotFound { .. } => write!(f, "Course not found."),
            Self::NoCapacity { .. } => write!(f, "No available slots for this course."),
        }
    }
}

impl std::error::Error for EnrollmentError {}

/// Outcome of a successful enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentReceipt {
    pub enrollment: Enrollment,
    pub course_name: String,
    pub remaining_slots: u32,
}

impl EnrollmentReceipt {
    /// The confirmation text sent back to the client.
    pub fn message(&self) -> String {
        format!(
            "Student {} successfully enrolled in course {}!",
            self.enrollment.student_name(),
            self.course_name
        )
    }
}

/// Applies the enrollment rules to a shared store.
#[derive(Debug, Clone)]
pub struct EnrollmentService {
    store: StoreHandle,
}

impl EnrollmentService {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn enroll(
        &self,
        request: &EnrollmentRequest,
    ) -> Result<EnrollmentReceipt, EnrollmentError> {
        let Some((student_name, number)) = request.validated() else {
            debug!(?request, "rejected enrollment: missing fields");
            return Err(EnrollmentError::Validation);
        };
        let Some(course_id) = course_id_from_number(number) else {
            debug!(student = student_name, %number, "rejected enrollment: not a course ID");
            return Err(EnrollmentError::CourseNotFound { course_id: None });
        };

        let result: Result<_, EnrollmentError> = self.store.write(|store| {
            let course = store
                .catalog
                .find_by_id_mut(course_id)
                .ok_or(EnrollmentError::CourseNotFound {
                    course_id: Some(course_id),
                })?;
            if !course.has_capacity() {
                return Err(EnrollmentError::NoCapacity { course_id });
            }
            let course_name = course.name().to_string();

            let enrollment = store.ledger.append(student_name, course_id).clone();
            let remaining_slots = course.decrement_slots();

            Ok(EnrollmentReceipt {
                enrollment,
                course_name,
                remaining_slots,
            })
        });

        match &result {
            Ok(receipt) => info!(
                student = student_name,
                %course_id,
                enrollment_id = %receipt.enrollment.id(),
                remaining_slots = receipt.remaining_slots,
                "enrolled student"
            ),
            Err(e) => debug!(
                student = student_name,
                %course_id,
                reason = %e,
                "rejected enrollment"
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::{Course, EnrollmentId};
    use crate::store::{CourseCatalog, EnrollmentLedger, EnrollmentStore};

    fn service_with(courses: Vec<Course>) -> EnrollmentService {
        let store =
            EnrollmentStore::new(CourseCatalog::from_courses(courses), EnrollmentLedger::new());
        EnrollmentService::new(StoreHandle::new(store))
    }

    fn slots_of(service: &EnrollmentService, id: u64) -> u32 {
        service
            .store()
            .find_course(CourseId::new(id))
            .unwrap()
            .available_slots()
    }

    #[test]
    fn test_successful_enrollment_commits_both_sides() {
        let service = service_with(vec![Course::new(CourseId::new(5), "History", 20, 80)]);

        let receipt = service
            .enroll(&EnrollmentRequest::new("Dana", CourseId::new(5)))
            .unwrap();

        assert_eq!(receipt.enrollment.id(), EnrollmentId::new(1));
        assert_eq!(receipt.enrollment.course_id(), CourseId::new(5));
        assert_eq!(receipt.remaining_slots, 19);
        assert_eq!(receipt.message(), "Student Dana successfully enrolled in course History!");
        assert_eq!(service.store().enrollment_count(), 1);
        assert_eq!(slots_of(&service, 5), 19);
    }

    #[test]
    fn test_full_course_is_rejected_without_side_effects() {
        let service = service_with(vec![Course::new(CourseId::new(1), "Mathematics", 0, 150)]);

        let result = service.enroll(&EnrollmentRequest::new("Alice", CourseId::new(1)));

        assert_eq!(result, Err(EnrollmentError::NoCapacity { course_id: CourseId::new(1) }));
        assert_eq!(service.store().enrollment_count(), 0);
        assert_eq!(slots_of(&service, 1), 0);
    }

    #[test]
    fn test_missing_fields_are_validation_errors() {
        let service = service_with(vec![Course::new(CourseId::new(1), "Mathematics", 15, 150)]);

        let empty_name = EnrollmentRequest::new("", CourseId::new(1));
        let missing_course = EnrollmentRequest {
            student_name: Some("Bob".to_string()),
            course_id: None,
        };
        let zero_course = EnrollmentRequest {
            student_name: Some("Bob".to_string()),
            course_id: Some(Number::from(0)),
        };
        let float_zero_course = EnrollmentRequest {
            student_name: Some("Bob".to_string()),
            course_id: Number::from_f64(0.0),
        };

        let requests = [
            empty_name,
            missing_course,
            zero_course,
            float_zero_course,
            EnrollmentRequest::default(),
        ];
        for request in requests {
            assert_eq!(service.enroll(&request), Err(EnrollmentError::Validation));
        }
        assert_eq!(service.store().enrollment_count(), 0);
        assert_eq!(slots_of(&service, 1), 15);
    }

    #[test]
    fn test_unknown_course_is_not_found() {
        let service = service_with(vec![Course::new(CourseId::new(1), "Mathematics", 15, 150)]);

        let result = service.enroll(&EnrollmentRequest::new("Carl", CourseId::new(999)));

        assert_eq!(
            result,
            Err(EnrollmentError::CourseNotFound {
                course_id: Some(CourseId::new(999))
            })
        );
        assert_eq!(service.store().enrollment_count(), 0);
    }

    #[test]
    fn test_numbers_that_are_not_course_ids_are_not_found() {
        let service = service_with(vec![Course::new(CourseId::new(1), "Mathematics", 15, 150)]);

        for body in [
            r#"{"studentName":"Carl","courseId":-1}"#,
            r#"{"studentName":"Carl","courseId":2.5}"#,
            r#"{"studentName":"Carl","courseId":1e20}"#,
        ] {
            let request: EnrollmentRequest = serde_json::from_str(body).unwrap();
            assert_eq!(
                service.enroll(&request),
                Err(EnrollmentError::CourseNotFound { course_id: None }),
                "body: {body}"
            );
        }
        assert_eq!(service.store().enrollment_count(), 0);
        assert_eq!(slots_of(&service, 1), 15);
    }

    #[test]
    fn test_whole_float_course_id_enrolls() {
        let service = service_with(vec![Course::new(CourseId::new(1), "Mathematics", 15, 150)]);
        let request: EnrollmentRequest =
            serde_json::from_str(r#"{"studentName":"Ada","courseId":1.0}"#).unwrap();

        let receipt = service.enroll(&request).unwrap();

        assert_eq!(receipt.enrollment.course_id(), CourseId::new(1));
        assert_eq!(receipt.remaining_slots, 14);
        assert_eq!(slots_of(&service, 1), 14);
    }

    #[test]
    fn test_course_id_from_number() {
        assert_eq!(course_id_from_number(&Number::from(7)), Some(CourseId::new(7)));
        assert_eq!(course_id_from_number(&Number::from(-7)), None);
        assert_eq!(
            course_id_from_number(&Number::from_f64(3.0).unwrap()),
            Some(CourseId::new(3))
        );
        assert_eq!(course_id_from_number(&Number::from_f64(3.5).unwrap()), None);
        assert_eq!(course_id_from_number(&Number::from_f64(1e20).unwrap()), None);
    }

    #[test]
    fn test_last_slot_can_be_taken_once() {
        let service = service_with(vec![Course::new(CourseId::new(6), "Political Science", 1, 70)]);

        assert!(service.enroll(&EnrollmentRequest::new("Erin", CourseId::new(6))).is_ok());
        assert_eq!(
            service.enroll(&EnrollmentRequest::new("Frank", CourseId::new(6))),
            Err(EnrollmentError::NoCapacity { course_id: CourseId::new(6) })
        );
        assert_eq!(slots_of(&service, 6), 0);
        assert_eq!(service.store().enrollment_count(), 1);
    }

    #[test]
    fn test_concurrent_enrollments_never_oversubscribe() {
        let service = service_with(vec![Course::new(CourseId::new(7), "Economics", 7, 95)]);

        let workers: Vec<_> = (0..16)
            .map(|i| {
                let service = service.clone();
                std::thread::spawn(move || {
                    service
                        .enroll(&EnrollmentRequest::new(format!("student-{i}"), CourseId::new(7)))
                        .is_ok()
                })
            })
            .collect();
        let accepted = workers
            .into_iter()
            .map(|worker| worker.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(accepted, 7);
        assert_eq!(slots_of(&service, 7), 0);
        assert_eq!(service.store().enrollment_count(), 7);
    }

    #[test]
    fn test_error_messages_and_status_codes() {
        let not_found = EnrollmentError::CourseNotFound {
            course_id: Some(CourseId::new(3)),
        };
        let full = EnrollmentError::NoCapacity { course_id: CourseId::new(3) };

        assert_eq!(
            EnrollmentError::Validation.to_string(),
            "Student name and course ID are required."
        );
        assert_eq!(not_found.to_string(), "Course not found.");
        assert_eq!(full.to_string(), "No available slots for this course.");
        assert_eq!(EnrollmentError::Validation.status_code().as_u16(), 400);
        assert_eq!(not_found.status_code().as_u16(), 404);
        assert_eq!(full.status_code().as_u16(), 400);
    }

    #[test]
    fn test_request_deserializes_partial_bodies() {
        let request: EnrollmentRequest = serde_json::from_str(r#"{"studentName":"Ivy"}"#).unwrap();
        assert_eq!(request.student_name.as_deref(), Some("Ivy"));
        assert_eq!(request.course_id, None);

        let request: EnrollmentRequest =
            serde_json::from_str(r#"{"studentName":null,"courseId":4}"#).unwrap();
        assert_eq!(request.student_name, None);
        assert_eq!(request.course_id, Some(Number::from(4)));
    }
}
