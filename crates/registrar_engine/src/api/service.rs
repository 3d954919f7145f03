/* 📖 # Why a single API service?

Every route reads from or writes to the same store, so one `HttpService` owns the
store handle and routes internally on method and path. The binary registers one
service, and tests drive all routes through `handle_request` or `MockPal`.

Client mistakes (missing fields, unknown course, full course, malformed body, unknown
route) are answered with ordinary 4xx responses. Only failures the service cannot answer
itself, such as JSON serialization errors, are returned as `Err` and become a 599.
*/

use registrar_base::pal::http::{
    HttpBody, HttpMethod, HttpRequest, HttpResponse, HttpService, HttpStatusCode,
};
use registrar_base::{RegistrarError, RegistrarResult};
use serde::Serialize;
use tracing::debug;

use crate::enrollment::{EnrollmentRequest, EnrollmentService};
use crate::store::StoreHandle;

pub const WELCOME_MESSAGE: &str = "Welcome to the Online Student Enrollment System API!!!";
const INVALID_BODY_MESSAGE: &str = "Invalid request body.";

/// HTTP routes of the enrollment API.
///
/// - `GET /` - welcome text
/// - `GET /api/courses` - all courses, stored order
/// - `GET /api/courses/sort-popularity` - all courses, most popular first
/// - `POST /api/enroll` - enroll a student, body `{"studentName": .., "courseId": ..}`
/// - `GET /api/enrollments` - all enrollments, insertion order
#[derive(Debug, Clone)]
pub struct ApiService {
    store: StoreHandle,
    enrollments: EnrollmentService,
}

impl ApiService {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            enrollments: EnrollmentService::new(store.clone()),
            store,
        }
    }

    /// Serialize data to JSON and wrap it in an HTTP 200 response.
    fn serialize_json_response<T: Serialize>(data: &T) -> RegistrarResult<HttpResponse> {
        serde_json::to_string(data)
            .map(HttpResponse::json)
            .map_err(|e| {
                Box::new(RegistrarError::message(format!(
                    "JSON serialization error: {}",
                    e
                )))
            })
    }

    fn text_response(status: HttpStatusCode, message: impl Into<String>) -> HttpResponse {
        HttpResponse::text(message).with_status(status)
    }

    fn handle_enroll_request(&self, request: &HttpRequest) -> HttpResponse {
        let enrollment_request = if request.body().is_empty() {
            EnrollmentRequest::default()
        } else {
            match serde_json::from_slice::<EnrollmentRequest>(request.body().as_bytes()) {
                Ok(parsed) => parsed,
                Err(e) => {
                    debug!(error = %e, "could not parse enrollment body");
                    return Self::text_response(HttpStatusCode::BadRequest, INVALID_BODY_MESSAGE);
                }
            }
        };

        match self.enrollments.enroll(&enrollment_request) {
            Ok(receipt) => HttpResponse::text(receipt.message()),
            Err(e) => Self::text_response(e.status_code(), e.to_string()),
        }
    }
}

impl ApiService {
    fn route(&self, method: HttpMethod, request: &HttpRequest) -> RegistrarResult<HttpResponse> {
        match (method, request.route_path()) {
            (HttpMethod::Get, "/") => Ok(HttpResponse::text(WELCOME_MESSAGE)),
            (HttpMethod::Get, "/api/courses") => {
                Self::serialize_json_response(&self.store.list_courses())
            }
            (HttpMethod::Get, "/api/courses/sort-popularity") => {
                Self::serialize_json_response(&self.store.list_courses_by_popularity())
            }
            (HttpMethod::Post, "/api/enroll") => Ok(self.handle_enroll_request(request)),
            (HttpMethod::Get, "/api/enrollments") => {
                Self::serialize_json_response(&self.store.list_enrollments())
            }
            (method, _) => Ok(Self::text_response(
                HttpStatusCode::NotFound,
                format!("Cannot {} {}", method, request.path()),
            )),
        }
    }
}

impl HttpService for ApiService {
    fn handle_request(&self, request: HttpRequest) -> RegistrarResult<HttpResponse> {
        // HEAD answers like GET, without a body
        if request.method() == HttpMethod::Head {
            let response = self.route(HttpMethod::Get, &request)?;
            return Ok(response.with_body(HttpBody::empty()));
        }
        self.route(request.method(), &request)
    }
}
