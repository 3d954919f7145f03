/* 📖 # What lives in the engine?

The engine holds the enrollment domain: courses and enrollments, the catalog and
ledger behind a shared store handle, the enrollment rules, and the HTTP routes that
expose them. It never touches sockets or files directly; everything external goes
through the PAL from registrar_base.
*/

pub mod api;
pub mod config;
pub mod course;
pub mod course_index;
pub mod enrollment;
pub mod seed;
pub mod store;

pub use api::ApiService;
pub use config::{CONFIG_FILE_NAME, Config, load_config};
pub use course::{Course, CourseId, Enrollment, EnrollmentId};
pub use course_index::CourseIndex;
pub use enrollment::{EnrollmentError, EnrollmentReceipt, EnrollmentRequest, EnrollmentService};
pub use seed::{demo_courses, demo_store};
pub use store::{CourseCatalog, EnrollmentLedger, EnrollmentStore, StoreHandle};
