/* 📖 # Why one lock around both collections?

An enrollment reads the catalog, appends to the ledger and decrements a course in one
step. Keeping catalog and ledger behind a single RwLock makes that step atomic for
every caller of StoreHandle, whether or not the transport ever handles requests in
parallel. Readers get owned copies so no lock outlives a call.
*/

pub mod catalog;
pub mod ledger;

use std::sync::Arc;

use parking_lot::RwLock;

use crate::course::{Course, CourseId, Enrollment};

pub use catalog::CourseCatalog;
pub use ledger::EnrollmentLedger;

/// The mutable state of the registrar.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentStore {
    pub catalog: CourseCatalog,
    pub ledger: EnrollmentLedger,
}

impl EnrollmentStore {
    pub fn new(catalog: CourseCatalog, ledger: EnrollmentLedger) -> Self {
        Self { catalog, ledger }
    }
}

/// A thread-safe, cheaply cloneable handle to the [`EnrollmentStore`].
#[derive(Debug, Clone, Default)]
pub struct StoreHandle(Arc<RwLock<EnrollmentStore>>);

impl StoreHandle {
    pub fn new(store: EnrollmentStore) -> Self {
        Self(Arc::new(RwLock::new(store)))
    }

    /// Run `f` with shared access to the store.
    pub fn read<R>(&self, f: impl FnOnce(&EnrollmentStore) -> R) -> R {
        f(&self.0.read())
    }

    /// Run `f` with exclusive access to the store.
    pub fn write<R>(&self, f: impl FnOnce(&mut EnrollmentStore) -> R) -> R {
        f(&mut self.0.write())
    }

    /// All courses in stored order.
    pub fn list_courses(&self) -> Vec<Course> {
        self.read(|store| store.catalog.list_all().to_vec())
    }

    /// All courses, most popular first.
    pub fn list_courses_by_popularity(&self) -> Vec<Course> {
        self.read(|store| store.catalog.list_by_popularity_descending())
    }

    pub fn find_course(&self, id: CourseId) -> Option<Course> {
        self.read(|store| store.catalog.find_by_id(id).cloned())
    }

    /// All enrollments in insertion order.
    pub fn list_enrollments(&self) -> Vec<Enrollment> {
        self.read(|store| store.ledger.list_all().to_vec())
    }

    pub fn enrollment_count(&self) -> usize {
        self.read(|store| store.ledger.len())
    }
}
