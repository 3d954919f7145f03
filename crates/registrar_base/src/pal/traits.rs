use std::sync::Arc;

use crate::RegistrarResult;

use super::file_path::FilePath;
use super::http::{HttpServerConfig, HttpServerHandle, HttpService};

/// Platform Abstraction Layer (PAL) trait.
///
/// Two implementations are provided:
/// - `RealPal`: the real filesystem via `std::fs` and a tiny_http server
/// - `MockPal`: in-memory files and services, for tests
pub trait Pal: std::fmt::Debug + Send + Sync + 'static {
    /// Check if a file exists at the given path.
    fn file_exists(&self, path: &FilePath) -> RegistrarResult<bool>;

    /// Read entire file contents as a UTF-8 string.
    fn read_file_to_string(&self, path: &FilePath) -> RegistrarResult<String>;

    /// Start an HTTP server with the given service.
    ///
    /// The server starts listening before this returns. It keeps serving until the
    /// returned handle (and all its clones) are dropped or `shutdown()` is called.
    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> RegistrarResult<HttpServerHandle>;
}

/// Handle to a PAL implementation, enabling shared ownership.
///
/// # Examples
///
/// ```no_run
/// use registrar_base::{RealPal, PalHandle};
///
/// let pal = PalHandle::new(RealPal::new(".".into()));
/// let pal_clone = pal.clone(); // Cheap clone, shares the same implementation
/// ```
#[derive(Debug, Clone)]
pub struct PalHandle(Arc<dyn Pal>);

impl PalHandle {
    pub fn new(pal: impl Pal + 'static) -> Self {
        Self(Arc::new(pal))
    }
}

impl std::ops::Deref for PalHandle {
    type Target = dyn Pal;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pal::mock::MockPal;

    #[test]
    fn test_pal_handle_derefs_to_implementation() {
        let mock = MockPal::new();
        mock.add_file(FilePath::from("registrar.toml"), "port = 8080");

        let pal = PalHandle::new(mock);
        let pal_clone = pal.clone();
        assert!(pal_clone.file_exists(&FilePath::from("registrar.toml")).unwrap());
    }
}
