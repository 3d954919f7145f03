use std::collections::HashMap;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{RegistrarError, RegistrarResult, error::ErrorKind};

use super::FilePath;
use super::http::{
    HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle, HttpService, dispatch,
};
use super::traits::Pal;

/// In-memory PAL implementation for tests.
///
/// Files live in a map and HTTP services are registered per port instead of bound to a
/// socket; [`simulate_request`](MockPal::simulate_request) drives them directly.
///
/// # Examples
///
/// ```
/// use registrar_base::{FilePath, MockPal, Pal};
///
/// let mock = MockPal::new();
/// mock.add_file(FilePath::from("registrar.toml"), "port = 8080");
/// let content = mock.read_file_to_string(&FilePath::from("registrar.toml")).unwrap();
/// assert_eq!(content, "port = 8080");
/// ```
#[derive(Debug, Clone)]
pub struct MockPal {
    files: Arc<Mutex<HashMap<FilePath, String>>>,
    http_servers: Arc<Mutex<HashMap<u16, Box<dyn HttpService>>>>,
    next_port: Arc<AtomicU16>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockPal {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            http_servers: Arc::new(Mutex::new(HashMap::new())),
            next_port: Arc::new(AtomicU16::new(10000)),
        }
    }

    /// Add a file to the mock storage.
    pub fn add_file(&self, path: FilePath, content: impl Into<String>) {
        lock(&self.files).insert(path, content.into());
    }

    /// Send a request to the service registered on `port`.
    ///
    /// Service errors are converted to 599 responses exactly as RealPal does.
    pub fn simulate_request(
        &self,
        port: u16,
        request: HttpRequest,
    ) -> RegistrarResult<HttpResponse> {
        let servers = lock(&self.http_servers);
        let service = servers
            .get(&port)
            .ok_or_else(|| crate::err!("No HTTP server registered on port {}", port))?;
        Ok(dispatch(service.as_ref(), request))
    }

    pub fn http_server_count(&self) -> usize {
        lock(&self.http_servers).len()
    }
}

impl Default for MockPal {
    fn default() -> Self {
        Self::new()
    }
}

impl Pal for MockPal {
    fn file_exists(&self, path: &FilePath) -> RegistrarResult<bool> {
        Ok(lock(&self.files).contains_key(path))
    }

    fn read_file_to_string(&self, path: &FilePath) -> RegistrarResult<String> {
        lock(&self.files).get(path).cloned().ok_or_else(|| {
            Box::new(RegistrarError::new(ErrorKind::FileError {
                path: path.as_path().to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            }))
        })
    }

    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> RegistrarResult<HttpServerHandle> {
        let port = match config.port {
            Some(p) => p,
            None => self.next_port.fetch_add(1, Ordering::SeqCst),
        };

        let mut servers = lock(&self.http_servers);
        if servers.contains_key(&port) {
            crate::bail!("Port {} is already in use", port);
        }
        servers.insert(port, service);
        Ok(HttpServerHandle::new(port))
    }
}
