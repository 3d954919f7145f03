use std::fs;
use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};

use crate::{RegistrarError, RegistrarResult, error::ErrorKind};

use super::FilePath;
use super::http::{
    HttpMethod, HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle, HttpService,
    HttpStatusCode, dispatch,
};
use super::traits::Pal;

/* 📖 # Why a blocking tiny_http loop instead of an async runtime?

The service state is a handful of in-memory vectors and every request finishes in
microseconds. One thread that receives and answers requests in order is enough, and it
keeps request handling strictly sequential. The loop polls with a short timeout so it
notices the shutdown flag.
*/

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Concrete PAL implementation using std::fs and tiny_http.
///
/// All file paths are resolved relative to a configured base directory.
#[derive(Debug)]
pub struct RealPal {
    base_dir: PathBuf,
}

impl RealPal {
    /// Create a new RealPal with the given base directory.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    fn resolve_path(&self, path: &FilePath) -> PathBuf {
        path.resolve(&self.base_dir)
    }
}

impl Pal for RealPal {
    #[instrument(skip(self), fields(path = %path))]
    fn file_exists(&self, path: &FilePath) -> RegistrarResult<bool> {
        let resolved = self.resolve_path(path);
        let exists = resolved.is_file();
        debug!(exists, resolved = %resolved.display(), "checked file existence");
        Ok(exists)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn read_file_to_string(&self, path: &FilePath) -> RegistrarResult<String> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "reading file");
        fs::read_to_string(&resolved).map_err(|e| {
            debug!(error = %e, "failed to read file");
            Box::new(RegistrarError::new(ErrorKind::FileError {
                path: resolved,
                source: e,
            }))
        })
    }

    #[instrument(skip(self, service), fields(address = %config.address()))]
    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> RegistrarResult<HttpServerHandle> {
        let address = config.address();
        let server = tiny_http::Server::http(address.as_str())
            .map_err(|e| crate::err!("Failed to bind HTTP server to {}: {}", address, e))?;
        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .ok_or_else(|| crate::err!("HTTP server on {} has no IP address", address))?;

        let handle = HttpServerHandle::new(port);
        let shutdown = handle.shutdown_flag().clone();
        let server_name = config.server_name.clone();
        let worker = thread::Builder::new()
            .name(format!("http-{}", port))
            .spawn(move || serve_requests(server, service, shutdown, server_name))
            .map_err(|e| crate::err!("Failed to spawn HTTP server thread: {}", e))?;

        info!(port, "HTTP server listening");
        Ok(handle.with_worker(worker))
    }
}

fn serve_requests(
    server: tiny_http::Server,
    service: Box<dyn HttpService>,
    shutdown: Arc<AtomicBool>,
    server_name: String,
) {
    while !shutdown.load(Ordering::SeqCst) {
        match server.recv_timeout(POLL_INTERVAL) {
            Ok(Some(request)) => answer(service.as_ref(), request, &server_name),
            Ok(None) => {}
            Err(e) => {
                error!(error = %e, "HTTP server stopped receiving requests");
                break;
            }
        }
    }
    debug!("HTTP server loop exited");
}

fn answer(service: &dyn HttpService, mut request: tiny_http::Request, server_name: &str) {
    let response = match to_pal_request(&mut request) {
        Ok(pal_request) => dispatch(service, pal_request),
        Err(response) => response,
    };

    let (status, headers, body) = response.into_parts();
    let mut tiny_headers: Vec<tiny_http::Header> = headers
        .iter()
        .filter_map(|(key, value)| {
            tiny_http::Header::from_bytes(key.as_bytes(), value.as_bytes()).ok()
        })
        .collect();
    if let Ok(header) = tiny_http::Header::from_bytes(&b"Server"[..], server_name.as_bytes()) {
        tiny_headers.push(header);
    }

    let body = body.into_bytes();
    let length = body.len();
    let tiny_response = tiny_http::Response::new(
        tiny_http::StatusCode(status.as_u16()),
        tiny_headers,
        Cursor::new(body),
        Some(length),
        None,
    );
    if let Err(e) = request.respond(tiny_response) {
        warn!(error = %e, "failed to write HTTP response");
    }
}

/// Convert a tiny_http request, or produce the response to send if that is impossible.
fn to_pal_request(request: &mut tiny_http::Request) -> Result<HttpRequest, HttpResponse> {
    let method_name = request.method().to_string();
    let Some(method) = HttpMethod::parse(&method_name) else {
        debug!(method = %method_name, "unsupported HTTP method");
        return Err(
            HttpResponse::text(format!("Cannot {} {}", method_name, request.url()))
                .with_status(HttpStatusCode::MethodNotAllowed),
        );
    };

    let mut body = Vec::new();
    if let Err(e) = request.as_reader().read_to_end(&mut body) {
        warn!(error = %e, "failed to read request body");
        return Err(HttpResponse::text("Invalid request body.")
            .with_status(HttpStatusCode::BadRequest));
    }

    let mut pal_request = HttpRequest::new(method, request.url()).with_body(body);
    for header in request.headers() {
        pal_request =
            pal_request.with_header(header.field.as_str().as_str(), header.value.as_str());
    }
    Ok(pal_request)
}
