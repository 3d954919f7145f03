/* 📖 # Why is the CLI minimal?

There is no argument parsing. The binary looks for an optional `registrar.toml` in the
current directory, seeds the store, starts the HTTP server and blocks until the server
thread ends. Everything else is configured through that file or `RUST_LOG`.

Exit codes:
- 0: the server shut down normally
- 1: startup failed (bad configuration, port unavailable)
*/

use std::env;
use std::process;

use registrar_base::pal::http::HttpServerConfig;
use registrar_base::tracing::init_tracing;
use registrar_base::{FilePath, PalHandle, RealPal};
use registrar_engine::{
    ApiService, CONFIG_FILE_NAME, EnrollmentStore, StoreHandle, demo_store, load_config,
};
use tracing::{error, info};

fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("Error: Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let current_dir = env::current_dir().unwrap_or_else(|e| {
        error!("Failed to get current directory: {}", e);
        process::exit(1);
    });

    let pal = PalHandle::new(RealPal::new(current_dir));

    let config = match load_config(&*pal, &FilePath::from(CONFIG_FILE_NAME)) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration:\n{:?}", e);
            process::exit(1);
        }
    };

    let store = if config.seed_demo_data {
        StoreHandle::new(demo_store())
    } else {
        StoreHandle::new(EnrollmentStore::default())
    };
    info!(
        courses = store.list_courses().len(),
        enrollments = store.enrollment_count(),
        "store ready"
    );

    let server_config = HttpServerConfig::new(config.host.clone()).with_port(config.port);
    let handle = match pal.start_http_server(Box::new(ApiService::new(store)), server_config) {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start HTTP server:\n{:?}", e);
            process::exit(1);
        }
    };

    info!("Server running on http://{}", handle.address(&config.host));
    handle.wait();
}
