pub mod service;

pub use service::ApiService;
