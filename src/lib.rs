//! Todo REST API with per-client admission limiting.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod todos;

pub use config::AppConfig;
pub use error::ApiError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
