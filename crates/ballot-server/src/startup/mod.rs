//! Application startup: logging and the HTTP server

mod http;
mod logging;

pub use http::main_server;
pub use logging::{LoggingConfig, LoggingGuard, init_logging};
