//! Data models module
//!
//! - `config` - Configuration management
//! - `app_state` - Application state shared across handlers
//! - `response` - HTTP response envelopes (Result, ErrorResult)

pub mod app_state;
pub mod config;
pub mod response;

pub use app_state::AppState;
pub use config::Configuration;
pub use response::{ErrorResult, Result};
