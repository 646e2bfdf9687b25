// Ballot server library: HTTP handlers, middleware, configuration and startup
// The binary in main.rs wires these together; tests drive the same routes.

pub mod api; // HTTP handlers and route tables
pub mod error; // Error to HTTP response mapping
pub mod metrics; // Domain counters and the Prometheus recorder
pub mod middleware; // HTTP middleware
pub mod model; // Configuration, application state and response envelopes
pub mod secured; // Per-handler authorization
pub mod startup; // Logging and HTTP server setup

pub use error::AppError;
pub use model::{AppState, Configuration};
pub use secured::{Secured, SecuredBuilder};
