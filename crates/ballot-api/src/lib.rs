//! Ballot API - request, query and response models
//!
//! Request bodies carry `validator` rules; query strings are plain structs
//! deserialized by the HTTP layer.

pub mod auth;
pub mod election;
pub mod model;
pub mod unit;
pub mod validation;
pub mod workflow;

pub use model::{AdminUnitRefs, Page};
