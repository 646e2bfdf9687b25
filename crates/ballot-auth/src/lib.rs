//! Ballot Auth - Authentication and authorization
//!
//! This crate provides:
//! - JWT token handling with a decoded-token cache
//! - The role to permission policy
//! - User account services

pub mod model;
pub mod policy;
pub mod service;

// Re-export commonly used types
pub use model::*;
pub use policy::{AccessPolicy, Permission, WriteMode};
