//! Ballot Workflow - entity stores and the maker-checker workflow
//!
//! This crate provides:
//! - Store services for administrative units, registrars and electoral positions
//! - The role-gated mutation gateway and the pending action store
//! - The approval executor replaying approved proposals in one transaction
//! - Fee, payment, nomination and vote rules
//! - Audit trail recording and queries

pub mod service;

pub use service::gateway::GatewayOutcome;
pub use service::mutation::{AppliedMutation, Attribution, MutationRequest, UnitScope};
