//! Ballot Persistence - Database entities
//!
//! This crate provides:
//! - SeaORM entity definitions for every stored record
//! - String-backed active enums shared with the API layer
//! - Small helpers for JSON snapshot columns and unique-key violations

pub mod entity;
pub mod support;

// Re-export sea-orm for convenience
pub use sea_orm;

// Re-export entity prelude
pub use entity::prelude::*;

pub use entity::sea_orm_active_enums::{
    AdminLevel, EntityKind, PaymentStatus, PendingActionType, PendingStatus, RecordStatus, Role,
};
pub use support::{now, snapshot, unique_violation};
