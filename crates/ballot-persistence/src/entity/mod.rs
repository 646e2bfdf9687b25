pub mod prelude;

pub mod administrative_unit;
pub mod audit_trail;
pub mod candidate;
pub mod candidate_participation;
pub mod fee;
pub mod fee_history;
pub mod payment;
pub mod pending_action;
pub mod registrar;
pub mod sea_orm_active_enums;
pub mod users;
pub mod vote;
