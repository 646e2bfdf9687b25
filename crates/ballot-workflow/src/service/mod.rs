pub mod admin_unit;
pub mod approval;
pub mod audit;
pub mod candidate;
pub mod fee;
pub mod gateway;
pub mod mutation;
pub mod nomination;
pub mod payment;
pub mod pending_action;
pub mod registrar;
pub mod vote;
