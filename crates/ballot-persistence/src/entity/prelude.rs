pub use super::administrative_unit::Entity as AdministrativeUnit;
pub use super::audit_trail::Entity as AuditTrail;
pub use super::candidate::Entity as Candidate;
pub use super::candidate_participation::Entity as CandidateParticipation;
pub use super::fee::Entity as Fee;
pub use super::fee_history::Entity as FeeHistory;
pub use super::payment::Entity as Payment;
pub use super::pending_action::Entity as PendingAction;
pub use super::registrar::Entity as Registrar;
pub use super::users::Entity as Users;
pub use super::vote::Entity as Vote;
