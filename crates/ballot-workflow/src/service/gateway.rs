//! Role-gated entry point for every unit, registrar and electoral position write

use ballot_auth::{AccessPolicy, Actor, WriteMode};
use ballot_common::BallotError;
use ballot_persistence::entity::pending_action;
use ballot_persistence::sea_orm::DatabaseConnection;
use ballot_persistence::{PendingActionType, RecordStatus};
use ballot_position::PositionCatalog;

use crate::service::mutation::{self, AppliedMutation, MutationRequest};
use crate::service::pending_action as pending_store;

#[derive(Clone, Debug, PartialEq)]
pub enum GatewayOutcome {
    /// Written immediately, with its audit entry
    Applied(AppliedMutation),
    /// Stored for SuperAdmin review
    Deferred(pending_action::Model),
}

/// Route a write by the actor's role: SuperAdmin writes apply at once,
/// RegionalCoordinator and DistrictRegistra writes become pending actions.
///
/// Approved records are only changed by SuperAdmin; proposals against them
/// are rejected before anything is stored.
pub async fn submit(
    db: &DatabaseConnection,
    catalog: &PositionCatalog,
    actor: &Actor,
    request: MutationRequest,
) -> anyhow::Result<GatewayOutcome> {
    let mode = actor.role.write_mode();
    if mode == WriteMode::Denied {
        return Err(BallotError::forbidden(format!(
            "role {} cannot modify {}",
            actor.role,
            request.kind.entity_type()
        ))
        .into());
    }

    mutation::validate(catalog, &request)?;

    match mode {
        WriteMode::Immediate => {
            let applied = mutation::mutate_with_audit(db, catalog, &request, actor).await?;
            Ok(GatewayOutcome::Applied(applied))
        }
        _ => {
            if request.action != PendingActionType::Create
                && mutation::current_status(db, &request).await? == RecordStatus::Approved
            {
                return Err(BallotError::forbidden(format!(
                    "approved {} can only be changed by SuperAdmin",
                    request.kind.entity_type()
                ))
                .into());
            }

            let pending = pending_store::enqueue(db, &request, actor.user_id).await?;
            Ok(GatewayOutcome::Deferred(pending))
        }
    }
}
