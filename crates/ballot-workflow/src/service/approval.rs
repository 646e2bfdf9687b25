//! Approval executor: SuperAdmin decisions on pending actions

use ballot_api::workflow::PendingDecisionRequest;
use ballot_auth::Actor;
use ballot_common::BallotError;
use ballot_persistence::entity::pending_action;
use ballot_persistence::PendingStatus;
use ballot_persistence::sea_orm::*;
use ballot_position::PositionCatalog;

use crate::service::mutation::{self, Attribution};
use crate::service::{audit, pending_action as pending_store};

/// Approve or reject a pending action.
///
/// An approval replays the stored request (or `decision.data` when given) and
/// marks the action approved in one transaction. If the replay fails the
/// action stays `PENDING` and the error is returned.
pub async fn decide(
    db: &DatabaseConnection,
    catalog: &PositionCatalog,
    id: i64,
    decision: &PendingDecisionRequest,
    approver: &Actor,
) -> anyhow::Result<pending_action::Model> {
    if !approver.is_super_admin() {
        return Err(BallotError::forbidden("only SuperAdmin can decide pending actions").into());
    }

    let action = pending_store::get(db, id).await?;
    if action.status != PendingStatus::Pending {
        return Err(BallotError::AlreadyProcessed(id).into());
    }

    match decision.status {
        PendingStatus::Pending => {
            return Err(BallotError::validation("status must be APPROVED or REJECTED").into());
        }
        PendingStatus::Rejected => {
            pending_store::mark_decided(
                db,
                id,
                pending_store::Decision {
                    status: PendingStatus::Rejected,
                    approved_by: approver.user_id,
                    entity_id: None,
                    data: None,
                },
            )
            .await?;

            tracing::info!(
                pending_action_id = id,
                approver = approver.user_id,
                "Rejected pending action"
            );
        }
        PendingStatus::Approved => {
            approve(db, catalog, &action, decision, approver).await?;

            tracing::info!(
                pending_action_id = id,
                approver = approver.user_id,
                "Approved pending action"
            );
        }
    }

    pending_store::get(db, id).await
}

async fn approve(
    db: &DatabaseConnection,
    catalog: &PositionCatalog,
    action: &pending_action::Model,
    decision: &PendingDecisionRequest,
    approver: &Actor,
) -> anyhow::Result<()> {
    let mut request = pending_store::to_request(action)?;
    if let Some(data) = &decision.data {
        request.data = data.clone();
    }
    mutation::validate(catalog, &request)?;

    let txn = db.begin().await?;

    let applied = mutation::apply(
        &txn,
        catalog,
        &request,
        Attribution::approval(action.requested_by, approver.user_id),
    )
    .await?;

    audit::record(
        &txn,
        mutation::audit_entry(&request, &applied, approver.user_id, Some(action.id)),
    )
    .await?;

    pending_store::mark_decided(
        &txn,
        action.id,
        pending_store::Decision {
            status: PendingStatus::Approved,
            approved_by: approver.user_id,
            entity_id: Some(applied.entity_id),
            data: decision.data.as_ref().map(|data| data.to_string()),
        },
    )
    .await?;

    txn.commit().await?;

    Ok(())
}
