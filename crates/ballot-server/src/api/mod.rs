// HTTP handlers, one module per resource
// Route tables live in `route`; handlers authorize through `secured!` and call workflow services.

pub mod admin_unit;
pub mod audit;
pub mod auth;
pub mod electoral_position;
pub mod fee;
pub mod metrics;
pub mod nomination;
pub mod payment;
pub mod pending_action;
pub mod position;
pub mod registrar;
pub mod route;
pub mod user;
pub mod vote;

use actix_web::{HttpResponse, web};
use serde_json::Value;
use validator::Validate;

use ballot_api::validation::describe;
use ballot_api::workflow::PendingReceipt;
use ballot_auth::Actor;
use ballot_common::BallotError;
use ballot_persistence::PendingActionType;
use ballot_workflow::service::gateway;
use ballot_workflow::{GatewayOutcome, MutationRequest};

use crate::{
    error::AppError,
    model::{AppState, response::Result},
};

/// Run a write through the gateway and answer with the applied record or a
/// `202` receipt for the queued proposal.
pub(crate) async fn submit_mutation(
    data: &AppState,
    actor: &Actor,
    request: MutationRequest,
) -> std::result::Result<HttpResponse, AppError> {
    let action = request.action;
    let entity_type = request.kind.entity_type();

    match gateway::submit(data.db(), data.catalog(), actor, request).await? {
        GatewayOutcome::Applied(applied) => {
            crate::metrics::record_direct_mutation(entity_type, action.as_str());

            let record = applied
                .record
                .unwrap_or_else(|| serde_json::json!({ "id": applied.entity_id }));

            if action == PendingActionType::Create {
                Ok(Result::<Value>::http_created(record))
            } else {
                Ok(Result::<Value>::http_success(record))
            }
        }
        GatewayOutcome::Deferred(pending) => {
            crate::metrics::record_pending_action_created(entity_type);

            tracing::info!(
                pending_action_id = pending.id,
                entity_type,
                action = action.as_str(),
                requested_by = actor.user_id,
                "Write queued for approval"
            );

            Ok(Result::<PendingReceipt>::http_accepted(PendingReceipt {
                pending_action_id: pending.id,
                status: pending.status,
                entity_type: pending.entity_type,
            }))
        }
    }
}

/// Unwrap a JSON body that must satisfy its `validator` rules.
pub(crate) fn validated<T: Validate>(body: web::Json<T>) -> std::result::Result<T, AppError> {
    let body = body.into_inner();
    body.validate()
        .map_err(|e| AppError::from(BallotError::validation(describe(&e))))?;
    Ok(body)
}

/// Blank query values count as absent.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
