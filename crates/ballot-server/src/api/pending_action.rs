//! Pending action review endpoints; SuperAdmin only

use actix_web::{HttpRequest, HttpResponse, get, put, web};

use ballot_api::workflow::{PendingActionQuery, PendingDecisionRequest};
use ballot_auth::Permission;
use ballot_workflow::service::{approval, pending_action};

use crate::{
    error::AppError,
    model::{AppState, response::Result},
    secured,
    secured::Secured,
};

#[get("")]
pub async fn search_page(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<PendingActionQuery>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(
        Secured::builder(&req, &data)
            .permission(Permission::DecidePendingActions)
            .build()
    );

    let page = pending_action::search_page(data.db(), &params).await?;

    Ok(Result::http_success(page))
}

#[get("/{id}")]
pub async fn get(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(
        Secured::builder(&req, &data)
            .permission(Permission::DecidePendingActions)
            .build()
    );

    let action = pending_action::get(data.db(), path.into_inner()).await?;

    Ok(Result::http_success(action))
}

/// Approve or reject. An approval replays the proposal, so it can fail with
/// the same errors as a direct write; the action then stays pending.
#[put("/{id}")]
pub async fn decide(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<PendingDecisionRequest>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::DecidePendingActions)
            .build()
    );

    let action = approval::decide(
        data.db(),
        data.catalog(),
        path.into_inner(),
        &body,
        &actor,
    )
    .await?;

    crate::metrics::record_pending_action_decided(action.status.as_str());

    Ok(Result::http_success(action))
}
