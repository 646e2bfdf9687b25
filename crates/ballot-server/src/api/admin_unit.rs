//! Administrative unit endpoints
//!
//! The same handlers serve all seven levels; each level's scope carries its
//! `AdminLevel` as app data.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde_json::Value;

use ballot_api::unit::AdminUnitQuery;
use ballot_auth::Permission;
use ballot_persistence::AdminLevel;
use ballot_workflow::MutationRequest;
use ballot_workflow::service::admin_unit;

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
    level: web::Data<AdminLevel>,
    params: web::Query<AdminUnitQuery>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(Secured::builder(&req, &data).build());

    let page = admin_unit::search_page(data.db(), **level, &params).await?;

    Ok(Result::http_success(page))
}

#[get("/{id}")]
pub async fn get(
    req: HttpRequest,
    data: web::Data<AppState>,
    level: web::Data<AdminLevel>,
    path: web::Path<i64>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(Secured::builder(&req, &data).build());

    let unit = admin_unit::get(data.db(), **level, path.into_inner()).await?;

    Ok(Result::http_success(unit))
}

#[post("")]
pub async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    level: web::Data<AdminLevel>,
    body: web::Json<Value>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::ProposeChanges)
            .build()
    );

    let request = MutationRequest::create(level.entity_kind(), None, body.into_inner());

    super::submit_mutation(&data, &actor, request).await
}

#[put("/{id}")]
pub async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    level: web::Data<AdminLevel>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::ProposeChanges)
            .build()
    );

    let request = MutationRequest::update(
        level.entity_kind(),
        None,
        path.into_inner(),
        body.into_inner(),
    );

    super::submit_mutation(&data, &actor, request).await
}

#[delete("/{id}")]
pub async fn delete(
    req: HttpRequest,
    data: web::Data<AppState>,
    level: web::Data<AdminLevel>,
    path: web::Path<i64>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::ProposeChanges)
            .build()
    );

    let request = MutationRequest::delete(level.entity_kind(), None, path.into_inner());

    super::submit_mutation(&data, &actor, request).await
}

#[put("/{id}/approve")]
pub async fn approve(
    req: HttpRequest,
    data: web::Data<AppState>,
    level: web::Data<AdminLevel>,
    path: web::Path<i64>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::DecidePendingActions)
            .build()
    );

    let unit = admin_unit::approve(data.db(), **level, path.into_inner(), &actor).await?;

    tracing::info!(
        level = level.label(),
        id = unit.id,
        approved_by = actor.user_id,
        "Administrative unit approved"
    );

    Ok(Result::http_success(unit))
}
