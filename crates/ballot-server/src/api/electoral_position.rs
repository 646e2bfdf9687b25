//! Electoral position (candidate participation) endpoints

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde_json::Value;

use ballot_api::election::ElectoralPositionQuery;
use ballot_auth::Permission;
use ballot_persistence::EntityKind;
use ballot_workflow::MutationRequest;
use ballot_workflow::service::candidate;

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
    params: web::Query<ElectoralPositionQuery>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(Secured::builder(&req, &data).build());

    let page = candidate::search_page(data.db(), &params).await?;

    Ok(Result::http_success(page))
}

#[get("/{id}")]
pub async fn get(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(Secured::builder(&req, &data).build());

    let view = candidate::get_view(data.db(), path.into_inner()).await?;

    Ok(Result::http_success(view))
}

#[post("")]
pub async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<Value>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::ProposeChanges)
            .build()
    );

    let request = MutationRequest::create(EntityKind::ElectoralPosition, None, body.into_inner());

    super::submit_mutation(&data, &actor, request).await
}

#[put("/{id}")]
pub async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::ProposeChanges)
            .build()
    );

    let request = MutationRequest::update(
        EntityKind::ElectoralPosition,
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
    path: web::Path<i64>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::ProposeChanges)
            .build()
    );

    let request = MutationRequest::delete(EntityKind::ElectoralPosition, None, path.into_inner());

    super::submit_mutation(&data, &actor, request).await
}
