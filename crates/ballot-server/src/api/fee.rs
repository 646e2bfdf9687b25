//! Nomination fee endpoints

use actix_web::{HttpRequest, HttpResponse, get, post, put, web};

use ballot_api::election::{FeeCreate, FeeQuery, FeeUpdate};
use ballot_auth::Permission;
use ballot_workflow::service::fee;

use crate::{
    error::AppError,
    model::{AppState, response::Result},
    secured,
    secured::Secured,
};

#[get("")]
pub async fn search(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<FeeQuery>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(Secured::builder(&req, &data).build());

    let fees = fee::search(data.db(), &params).await?;

    Ok(Result::http_success(fees))
}

#[post("")]
pub async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<FeeCreate>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::ManageFees)
            .build()
    );

    let payload = super::validated(body)?;
    let fee = fee::create(data.db(), data.catalog(), &payload, &actor).await?;

    Ok(Result::http_created(fee))
}

#[put("/{id}")]
pub async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<FeeUpdate>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::ManageFees)
            .build()
    );

    let payload = super::validated(body)?;
    let fee = fee::update(data.db(), path.into_inner(), &payload, &actor).await?;

    Ok(Result::http_success(fee))
}

#[get("/{fee_id}/history")]
pub async fn history(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(Secured::builder(&req, &data).build());

    let history = fee::history(data.db(), path.into_inner()).await?;

    Ok(Result::http_success(history))
}
