//! Nomination fee payment endpoints

use actix_web::{HttpRequest, HttpResponse, get, post, put, web};

use ballot_api::election::{PaymentCreate, PaymentQuery, PaymentStatusUpdate};
use ballot_auth::Permission;
use ballot_workflow::service::payment;

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
    params: web::Query<PaymentQuery>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(Secured::builder(&req, &data).build());

    let payments = payment::search(data.db(), &params).await?;

    Ok(Result::http_success(payments))
}

#[get("/{id}")]
pub async fn get(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(Secured::builder(&req, &data).build());

    let payment = payment::get(data.db(), path.into_inner()).await?;

    Ok(Result::http_success(payment))
}

#[post("")]
pub async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<PaymentCreate>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::RecordPayments)
            .build()
    );

    let payload = super::validated(body)?;
    let payment = payment::create(data.db(), data.catalog(), &payload, &actor).await?;

    Ok(Result::http_created(payment))
}

#[put("/{id}/status")]
pub async fn update_status(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<PaymentStatusUpdate>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::RecordPayments)
            .build()
    );

    let payment =
        payment::update_status(data.db(), path.into_inner(), body.status, &actor).await?;

    Ok(Result::http_success(payment))
}
