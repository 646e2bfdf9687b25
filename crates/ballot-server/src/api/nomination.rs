//! Nomination endpoints

use actix_web::{HttpRequest, HttpResponse, get, post, web};

use ballot_api::election::{NominateRequest, NominationQuery, RemoveNominationRequest};
use ballot_auth::Permission;
use ballot_workflow::service::nomination;

use crate::{
    error::AppError,
    model::{AppState, response::Result},
    secured,
    secured::Secured,
};

/// Participations with their computed `feesPaid` flag.
#[get("/candidates")]
pub async fn candidates(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<NominationQuery>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(Secured::builder(&req, &data).build());

    let candidates = nomination::list_candidates(data.db(), &params).await?;

    Ok(Result::http_success(candidates))
}

#[post("/nominate")]
pub async fn nominate(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<NominateRequest>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::Nominate)
            .build()
    );

    let request = super::validated(body)?;
    let participation = nomination::nominate(data.db(), &request, &actor).await?;
    crate::metrics::record_nomination("nominate");

    Ok(Result::http_success(participation))
}

#[post("/remove")]
pub async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<RemoveNominationRequest>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::Nominate)
            .build()
    );

    let request = super::validated(body)?;
    let participation = nomination::remove(data.db(), &request, &actor).await?;
    crate::metrics::record_nomination("remove");

    Ok(Result::http_success(participation))
}
