//! Vote recording and tally endpoints

use actix_web::{HttpRequest, HttpResponse, get, post, web};

use ballot_api::election::{RecordVotesRequest, VoteSummaryQuery};
use ballot_auth::Permission;
use ballot_workflow::service::vote;

use crate::{
    error::AppError,
    model::{AppState, response::Result},
    secured,
    secured::Secured,
};

/// Insert or update the vote row of one participation at one location.
#[post("/record")]
pub async fn record(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<RecordVotesRequest>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::RecordVotes)
            .build()
    );

    let request = super::validated(body)?;
    let recorded = vote::record(data.db(), &request, &actor).await?;
    crate::metrics::record_votes(recorded.created);

    if recorded.created {
        Ok(Result::http_created(recorded.vote))
    } else {
        Ok(Result::http_success(recorded.vote))
    }
}

#[get("/summary")]
pub async fn summary(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<VoteSummaryQuery>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(Secured::builder(&req, &data).build());

    let tallies = vote::summary(data.db(), &params).await?;

    Ok(Result::http_success(tallies))
}

#[get("/candidate/{id}")]
pub async fn for_candidate(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(Secured::builder(&req, &data).build());

    let votes = vote::for_participation(data.db(), path.into_inner()).await?;

    Ok(Result::http_success(votes))
}
