//! Position catalog endpoints for pickers and selection previews

use std::collections::BTreeMap;

use actix_web::{HttpRequest, HttpResponse, get, post, web};

use ballot_api::election::{PositionOptionsQuery, PositionSelectionRequest};
use ballot_common::BallotError;
use ballot_position::{PositionSelection, Resolution};

use crate::{
    error::AppError,
    model::{AppState, response::Result},
    secured,
    secured::Secured,
};

/// Election types with their levels.
#[get("")]
pub async fn catalog(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(Secured::builder(&req, &data).build());

    let catalog = data.catalog();
    let mut election_types: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for election_type in catalog.election_types() {
        let levels = catalog.levels(election_type).map_err(BallotError::from)?;
        election_types.insert(election_type, levels);
    }

    Ok(Result::http_success(election_types))
}

#[get("/options")]
pub async fn options(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<PositionOptionsQuery>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(Secured::builder(&req, &data).build());

    let mut prefix: Vec<&str> = Vec::with_capacity(3);
    let mut gap = false;
    for key in [
        &params.category,
        &params.subcategory,
        &params.nested_category,
    ] {
        match super::non_empty(key.as_deref()) {
            Some(_) if gap => {
                return Err(BallotError::validation(
                    "category, subcategory and nestedCategory must be given in order",
                )
                .into());
            }
            Some(key) => prefix.push(key),
            None => gap = true,
        }
    }

    let options = data
        .catalog()
        .options(&params.election_type, &params.level, &prefix)
        .map_err(BallotError::from)?;

    Ok(Result::http_success(options))
}

/// Preview a selection: the resolved path, or the slot still to fill.
#[post("/resolve")]
pub async fn resolve(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<PositionSelectionRequest>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(Secured::builder(&req, &data).build());

    let request = super::validated(body)?;
    let selection = PositionSelection {
        category: request.category,
        subcategory: request.subcategory,
        nested_category: request.nested_category,
        position: request.position,
    };

    let resolution: Resolution = data
        .catalog()
        .resolve(&request.election_type, &request.level, &selection)
        .map_err(BallotError::from)?;

    Ok(Result::http_success(resolution))
}
