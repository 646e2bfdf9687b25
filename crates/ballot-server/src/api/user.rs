use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Deserialize;

use ballot_api::auth::CreateUserRequest;
use ballot_auth::{Permission, service::user};
use ballot_common::page_bounds;
use ballot_persistence::Role;

use crate::{
    error::AppError,
    model::{AppState, response::Result},
    secured,
    secured::Secured,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPageParam {
    role: Option<Role>,
    page_no: Option<u64>,
    page_size: Option<u64>,
}

#[get("")]
pub async fn search_page(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<SearchPageParam>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(
        Secured::builder(&req, &data)
            .permission(Permission::ManageUsers)
            .build()
    );

    let (page_no, page_size) = page_bounds(params.page_no, params.page_size);
    let page = user::search_page(data.db(), params.role, page_no, page_size).await?;

    Ok(Result::http_success(page))
}

#[post("")]
pub async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::ManageUsers)
            .build()
    );

    let request = super::validated(body)?;
    let user = user::create(
        data.db(),
        &request,
        data.configuration.password_hash_cost(),
    )
    .await?;

    tracing::info!(
        user_id = user.id,
        role = %user.role,
        created_by = actor.user_id,
        "User created"
    );

    Ok(Result::http_created(user))
}
