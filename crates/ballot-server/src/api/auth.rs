//! Login and current-user endpoints

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use anyhow::Context;

use ballot_api::auth::{LoginRequest, LoginResponse};
use ballot_auth::{TOKEN_TYPE, service::auth, service::user};
use ballot_common::BallotError;

use crate::{
    error::AppError,
    model::{AppState, response::Result},
    secured,
    secured::Secured,
};

#[post("/login")]
pub async fn login(
    data: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> std::result::Result<HttpResponse, AppError> {
    let request = super::validated(body)?;

    let user = match user::authenticate(data.db(), &request.email, &request.password).await {
        Ok(user) => user,
        Err(err) => {
            tracing::info!(email = %request.email, "Login failed");
            return Err(err.into());
        }
    };

    let expires_in = data.configuration.token_expire_seconds();
    let access_token = auth::encode_jwt_token(
        user.id,
        &data.configuration.token_secret_key(),
        expires_in,
    )
    .context("failed to sign access token")?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(Result::http_success(LoginResponse {
        access_token,
        token_type: TOKEN_TYPE.to_string(),
        expires_in,
        user,
    }))
}

/// The authenticated caller's account.
#[get("/me")]
pub async fn me(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(Secured::builder(&req, &data).build());

    let user = user::find_by_id(data.db(), actor.user_id)
        .await?
        .ok_or_else(|| BallotError::not_found("user", actor.user_id))?;

    Ok(Result::http_success(user))
}
