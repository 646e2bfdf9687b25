//! Registrar endpoints nested under an administrative unit

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde_json::Value;

use ballot_auth::Permission;
use ballot_persistence::{AdminLevel, EntityKind};
use ballot_workflow::service::{admin_unit, registrar};
use ballot_workflow::{MutationRequest, UnitScope};

use crate::{
    error::AppError,
    model::{AppState, response::Result},
    secured,
    secured::Secured,
};

#[get("/{unit_id}/registrars")]
pub async fn list(
    req: HttpRequest,
    data: web::Data<AppState>,
    level: web::Data<AdminLevel>,
    path: web::Path<i64>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(Secured::builder(&req, &data).build());

    let scope = UnitScope::new(**level, path.into_inner());
    let registrars = registrar::list(data.db(), scope).await?;

    Ok(Result::http_success(registrars))
}

#[get("/{unit_id}/registrars/{id}")]
pub async fn get(
    req: HttpRequest,
    data: web::Data<AppState>,
    level: web::Data<AdminLevel>,
    path: web::Path<(i64, i64)>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(Secured::builder(&req, &data).build());

    let (unit_id, id) = path.into_inner();
    let registrar = registrar::get(data.db(), UnitScope::new(**level, unit_id), id).await?;

    Ok(Result::http_success(registrar))
}

#[post("/{unit_id}/registrars")]
pub async fn create(
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

    let scope = UnitScope::new(**level, path.into_inner());
    admin_unit::get(data.db(), scope.level, scope.unit_id).await?;

    let request = MutationRequest::create(EntityKind::Registrar, Some(scope), body.into_inner());

    super::submit_mutation(&data, &actor, request).await
}

#[put("/{unit_id}/registrars/{id}")]
pub async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    level: web::Data<AdminLevel>,
    path: web::Path<(i64, i64)>,
    body: web::Json<Value>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::ProposeChanges)
            .build()
    );

    let (unit_id, id) = path.into_inner();
    let scope = UnitScope::new(**level, unit_id);
    registrar::get(data.db(), scope, id).await?;

    let request =
        MutationRequest::update(EntityKind::Registrar, Some(scope), id, body.into_inner());

    super::submit_mutation(&data, &actor, request).await
}

#[delete("/{unit_id}/registrars/{id}")]
pub async fn delete(
    req: HttpRequest,
    data: web::Data<AppState>,
    level: web::Data<AdminLevel>,
    path: web::Path<(i64, i64)>,
) -> std::result::Result<HttpResponse, AppError> {
    let actor = secured!(
        Secured::builder(&req, &data)
            .permission(Permission::ProposeChanges)
            .build()
    );

    let (unit_id, id) = path.into_inner();
    let scope = UnitScope::new(**level, unit_id);
    registrar::get(data.db(), scope, id).await?;

    let request = MutationRequest::delete(EntityKind::Registrar, Some(scope), id);

    super::submit_mutation(&data, &actor, request).await
}
