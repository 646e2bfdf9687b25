use actix_web::{HttpRequest, HttpResponse, get, web};

use ballot_api::workflow::AuditQuery;
use ballot_auth::Permission;
use ballot_workflow::service::audit;

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
    params: web::Query<AuditQuery>,
) -> std::result::Result<HttpResponse, AppError> {
    secured!(
        Secured::builder(&req, &data)
            .permission(Permission::ViewAuditTrail)
            .build()
    );

    let page = audit::search_page(data.db(), &params).await?;

    Ok(Result::http_success(page))
}
