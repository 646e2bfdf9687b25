use actix_web::{HttpResponse, get, web};

use crate::model::AppState;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Prometheus text exposition of the domain counters.
#[get("/metrics")]
pub async fn render(data: web::Data<AppState>) -> HttpResponse {
    match &data.prometheus {
        Some(handle) => HttpResponse::Ok()
            .content_type(PROMETHEUS_CONTENT_TYPE)
            .body(handle.render()),
        None => HttpResponse::NotFound().finish(),
    }
}
