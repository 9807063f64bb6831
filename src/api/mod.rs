pub mod facilities;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod stations;
pub mod validation;

use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::{app_state::AppState, database, errors::AppError};

/// Registers every resource plus the extractor settings they rely on.
///
/// Malformed JSON, bad query strings and non-numeric ids are turned into
/// `AppError`s here so every failure shares the same body shape.
pub fn configure(cfg: &mut web::ServiceConfig, max_body_bytes: usize) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(max_body_bytes)
            .error_handler(|err, _req| AppError::Parse(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::NotFound(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::Parse(err.to_string()).into()),
    )
    .service(health)
    .configure(stations::init_routes)
    .configure(routes::init_routes)
    .configure(facilities::init_routes);
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Database reachable"),
        (status = 503, description = "Database unreachable")
    )
)]
#[get("/health")]
pub async fn health(data: web::Data<AppState>) -> HttpResponse {
    match database::ping(&data.db).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "status": "ok" })),
        Err(err) => {
            log::warn!("Health check failed: {}", err);
            HttpResponse::ServiceUnavailable().json(json!({ "status": "unavailable" }))
        }
    }
}
