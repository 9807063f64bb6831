use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use serde_json::Value;

use crate::{
    api::filters::ListQuery,
    app_state::AppState,
    errors::AppError,
    serializers::{RouteInput, RouteView, WriteMode},
    services::routes,
};

// --- Route Handlers ---

#[utoipa::path(
    get,
    path = "/routes",
    tag = "Routes",
    params(ListQuery),
    responses(
        (status = 200, description = "Routes matching the search (route or member station name), in the requested order", body = [RouteView])
    )
)]
#[get("")]
pub async fn list_routes(
    data: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let routes = routes::list(&data.db, &query).await?;
    Ok(HttpResponse::Ok().json(routes))
}

#[utoipa::path(
    post,
    path = "/routes",
    tag = "Routes",
    request_body = RouteInput,
    responses(
        (status = 201, description = "Route created", body = RouteView),
        (status = 400, description = "Invalid input")
    )
)]
#[post("")]
pub async fn create_route(
    data: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let input = RouteInput::parse(&body, WriteMode::Full)?;
    let route = routes::create(&data.db, input).await?;
    Ok(HttpResponse::Created().json(route))
}

#[utoipa::path(
    get,
    path = "/routes/{id}",
    tag = "Routes",
    params(
        ("id" = i64, Path, description = "Route ID")
    ),
    responses(
        (status = 200, description = "Route found", body = RouteView),
        (status = 404, description = "Route not found")
    )
)]
#[get("/{id}")]
pub async fn get_route(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let route = routes::get(&data.db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(route))
}

#[utoipa::path(
    put,
    path = "/routes/{id}",
    tag = "Routes",
    params(
        ("id" = i64, Path, description = "Route ID")
    ),
    request_body = RouteInput,
    responses(
        (status = 200, description = "Route replaced", body = RouteView),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Route not found")
    )
)]
#[put("/{id}")]
pub async fn update_route(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let input = RouteInput::parse(&body, WriteMode::Full)?;
    let route = routes::update(&data.db, path.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(route))
}

#[utoipa::path(
    patch,
    path = "/routes/{id}",
    tag = "Routes",
    params(
        ("id" = i64, Path, description = "Route ID")
    ),
    request_body = RouteInput,
    responses(
        (status = 200, description = "Route updated", body = RouteView),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Route not found")
    )
)]
#[patch("/{id}")]
pub async fn partial_update_route(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let input = RouteInput::parse(&body, WriteMode::Partial)?;
    let route = routes::update(&data.db, path.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(route))
}

#[utoipa::path(
    delete,
    path = "/routes/{id}",
    tag = "Routes",
    params(
        ("id" = i64, Path, description = "Route ID")
    ),
    responses(
        (status = 204, description = "Route deleted; its stations are kept"),
        (status = 404, description = "Route not found")
    )
)]
#[delete("/{id}")]
pub async fn delete_route(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    routes::delete(&data.db, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/routes")
            .service(list_routes)
            .service(create_route)
            .service(get_route)
            .service(update_route)
            .service(partial_update_route)
            .service(delete_route),
    );
}
