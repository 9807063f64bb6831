use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use serde_json::Value;

use crate::{
    api::filters::ListQuery,
    app_state::AppState,
    errors::AppError,
    serializers::{StationInput, StationView, WriteMode},
    services::stations,
};

// --- Route Handlers ---

#[utoipa::path(
    get,
    path = "/stations",
    tag = "Stations",
    params(ListQuery),
    responses(
        (status = 200, description = "Stations matching the search, in the requested order", body = [StationView])
    )
)]
#[get("")]
pub async fn list_stations(
    data: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let stations = stations::list(&data.db, &query).await?;
    Ok(HttpResponse::Ok().json(stations))
}

#[utoipa::path(
    post,
    path = "/stations",
    tag = "Stations",
    request_body = StationInput,
    responses(
        (status = 201, description = "Station created", body = StationView),
        (status = 400, description = "Invalid input")
    )
)]
#[post("")]
pub async fn create_station(
    data: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let input = StationInput::parse(&body, WriteMode::Full)?;
    let station = stations::create(&data.db, input).await?;
    Ok(HttpResponse::Created().json(station))
}

#[utoipa::path(
    get,
    path = "/stations/{id}",
    tag = "Stations",
    params(
        ("id" = i64, Path, description = "Station ID")
    ),
    responses(
        (status = 200, description = "Station found", body = StationView),
        (status = 404, description = "Station not found")
    )
)]
#[get("/{id}")]
pub async fn get_station(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let station = stations::get(&data.db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(station))
}

#[utoipa::path(
    put,
    path = "/stations/{id}",
    tag = "Stations",
    params(
        ("id" = i64, Path, description = "Station ID")
    ),
    request_body = StationInput,
    responses(
        (status = 200, description = "Station replaced", body = StationView),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Station not found")
    )
)]
#[put("/{id}")]
pub async fn update_station(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let input = StationInput::parse(&body, WriteMode::Full)?;
    let station = stations::update(&data.db, path.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(station))
}

#[utoipa::path(
    patch,
    path = "/stations/{id}",
    tag = "Stations",
    params(
        ("id" = i64, Path, description = "Station ID")
    ),
    request_body = StationInput,
    responses(
        (status = 200, description = "Station updated", body = StationView),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Station not found")
    )
)]
#[patch("/{id}")]
pub async fn partial_update_station(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let input = StationInput::parse(&body, WriteMode::Partial)?;
    let station = stations::update(&data.db, path.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(station))
}

#[utoipa::path(
    delete,
    path = "/stations/{id}",
    tag = "Stations",
    params(
        ("id" = i64, Path, description = "Station ID")
    ),
    responses(
        (status = 204, description = "Station and its facilities deleted"),
        (status = 404, description = "Station not found")
    )
)]
#[delete("/{id}")]
pub async fn delete_station(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    stations::delete(&data.db, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/stations")
            .service(list_stations)
            .service(create_station)
            .service(get_station)
            .service(update_station)
            .service(partial_update_station)
            .service(delete_station),
    );
}
