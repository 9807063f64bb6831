use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use serde_json::Value;

use crate::{
    api::filters::ListQuery,
    app_state::AppState,
    errors::AppError,
    serializers::{FacilityInput, FacilityView, WriteMode},
    services::facilities,
};

// --- Route Handlers ---

#[utoipa::path(
    get,
    path = "/facilities",
    tag = "Facilities",
    params(ListQuery),
    responses(
        (status = 200, description = "Facilities matching the search (facility or station name), in the requested order", body = [FacilityView])
    )
)]
#[get("")]
pub async fn list_facilities(
    data: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let facilities = facilities::list(&data.db, &query).await?;
    Ok(HttpResponse::Ok().json(facilities))
}

#[utoipa::path(
    post,
    path = "/facilities",
    tag = "Facilities",
    request_body = FacilityInput,
    responses(
        (status = 201, description = "Facility created", body = FacilityView),
        (status = 400, description = "Invalid input")
    )
)]
#[post("")]
pub async fn create_facility(
    data: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let input = FacilityInput::parse(&body, WriteMode::Full)?;
    let facility = facilities::create(&data.db, input).await?;
    Ok(HttpResponse::Created().json(facility))
}

#[utoipa::path(
    get,
    path = "/facilities/{id}",
    tag = "Facilities",
    params(
        ("id" = i64, Path, description = "Facility ID")
    ),
    responses(
        (status = 200, description = "Facility found", body = FacilityView),
        (status = 404, description = "Facility not found")
    )
)]
#[get("/{id}")]
pub async fn get_facility(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let facility = facilities::get(&data.db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(facility))
}

#[utoipa::path(
    put,
    path = "/facilities/{id}",
    tag = "Facilities",
    params(
        ("id" = i64, Path, description = "Facility ID")
    ),
    request_body = FacilityInput,
    responses(
        (status = 200, description = "Facility replaced", body = FacilityView),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Facility not found")
    )
)]
#[put("/{id}")]
pub async fn update_facility(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let input = FacilityInput::parse(&body, WriteMode::Full)?;
    let facility = facilities::update(&data.db, path.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(facility))
}

#[utoipa::path(
    patch,
    path = "/facilities/{id}",
    tag = "Facilities",
    params(
        ("id" = i64, Path, description = "Facility ID")
    ),
    request_body = FacilityInput,
    responses(
        (status = 200, description = "Facility updated", body = FacilityView),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Facility not found")
    )
)]
#[patch("/{id}")]
pub async fn partial_update_facility(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let input = FacilityInput::parse(&body, WriteMode::Partial)?;
    let facility = facilities::update(&data.db, path.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(facility))
}

#[utoipa::path(
    delete,
    path = "/facilities/{id}",
    tag = "Facilities",
    params(
        ("id" = i64, Path, description = "Facility ID")
    ),
    responses(
        (status = 204, description = "Facility deleted"),
        (status = 404, description = "Facility not found")
    )
)]
#[delete("/{id}")]
pub async fn delete_facility(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    facilities::delete(&data.db, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/facilities")
            .service(list_facilities)
            .service(create_facility)
            .service(get_facility)
            .service(update_facility)
            .service(partial_update_facility)
            .service(delete_facility),
    );
}
