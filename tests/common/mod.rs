#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test::{self, TestRequest},
};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use transit_registry::{
    database::{self, schema},
    serializers::{FacilityInput, RouteInput, StationInput},
    services,
};

/// Fresh in-memory SQLite database with the full schema.
pub async fn setup_db() -> DatabaseConnection {
    let db = database::connect_from_url("sqlite::memory:")
        .await
        .expect("in-memory database should open");
    schema::create_tables(&db)
        .await
        .expect("schema should be created");
    db
}

/// Builds the application the same way the server does, on top of `$db`.
macro_rules! init_app {
    ($db:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_web::middleware::NormalizePath::trim())
                .wrap(transit_registry::api::middleware::RequestId)
                .app_data(actix_web::web::Data::new(
                    transit_registry::app_state::AppState { db: $db.clone() },
                ))
                .configure(|cfg| transit_registry::api::configure(cfg, 1024 * 1024)),
        )
        .await
    };
}

/// Sends a request and returns the status with the decoded JSON body (`Null` when empty).
pub async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };
    (status, body)
}

pub fn get(uri: &str) -> TestRequest {
    TestRequest::get().uri(uri)
}

pub fn post(uri: &str, body: Value) -> TestRequest {
    TestRequest::post().uri(uri).set_json(body)
}

pub fn put(uri: &str, body: Value) -> TestRequest {
    TestRequest::put().uri(uri).set_json(body)
}

pub fn patch(uri: &str, body: Value) -> TestRequest {
    TestRequest::patch().uri(uri).set_json(body)
}

pub fn delete(uri: &str) -> TestRequest {
    TestRequest::delete().uri(uri)
}

pub async fn seed_station(db: &DatabaseConnection, name: &str, location: &str) -> i64 {
    let input = StationInput {
        name: Some(name.to_string()),
        location: Some(location.to_string()),
    };
    services::stations::create(db, input)
        .await
        .expect("station should be created")
        .id
}

pub async fn seed_facility(db: &DatabaseConnection, name: &str, station: i64) -> i64 {
    let input = FacilityInput {
        name: Some(name.to_string()),
        station: Some(station),
    };
    services::facilities::create(db, input)
        .await
        .expect("facility should be created")
        .id
}

pub async fn seed_route(db: &DatabaseConnection, name: &str, station_ids: &[i64]) -> i64 {
    let input = RouteInput {
        name: Some(name.to_string()),
        station_ids: Some(station_ids.to_vec()),
    };
    services::routes::create(db, input)
        .await
        .expect("route should be created")
        .id
}

/// Values of `key` for every object in a JSON array body.
pub fn pluck<'a>(body: &'a Value, key: &str) -> Vec<&'a Value> {
    body.as_array()
        .expect("body should be an array")
        .iter()
        .map(|item| &item[key])
        .collect()
}
