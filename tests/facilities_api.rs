#[macro_use]
mod common;

use actix_web::http::StatusCode;
use serde_json::json;

use common::*;

#[actix_web::test]
async fn facility_with_unknown_station_is_rejected() {
    let db = setup_db().await;
    let app = init_app!(db);

    let (status, body) = send(
        &app,
        post("/facilities/", json!({"name": "Lockers", "station": 42})).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("VALIDATION_ERROR"));
    assert_eq!(
        body["fields"]["station"],
        json!(["Invalid pk \"42\" - object does not exist."])
    );

    let (_, listed) = send(&app, get("/facilities/").to_request()).await;
    assert_eq!(listed, json!([]));
}

#[actix_web::test]
async fn facility_shape_exposes_raw_station_id() {
    let db = setup_db().await;
    let app = init_app!(db);
    let station = seed_station(&db, "Incheon", "").await;

    let (status, created) = send(
        &app,
        post("/facilities/", json!({"name": "Ticket office", "station": station})).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().expect("id should be assigned");
    assert_eq!(
        created,
        json!({"id": id, "name": "Ticket office", "station": station})
    );

    let (status, fetched) = send(&app, get(&format!("/facilities/{}", id)).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[actix_web::test]
async fn station_reference_must_be_a_pk() {
    let db = setup_db().await;
    let app = init_app!(db);

    let (status, body) = send(
        &app,
        post("/facilities/", json!({"name": "Gate", "station": {"id": 1}})).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["fields"]["station"],
        json!(["Incorrect type. Expected pk value, received object."])
    );

    let (status, body) =
        send(&app, post("/facilities/", json!({"name": "Gate"})).to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["station"], json!(["This field is required."]));

    let (status, body) = send(
        &app,
        post("/facilities/", json!({"name": "Gate", "station": null})).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["station"], json!(["This field may not be null."]));
}

#[actix_web::test]
async fn search_covers_facility_and_station_names() {
    let db = setup_db().await;
    let app = init_app!(db);
    let seoul = seed_station(&db, "Seoul Station", "").await;
    let busan = seed_station(&db, "Busan", "").await;
    let lockers = seed_facility(&db, "Lockers", seoul).await;
    let lounge = seed_facility(&db, "KTX Lounge", busan).await;
    let elevator = seed_facility(&db, "Elevator", busan).await;

    let (_, body) = send(&app, get("/facilities/?search=seoul").to_request()).await;
    assert_eq!(pluck(&body, "id"), vec![&json!(lockers)]);

    let (_, body) = send(&app, get("/facilities/?search=busan").to_request()).await;
    assert_eq!(pluck(&body, "id"), vec![&json!(lounge), &json!(elevator)]);

    let (_, body) = send(&app, get("/facilities/?search=lounge").to_request()).await;
    assert_eq!(pluck(&body, "id"), vec![&json!(lounge)]);

    let (_, body) =
        send(&app, get("/facilities/?search=busan&ordering=name").to_request()).await;
    assert_eq!(pluck(&body, "id"), vec![&json!(elevator), &json!(lounge)]);
}

#[actix_web::test]
async fn facility_can_move_between_stations() {
    let db = setup_db().await;
    let app = init_app!(db);
    let from = seed_station(&db, "Daegu", "").await;
    let to = seed_station(&db, "Dongdaegu", "").await;
    let facility = seed_facility(&db, "Bike racks", from).await;
    let uri = format!("/facilities/{}/", facility);

    let (status, body) = send(&app, patch(&uri, json!({"station": to})).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": facility, "name": "Bike racks", "station": to}));

    let (_, old_station) = send(&app, get(&format!("/stations/{}/", from)).to_request()).await;
    assert_eq!(old_station["facilities"], json!([]));
    let (_, new_station) = send(&app, get(&format!("/stations/{}/", to)).to_request()).await;
    assert_eq!(new_station["facilities"][0]["id"], json!(facility));

    let (status, body) = send(&app, patch(&uri, json!({"station": 777})).to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["station"].is_array());

    let (status, body) = send(
        &app,
        put(&uri, json!({"name": "Bicycle parking", "station": from})).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": facility, "name": "Bicycle parking", "station": from})
    );
}

#[actix_web::test]
async fn delete_removes_only_the_facility() {
    let db = setup_db().await;
    let app = init_app!(db);
    let station = seed_station(&db, "Gwangju", "").await;
    let facility = seed_facility(&db, "Pharmacy", station).await;
    let uri = format!("/facilities/{}/", facility);

    let (status, body) = send(&app, delete(&uri).to_request()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = send(&app, get(&uri).to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, delete(&uri).to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, get(&format!("/stations/{}/", station)).to_request()).await;
    assert_eq!(status, StatusCode::OK);
}
