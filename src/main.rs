use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use dotenvy::dotenv;
use std::io;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use transit_registry::{
    api::{self, facilities, middleware::RequestId, routes, stations},
    app_state::AppState,
    config::Config,
    database::{self, schema},
    serializers::{FacilityInput, FacilityView, RouteInput, RouteView, StationInput, StationView},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health,
        // Stations
        stations::list_stations,
        stations::create_station,
        stations::get_station,
        stations::update_station,
        stations::partial_update_station,
        stations::delete_station,
        // Routes
        routes::list_routes,
        routes::create_route,
        routes::get_route,
        routes::update_route,
        routes::partial_update_route,
        routes::delete_route,
        // Facilities
        facilities::list_facilities,
        facilities::create_facility,
        facilities::get_facility,
        facilities::update_facility,
        facilities::partial_update_facility,
        facilities::delete_facility,
    ),
    components(
        schemas(
            // --- Read shapes ---
            StationView,
            RouteView,
            FacilityView,
            // --- Write shapes ---
            StationInput,
            RouteInput,
            FacilityInput,
        )
    ),
    tags(
        (name = "Stations", description = "Stations with their nested facilities"),
        (name = "Routes", description = "Routes and their member stations"),
        (name = "Facilities", description = "Facilities owned by a station"),
        (name = "Health", description = "Liveness of the service and its database")
    )
)]
struct ApiDoc;

fn build_cors(config: &Config) -> Cors {
    let origins = config.allowed_origins();
    if origins.is_empty() {
        return Cors::permissive();
    }
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .expose_headers(["x-request-id"])
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Failed to load configuration: {}", e),
        )
    })?;
    let db = database::connect().await?;

    if config.should_auto_migrate() {
        schema::create_tables(&db)
            .await
            .map_err(|e| io::Error::other(format!("Failed to create tables: {}", e)))?;
        log::info!("Database schema is up to date");
    }

    let host = config.host.clone();
    let port = config.port;
    let max_body_bytes = config.effective_max_body_bytes();
    let workers = config.effective_workers();

    log::info!("Starting server at http://{}:{} with {} workers", host, port, workers);
    log::info!("Swagger UI available at http://{}:{}/swagger-ui/index.html", host, port);

    let state = web::Data::new(AppState { db });

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::NormalizePath::trim())
            .wrap(RequestId)
            .wrap(middleware::Logger::default())
            .wrap(build_cors(&config))
            .app_data(state.clone())
            .configure(|cfg| api::configure(cfg, max_body_bytes))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
