pub mod connector;
pub mod models;
pub mod schema;

// Re-export the primary DB types and connect helper for convenient access as `database::connect()`
pub use connector::{DB, connect, connect_from_url, connect_with_settings, ping};
pub use models::{facility, route, route_station, station};
