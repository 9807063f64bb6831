//! Route read and write shapes.
//!
//! `RouteInput` is read through `Payload` rather than a serde derive so that
//! every bad field lands in one `FieldErrors` map instead of failing on the first.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::{Payload, StationView, WriteMode};
use crate::{database::route, errors::AppError};

pub const NAME_MAX_LEN: usize = 100;

/// Route read shape. Member stations are nested in full; `station_ids` never appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RouteView {
    pub id: i64,
    pub name: String,
    pub stations: Vec<StationView>,
}

impl RouteView {
    pub fn new(model: route::Model, mut stations: Vec<StationView>) -> Self {
        stations.sort_by_key(|s| s.id);
        Self {
            id: model.id,
            name: model.name,
            stations,
        }
    }
}

/// Route write shape. `station_ids` replaces the whole membership set when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RouteInput {
    #[schema(max_length = 100)]
    pub name: Option<String>,
    pub station_ids: Option<Vec<i64>>,
}

impl RouteInput {
    pub fn parse(body: &Value, mode: WriteMode) -> Result<Self, AppError> {
        let mut payload = Payload::new(body, mode)?;
        let input = Self {
            name: payload.text("name", NAME_MAX_LEN, false),
            station_ids: payload.pk_list("station_ids"),
        };
        payload.finish()?;
        Ok(input)
    }
}
