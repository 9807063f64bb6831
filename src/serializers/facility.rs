//! Facility read and write shapes.
//!
//! `FacilityInput` is read through `Payload` rather than a serde derive so that
//! every bad field lands in one `FieldErrors` map instead of failing on the first.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::{Payload, WriteMode};
use crate::{database::facility, errors::AppError};

pub const NAME_MAX_LEN: usize = 100;

/// Facility read shape. `station` is the raw id of the owning station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FacilityView {
    pub id: i64,
    pub name: String,
    pub station: i64,
}

impl From<facility::Model> for FacilityView {
    fn from(model: facility::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            station: model.station_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct FacilityInput {
    #[schema(max_length = 100)]
    pub name: Option<String>,
    /// Id of the owning station.
    pub station: Option<i64>,
}

impl FacilityInput {
    pub fn parse(body: &Value, mode: WriteMode) -> Result<Self, AppError> {
        let mut payload = Payload::new(body, mode)?;
        let input = Self {
            name: payload.text("name", NAME_MAX_LEN, false),
            station: payload.pk("station"),
        };
        payload.finish()?;
        Ok(input)
    }
}
