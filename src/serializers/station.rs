//! Station read and write shapes.
//!
//! `StationInput` is read through `Payload` rather than a serde derive so that
//! every bad field lands in one `FieldErrors` map instead of failing on the first.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::{FacilityView, Payload, WriteMode};
use crate::{
    database::{facility, station},
    errors::AppError,
};

pub const NAME_MAX_LEN: usize = 100;
pub const LOCATION_MAX_LEN: usize = 200;

/// Station as returned to clients, with its facilities nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StationView {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub facilities: Vec<FacilityView>,
}

impl StationView {
    pub fn new(model: station::Model, mut facilities: Vec<facility::Model>) -> Self {
        facilities.sort_by_key(|f| f.id);
        Self {
            id: model.id,
            name: model.name,
            location: model.location,
            facilities: facilities.into_iter().map(FacilityView::from).collect(),
        }
    }
}

/// Accepted body for station writes. `facilities` is read-only and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StationInput {
    #[schema(max_length = 100)]
    pub name: Option<String>,
    #[schema(max_length = 200)]
    pub location: Option<String>,
}

impl StationInput {
    pub fn parse(body: &Value, mode: WriteMode) -> Result<Self, AppError> {
        let mut payload = Payload::new(body, mode)?;
        let input = Self {
            name: payload.text("name", NAME_MAX_LEN, false),
            location: payload.optional_text("location", LOCATION_MAX_LEN),
        };
        payload.finish()?;
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_body() {
        let input = StationInput::parse(
            &json!({"name": "Seoul Station", "location": "Jung-gu, Seoul", "facilities": []}),
            WriteMode::Full,
        )
        .unwrap();
        assert_eq!(input.name.as_deref(), Some("Seoul Station"));
        assert_eq!(input.location.as_deref(), Some("Jung-gu, Seoul"));
    }

    #[test]
    fn location_is_optional() {
        let input = StationInput::parse(&json!({"name": "Busan"}), WriteMode::Full).unwrap();
        assert_eq!(input.location, None);
    }

    #[test]
    fn name_is_required_on_full_write() {
        let err = StationInput::parse(&json!({"location": "x"}), WriteMode::Full).unwrap_err();
        match err {
            AppError::Validation(errors) => assert!(errors.get("name").is_some()),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn view_orders_facilities_by_id() {
        let station = station::Model {
            id: 1,
            name: "Seoul".into(),
            location: String::new(),
        };
        let facilities = vec![
            facility::Model { id: 5, name: "Lockers".into(), station_id: 1 },
            facility::Model { id: 2, name: "Toilets".into(), station_id: 1 },
        ];
        let view = StationView::new(station, facilities);
        let ids: Vec<i64> = view.facilities.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2, 5]);
    }
}
