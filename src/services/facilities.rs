use sea_orm::sea_query::Query;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, Set};

use super::{required, stations};
use crate::{
    api::filters::{self, ListQuery, OrderField, Orderable},
    database::{facility, station, DB},
    errors::{AppError, FieldErrors},
    serializers::{missing_pk, FacilityInput, FacilityView},
};

impl Orderable for facility::Entity {
    fn order_column(field: OrderField) -> facility::Column {
        match field {
            OrderField::Id => facility::Column::Id,
            OrderField::Name => facility::Column::Name,
        }
    }
}

pub async fn list(db: &DB, query: &ListQuery) -> Result<Vec<FacilityView>, AppError> {
    let select = filters::apply_search(facility::Entity::find(), &query.search_terms(), |term| {
        let matching_stations = Query::select()
            .column(station::Column::Id)
            .from(station::Entity)
            .and_where(filters::icontains((station::Entity, station::Column::Name), term))
            .to_owned();

        Condition::any()
            .add(filters::icontains((facility::Entity, facility::Column::Name), term))
            .add(facility::Column::StationId.in_subquery(matching_stations))
    });

    let facilities = filters::apply_ordering(select, &query.ordering())
        .all(db)
        .await?;
    Ok(facilities.into_iter().map(FacilityView::from).collect())
}

pub async fn get(db: &DB, id: i64) -> Result<FacilityView, AppError> {
    Ok(find(db, id).await?.into())
}

pub async fn create(db: &DB, input: FacilityInput) -> Result<FacilityView, AppError> {
    let name = required(input.name, "name")?;
    let station_id = required(input.station, "station")?;
    ensure_station_exists(db, station_id).await?;

    let facility = facility::ActiveModel {
        name: Set(name),
        station_id: Set(station_id),
        ..Default::default()
    };

    let created = facility.insert(db).await?;
    log::info!(
        "Created facility {} at station {}",
        created.id,
        created.station_id
    );
    Ok(created.into())
}

pub async fn update(db: &DB, id: i64, input: FacilityInput) -> Result<FacilityView, AppError> {
    let existing = find(db, id).await?;
    let mut active_model = existing.clone().into_active_model();

    if let Some(name) = input.name {
        active_model.name = Set(name);
    }
    if let Some(station_id) = input.station {
        ensure_station_exists(db, station_id).await?;
        active_model.station_id = Set(station_id);
    }

    if !active_model.is_changed() {
        return Ok(existing.into());
    }
    let updated = active_model.update(db).await?;
    Ok(updated.into())
}

pub async fn delete(db: &DB, id: i64) -> Result<(), AppError> {
    let result = facility::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(not_found(id));
    }
    log::info!("Deleted facility {}", id);
    Ok(())
}

async fn ensure_station_exists(db: &DB, station_id: i64) -> Result<(), AppError> {
    if stations::missing_ids(db, &[station_id]).await?.is_empty() {
        return Ok(());
    }
    log::debug!("Rejected facility write: station {} does not exist", station_id);
    Err(AppError::Validation(FieldErrors::single(
        "station",
        missing_pk(station_id),
    )))
}

async fn find(db: &DB, id: i64) -> Result<facility::Model, AppError> {
    facility::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| not_found(id))
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Facility with id {} not found", id))
}
