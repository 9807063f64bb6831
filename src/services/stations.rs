use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel,
    LoaderTrait, ModelTrait, QueryFilter, Set,
};

use super::required;
use crate::{
    api::filters::{self, ListQuery, OrderField, Orderable},
    database::{facility, station, DB},
    errors::AppError,
    serializers::{StationInput, StationView},
};

impl Orderable for station::Entity {
    fn order_column(field: OrderField) -> station::Column {
        match field {
            OrderField::Id => station::Column::Id,
            OrderField::Name => station::Column::Name,
        }
    }
}

pub async fn list(db: &DB, query: &ListQuery) -> Result<Vec<StationView>, AppError> {
    let select = filters::apply_search(station::Entity::find(), &query.search_terms(), |term| {
        Condition::any()
            .add(filters::icontains((station::Entity, station::Column::Name), term))
            .add(filters::icontains((station::Entity, station::Column::Location), term))
    });
    let stations = filters::apply_ordering(select, &query.ordering())
        .all(db)
        .await?;
    with_facilities(db, stations).await
}

pub async fn get(db: &DB, id: i64) -> Result<StationView, AppError> {
    let station = find(db, id).await?;
    let facilities = station.find_related(facility::Entity).all(db).await?;
    Ok(StationView::new(station, facilities))
}

pub async fn create(db: &DB, input: StationInput) -> Result<StationView, AppError> {
    let station = station::ActiveModel {
        name: Set(required(input.name, "name")?),
        location: Set(input.location.unwrap_or_default()),
        ..Default::default()
    };

    let created = station.insert(db).await?;
    log::info!("Created station {} ({})", created.id, created.name);
    Ok(StationView::new(created, Vec::new()))
}

pub async fn update(db: &DB, id: i64, input: StationInput) -> Result<StationView, AppError> {
    let mut active_model = find(db, id).await?.into_active_model();

    if let Some(name) = input.name {
        active_model.name = Set(name);
    }
    if let Some(location) = input.location {
        active_model.location = Set(location);
    }

    if active_model.is_changed() {
        active_model.update(db).await?;
    }
    get(db, id).await
}

/// Removes the station. Facilities and route memberships go with it via the foreign keys.
pub async fn delete(db: &DB, id: i64) -> Result<(), AppError> {
    let result = station::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(not_found(id));
    }
    log::info!("Deleted station {} and its facilities", id);
    Ok(())
}

/// Shapes stations for output, loading all their facilities in one query.
pub(crate) async fn with_facilities<C>(
    db: &C,
    stations: Vec<station::Model>,
) -> Result<Vec<StationView>, AppError>
where
    C: ConnectionTrait,
{
    if stations.is_empty() {
        return Ok(Vec::new());
    }
    let facilities = stations.load_many(facility::Entity, db).await?;
    Ok(stations
        .into_iter()
        .zip(facilities)
        .map(|(station, facilities)| StationView::new(station, facilities))
        .collect())
}

/// Ids from `ids` that have no station row.
pub(crate) async fn missing_ids<C>(db: &C, ids: &[i64]) -> Result<Vec<i64>, AppError>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let existing: Vec<i64> = station::Entity::find()
        .filter(station::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?
        .into_iter()
        .map(|station| station.id)
        .collect();

    Ok(ids
        .iter()
        .copied()
        .filter(|id| !existing.contains(id))
        .collect())
}

async fn find(db: &DB, id: i64) -> Result<station::Model, AppError> {
    station::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| not_found(id))
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Station with id {} not found", id))
}
