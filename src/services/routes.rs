use std::collections::BTreeMap;

use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, EntityTrait,
    IntoActiveModel, LoaderTrait, ModelTrait, QueryFilter, Set, TransactionTrait,
};

use super::{required, stations};
use crate::{
    api::filters::{self, ListQuery, OrderField, Orderable},
    database::{route, route_station, station, DB},
    errors::{AppError, FieldErrors},
    serializers::{missing_pk, RouteInput, RouteView, StationView},
};

const STATION_IDS: &str = "station_ids";

impl Orderable for route::Entity {
    fn order_column(field: OrderField) -> route::Column {
        match field {
            OrderField::Id => route::Column::Id,
            OrderField::Name => route::Column::Name,
        }
    }
}

pub async fn list(db: &DB, query: &ListQuery) -> Result<Vec<RouteView>, AppError> {
    let select = filters::apply_search(route::Entity::find(), &query.search_terms(), |term| {
        let routes_through_matching_station = Query::select()
            .column((route_station::Entity, route_station::Column::RouteId))
            .from(route_station::Entity)
            .inner_join(
                station::Entity,
                Expr::col((station::Entity, station::Column::Id))
                    .equals((route_station::Entity, route_station::Column::StationId)),
            )
            .and_where(filters::icontains((station::Entity, station::Column::Name), term))
            .to_owned();

        Condition::any()
            .add(filters::icontains((route::Entity, route::Column::Name), term))
            .add(route::Column::Id.in_subquery(routes_through_matching_station))
    });

    let routes = filters::apply_ordering(select, &query.ordering())
        .all(db)
        .await?;
    if routes.is_empty() {
        return Ok(Vec::new());
    }

    let members = routes
        .load_many_to_many(station::Entity, route_station::Entity, db)
        .await?;

    // Stations shared between routes are shaped once.
    let unique: BTreeMap<i64, station::Model> = members
        .iter()
        .flatten()
        .map(|station| (station.id, station.clone()))
        .collect();
    let views: BTreeMap<i64, StationView> = stations::with_facilities(db, unique.into_values().collect())
        .await?
        .into_iter()
        .map(|view| (view.id, view))
        .collect();

    Ok(routes
        .into_iter()
        .zip(members)
        .map(|(route, members)| {
            let stations = members
                .iter()
                .filter_map(|station| views.get(&station.id).cloned())
                .collect();
            RouteView::new(route, stations)
        })
        .collect())
}

pub async fn get(db: &DB, id: i64) -> Result<RouteView, AppError> {
    let route = find(db, id).await?;
    load_view(db, route).await
}

/// Inserts the route and its memberships in one transaction.
pub async fn create(db: &DB, input: RouteInput) -> Result<RouteView, AppError> {
    let name = required(input.name, "name")?;
    let station_ids = required(input.station_ids, STATION_IDS)?;

    let txn = db.begin().await?;
    ensure_stations_exist(&txn, &station_ids).await?;

    let created = route::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    link_stations(&txn, created.id, &station_ids).await?;
    txn.commit().await?;

    log::info!(
        "Created route {} with {} station(s)",
        created.id,
        station_ids.len()
    );
    get(db, created.id).await
}

/// Updates the name and, when `station_ids` is given, replaces the membership set.
pub async fn update(db: &DB, id: i64, input: RouteInput) -> Result<RouteView, AppError> {
    let txn = db.begin().await?;
    let mut active_model = route::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| not_found(id))?
        .into_active_model();

    if let Some(name) = input.name {
        active_model.name = Set(name);
    }
    if active_model.is_changed() {
        active_model.update(&txn).await?;
    }

    if let Some(station_ids) = input.station_ids {
        ensure_stations_exist(&txn, &station_ids).await?;
        route_station::Entity::delete_many()
            .filter(route_station::Column::RouteId.eq(id))
            .exec(&txn)
            .await?;
        link_stations(&txn, id, &station_ids).await?;
        log::debug!("Route {} now has {} station(s)", id, station_ids.len());
    }

    txn.commit().await?;
    get(db, id).await
}

pub async fn delete(db: &DB, id: i64) -> Result<(), AppError> {
    let result = route::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(not_found(id));
    }
    log::info!("Deleted route {}", id);
    Ok(())
}

async fn load_view(db: &DB, route: route::Model) -> Result<RouteView, AppError> {
    let members = route.find_related(station::Entity).all(db).await?;
    let stations = stations::with_facilities(db, members).await?;
    Ok(RouteView::new(route, stations))
}

async fn ensure_stations_exist(txn: &DatabaseTransaction, ids: &[i64]) -> Result<(), AppError> {
    let missing = stations::missing_ids(txn, ids).await?;
    if missing.is_empty() {
        return Ok(());
    }

    log::debug!("Rejected route write: unknown station ids {:?}", missing);
    let mut errors = FieldErrors::new();
    for id in missing {
        errors.add(STATION_IDS, missing_pk(id));
    }
    Err(AppError::Validation(errors))
}

async fn link_stations<C>(db: &C, route_id: i64, station_ids: &[i64]) -> Result<(), AppError>
where
    C: ConnectionTrait,
{
    if station_ids.is_empty() {
        return Ok(());
    }
    let links = station_ids.iter().map(|&station_id| route_station::ActiveModel {
        route_id: Set(route_id),
        station_id: Set(station_id),
    });
    route_station::Entity::insert_many(links)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

async fn find(db: &DB, id: i64) -> Result<route::Model, AppError> {
    route::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| not_found(id))
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Route with id {} not found", id))
}
