use sea_orm::sea_query::Table;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};

use super::models::{facility, route, route_station, station};

/// Names of every managed table, parents first.
pub const TABLES: [&str; 4] = ["stations", "routes", "route_stations", "facilities"];

/// Creates every table (and its indexes) that does not exist yet.
///
/// Foreign keys come from the `belongs_to` relations, so deleting a station
/// cascades to its facilities and route memberships inside the same statement.
pub async fn create_tables<C>(db: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    create_table(db, station::Entity).await?;
    create_table(db, route::Entity).await?;
    create_table(db, route_station::Entity).await?;
    create_table(db, facility::Entity).await?;
    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(backend.build(&table)).await?;

    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(backend.build(&index)).await?;
    }

    log::debug!("Ensured table {}", entity.table_name());
    Ok(())
}

/// Drops every managed table, children first.
pub async fn drop_tables<C>(db: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    drop_table(db, facility::Entity).await?;
    drop_table(db, route_station::Entity).await?;
    drop_table(db, route::Entity).await?;
    drop_table(db, station::Entity).await?;
    Ok(())
}

async fn drop_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let statement = Table::drop().table(entity).if_exists().to_owned();
    db.execute(backend.build(&statement)).await?;
    log::info!("Dropped table {}", entity.table_name());
    Ok(())
}
