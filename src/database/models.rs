// --- Stations ---
pub mod station {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, DeriveEntityModel)]
    #[sea_orm(table_name = "stations")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        #[sea_orm(column_type = "String(StringLen::N(100))")]
        pub name: String,
        #[sea_orm(column_type = "String(StringLen::N(200))", default_value = "")]
        pub location: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::facility::Entity")]
        Facility,
        #[sea_orm(has_many = "super::route_station::Entity")]
        RouteStation,
    }

    impl Related<super::facility::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Facility.def()
        }
    }

    impl Related<super::route_station::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::RouteStation.def()
        }
    }

    impl Related<super::route::Entity> for Entity {
        fn to() -> RelationDef {
            super::route_station::Relation::Route.def()
        }

        fn via() -> Option<RelationDef> {
            Some(super::route_station::Relation::Station.def().rev())
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

// --- Routes ---
pub mod route {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, DeriveEntityModel)]
    #[sea_orm(table_name = "routes")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        #[sea_orm(column_type = "String(StringLen::N(100))")]
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::route_station::Entity")]
        RouteStation,
    }

    impl Related<super::route_station::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::RouteStation.def()
        }
    }

    impl Related<super::station::Entity> for Entity {
        fn to() -> RelationDef {
            super::route_station::Relation::Station.def()
        }

        fn via() -> Option<RelationDef> {
            Some(super::route_station::Relation::Route.def().rev())
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

// --- Route membership (many-to-many) ---
pub mod route_station {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, DeriveEntityModel)]
    #[sea_orm(table_name = "route_stations")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub route_id: i64,
        #[sea_orm(primary_key, auto_increment = false)]
        pub station_id: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::route::Entity",
            from = "Column::RouteId",
            to = "super::route::Column::Id",
            on_delete = "Cascade"
        )]
        Route,
        #[sea_orm(
            belongs_to = "super::station::Entity",
            from = "Column::StationId",
            to = "super::station::Column::Id",
            on_delete = "Cascade"
        )]
        Station,
    }

    impl Related<super::route::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Route.def()
        }
    }

    impl Related<super::station::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Station.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

// --- Facilities ---
pub mod facility {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, DeriveEntityModel)]
    #[sea_orm(table_name = "facilities")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        #[sea_orm(column_type = "String(StringLen::N(100))")]
        pub name: String,
        #[sea_orm(indexed)]
        pub station_id: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::station::Entity",
            from = "Column::StationId",
            to = "super::station::Column::Id",
            on_delete = "Cascade"
        )]
        Station,
    }

    impl Related<super::station::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Station.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
