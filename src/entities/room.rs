use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub room_number: String,
    pub room_class_id: Uuid,
    pub floor: i32,
    pub status: RoomStatus,
    #[sea_orm(nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::room_class::Entity",
        from = "Column::RoomClassId",
        to = "super::room_class::Column::Id"
    )]
    RoomClass,
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,
}

impl Related<super::room_class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoomClass.def()
    }
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Housekeeping state of a room
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "occupied")]
    Occupied,
    #[sea_orm(string_value = "cleaning")]
    Cleaning,
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
    #[sea_orm(string_value = "out_of_service")]
    OutOfService,
}

impl RoomStatus {
    /// Rooms in these states can't be sold for any date range
    pub fn is_bookable(self) -> bool {
        !matches!(self, RoomStatus::Maintenance | RoomStatus::OutOfService)
    }
}
