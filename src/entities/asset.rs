use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Physical equipment tracked for periodic maintenance
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub asset_tag: String,
    pub name: String,
    pub category: String,
    #[sea_orm(nullable)]
    pub location: Option<String>,
    #[sea_orm(nullable)]
    pub room_id: Option<Uuid>,
    #[sea_orm(nullable)]
    pub purchase_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub purchase_cost: Option<Decimal>,
    pub status: AssetStatus,
    #[sea_orm(nullable)]
    pub maintenance_interval_days: Option<i32>,
    #[sea_orm(nullable)]
    pub last_maintenance_date: Option<NaiveDate>,
    #[sea_orm(nullable)]
    pub next_maintenance_date: Option<NaiveDate>,
    #[sea_orm(nullable)]
    pub warranty_expiry_date: Option<NaiveDate>,
    #[sea_orm(nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id"
    )]
    Room,
    #[sea_orm(has_many = "super::maintenance_log::Entity")]
    MaintenanceLogs,
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl Related<super::maintenance_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    #[sea_orm(string_value = "operational")]
    Operational,
    #[sea_orm(string_value = "under_maintenance")]
    UnderMaintenance,
    #[sea_orm(string_value = "out_of_service")]
    OutOfService,
    #[sea_orm(string_value = "retired")]
    Retired,
}

/// Next service date counted from the last service, or from purchase when
/// the asset has never been serviced.
pub fn next_maintenance_date(
    interval_days: Option<i32>,
    last_maintenance: Option<NaiveDate>,
    purchase_date: Option<NaiveDate>,
) -> Option<NaiveDate> {
    let interval = interval_days.filter(|days| *days > 0)?;
    let base = last_maintenance.or(purchase_date)?;
    base.checked_add_signed(Duration::days(i64::from(interval)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn next_maintenance_prefers_last_service() {
        assert_eq!(
            next_maintenance_date(Some(30), Some(date(2026, 3, 1)), Some(date(2025, 1, 1))),
            Some(date(2026, 3, 31))
        );
    }

    #[test]
    fn next_maintenance_falls_back_to_purchase() {
        assert_eq!(
            next_maintenance_date(Some(90), None, Some(date(2026, 1, 1))),
            Some(date(2026, 4, 1))
        );
    }

    #[test]
    fn next_maintenance_needs_interval_and_base() {
        assert_eq!(next_maintenance_date(None, Some(date(2026, 1, 1)), None), None);
        assert_eq!(next_maintenance_date(Some(0), Some(date(2026, 1, 1)), None), None);
        assert_eq!(next_maintenance_date(Some(30), None, None), None);
    }
}
