use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Operational alert produced by the notification job.
///
/// `(kind, reference_id, due_date)` is unique so a job run never raises the
/// same alert twice.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: NotificationKind,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub reference_type: String,
    pub reference_id: Uuid,
    pub due_date: NaiveDate,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[sea_orm(nullable)]
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[sea_orm(string_value = "arrival_due")]
    ArrivalDue,
    #[sea_orm(string_value = "departure_due")]
    DepartureDue,
    #[sea_orm(string_value = "departure_overdue")]
    DepartureOverdue,
    #[sea_orm(string_value = "maintenance_due")]
    MaintenanceDue,
    #[sea_orm(string_value = "maintenance_overdue")]
    MaintenanceOverdue,
    #[sea_orm(string_value = "warranty_expiring")]
    WarrantyExpiring,
    #[sea_orm(string_value = "contract_expiring")]
    ContractExpiring,
    #[sea_orm(string_value = "low_stock")]
    LowStock,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::ArrivalDue => "arrival_due",
            NotificationKind::DepartureDue => "departure_due",
            NotificationKind::DepartureOverdue => "departure_overdue",
            NotificationKind::MaintenanceDue => "maintenance_due",
            NotificationKind::MaintenanceOverdue => "maintenance_overdue",
            NotificationKind::WarrantyExpiring => "warranty_expiring",
            NotificationKind::ContractExpiring => "contract_expiring",
            NotificationKind::LowStock => "low_stock",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            NotificationKind::DepartureOverdue | NotificationKind::MaintenanceOverdue => {
                Severity::Critical
            }
            NotificationKind::WarrantyExpiring
            | NotificationKind::ContractExpiring
            | NotificationKind::LowStock
            | NotificationKind::MaintenanceDue => Severity::Warning,
            NotificationKind::ArrivalDue | NotificationKind::DepartureDue => Severity::Info,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[sea_orm(string_value = "info")]
    Info,
    #[sea_orm(string_value = "warning")]
    Warning,
    #[sea_orm(string_value = "critical")]
    Critical,
}
