use crate::{
    db::DbPool,
    entities::{
        asset::{self, next_maintenance_date, AssetStatus},
        maintenance_log, room,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{business_date, non_negative_decimal},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateAssetInput {
    #[validate(length(min = 1, max = 50))]
    #[schema(example = "HVAC-0007")]
    pub asset_tag: String,
    #[validate(length(min = 1, max = 200))]
    #[schema(example = "Rooftop air handler")]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    #[schema(example = "hvac")]
    pub category: String,
    pub location: Option<String>,
    pub room_id: Option<Uuid>,
    pub purchase_date: Option<NaiveDate>,
    #[validate(custom = "non_negative_decimal")]
    #[schema(value_type = Option<String>)]
    pub purchase_cost: Option<Decimal>,
    #[validate(range(min = 1, max = 3650))]
    pub maintenance_interval_days: Option<i32>,
    pub last_maintenance_date: Option<NaiveDate>,
    pub warranty_expiry_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateAssetInput {
    #[validate(length(min = 1, max = 50))]
    pub asset_tag: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    pub location: Option<String>,
    pub room_id: Option<Uuid>,
    pub purchase_date: Option<NaiveDate>,
    #[validate(custom = "non_negative_decimal")]
    #[schema(value_type = Option<String>)]
    pub purchase_cost: Option<Decimal>,
    #[validate(range(min = 1, max = 3650))]
    pub maintenance_interval_days: Option<i32>,
    pub warranty_expiry_date: Option<NaiveDate>,
    pub status: Option<AssetStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct RecordMaintenanceInput {
    /// Service date, today when omitted
    pub performed_on: Option<NaiveDate>,
    #[validate(length(min = 1, max = 2000))]
    #[schema(example = "Replaced filters and belts")]
    pub description: String,
    #[validate(custom = "non_negative_decimal")]
    #[schema(value_type = Option<String>, example = "180.00")]
    pub cost: Option<Decimal>,
    pub performed_by: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
pub struct AssetFilter {
    pub status: Option<AssetStatus>,
    pub category: Option<String>,
    pub room_id: Option<Uuid>,
}

/// Equipment register and maintenance history
#[derive(Clone)]
pub struct AssetService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl AssetService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input))]
    pub async fn create_asset(
        &self,
        input: CreateAssetInput,
    ) -> Result<asset::Model, ServiceError> {
        input.validate()?;
        self.ensure_tag_free(&input.asset_tag, None).await?;
        if let Some(room_id) = input.room_id {
            self.ensure_room_exists(room_id).await?;
        }

        let now = Utc::now();
        let model = asset::ActiveModel {
            id: Set(Uuid::new_v4()),
            asset_tag: Set(input.asset_tag),
            name: Set(input.name),
            category: Set(input.category),
            location: Set(input.location),
            room_id: Set(input.room_id),
            purchase_date: Set(input.purchase_date),
            purchase_cost: Set(input.purchase_cost),
            status: Set(AssetStatus::Operational),
            maintenance_interval_days: Set(input.maintenance_interval_days),
            last_maintenance_date: Set(input.last_maintenance_date),
            next_maintenance_date: Set(next_maintenance_date(
                input.maintenance_interval_days,
                input.last_maintenance_date,
                input.purchase_date,
            )),
            warranty_expiry_date: Set(input.warranty_expiry_date),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;

        info!(asset_id = %model.id, asset_tag = %model.asset_tag, "Asset registered");
        Ok(model)
    }

    pub async fn get_asset(&self, id: Uuid) -> Result<asset::Model, ServiceError> {
        asset::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Asset {id} not found")))
    }

    pub async fn list_assets(
        &self,
        filter: AssetFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<asset::Model>, u64), ServiceError> {
        let mut query = asset::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(asset::Column::Status.eq(status));
        }
        if let Some(category) = filter.category {
            query = query.filter(asset::Column::Category.eq(category));
        }
        if let Some(room_id) = filter.room_id {
            query = query.filter(asset::Column::RoomId.eq(room_id));
        }

        let paginator = query
            .order_by_asc(asset::Column::AssetTag)
            .paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_asset(
        &self,
        id: Uuid,
        input: UpdateAssetInput,
    ) -> Result<asset::Model, ServiceError> {
        input.validate()?;
        let current = self.get_asset(id).await?;
        if let Some(tag) = input.asset_tag.as_deref() {
            self.ensure_tag_free(tag, Some(id)).await?;
        }
        if let Some(room_id) = input.room_id {
            self.ensure_room_exists(room_id).await?;
        }
        if input.status == Some(AssetStatus::Retired) {
            return Err(ServiceError::BadRequest(
                "Use the retire operation to retire an asset".to_string(),
            ));
        }
        if current.status == AssetStatus::Retired && input.status.is_some() {
            return Err(ServiceError::InvalidStatus(format!(
                "Asset {} is retired",
                current.asset_tag
            )));
        }

        let interval = input
            .maintenance_interval_days
            .or(current.maintenance_interval_days);
        let purchase_date = input.purchase_date.or(current.purchase_date);
        let next = if current.status == AssetStatus::Retired {
            None
        } else {
            next_maintenance_date(interval, current.last_maintenance_date, purchase_date)
        };

        let mut active: asset::ActiveModel = current.into();
        if let Some(v) = input.asset_tag {
            active.asset_tag = Set(v);
        }
        if let Some(v) = input.name {
            active.name = Set(v);
        }
        if let Some(v) = input.category {
            active.category = Set(v);
        }
        if let Some(v) = input.location {
            active.location = Set(Some(v));
        }
        if let Some(v) = input.room_id {
            active.room_id = Set(Some(v));
        }
        if let Some(v) = input.purchase_cost {
            active.purchase_cost = Set(Some(v));
        }
        if let Some(v) = input.warranty_expiry_date {
            active.warranty_expiry_date = Set(Some(v));
        }
        if let Some(v) = input.status {
            active.status = Set(v);
        }
        if let Some(v) = input.notes {
            active.notes = Set(Some(v));
        }
        active.purchase_date = Set(purchase_date);
        active.maintenance_interval_days = Set(interval);
        active.next_maintenance_date = Set(next);
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_asset(&self, id: Uuid) -> Result<(), ServiceError> {
        self.get_asset(id).await?;
        let txn = self.db.begin().await?;
        maintenance_log::Entity::delete_many()
            .filter(maintenance_log::Column::AssetId.eq(id))
            .exec(&txn)
            .await?;
        asset::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn start_maintenance(&self, id: Uuid) -> Result<asset::Model, ServiceError> {
        let current = self.get_asset(id).await?;
        match current.status {
            AssetStatus::Retired => {
                return Err(ServiceError::InvalidStatus(format!(
                    "Asset {} is retired",
                    current.asset_tag
                )))
            }
            AssetStatus::UnderMaintenance => return Ok(current),
            AssetStatus::Operational | AssetStatus::OutOfService => {}
        }

        let mut active: asset::ActiveModel = current.into();
        active.status = Set(AssetStatus::UnderMaintenance);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&*self.db).await?)
    }

    /// Logs a service visit and moves the maintenance schedule forward.
    #[instrument(skip(self, input))]
    pub async fn record_maintenance(
        &self,
        id: Uuid,
        input: RecordMaintenanceInput,
    ) -> Result<maintenance_log::Model, ServiceError> {
        input.validate()?;
        let today = Utc::now().date_naive();
        let performed_on = business_date(input.performed_on);
        if performed_on > today {
            return Err(ServiceError::ValidationError(format!(
                "maintenance date {performed_on} is in the future"
            )));
        }

        let txn = self.db.begin().await?;

        let current = asset::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Asset {id} not found")))?;

        let now = Utc::now();
        let log = maintenance_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            asset_id: Set(id),
            performed_on: Set(performed_on),
            description: Set(input.description),
            cost: Set(input.cost),
            performed_by: Set(input.performed_by),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let retired = current.status == AssetStatus::Retired;
        let next = if retired {
            None
        } else {
            next_maintenance_date(
                current.maintenance_interval_days,
                Some(performed_on),
                current.purchase_date,
            )
        };
        let status = if retired {
            AssetStatus::Retired
        } else {
            AssetStatus::Operational
        };

        let mut active: asset::ActiveModel = current.into();
        active.last_maintenance_date = Set(Some(performed_on));
        active.next_maintenance_date = Set(next);
        active.status = Set(status);
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::MaintenanceRecorded {
                asset_id: id,
                log_id: log.id,
            })
            .await;
        info!(asset_id = %id, %performed_on, status = %status.to_value(), "Maintenance recorded");
        Ok(log)
    }

    pub async fn list_maintenance(
        &self,
        id: Uuid,
    ) -> Result<Vec<maintenance_log::Model>, ServiceError> {
        self.get_asset(id).await?;
        Ok(maintenance_log::Entity::find()
            .filter(maintenance_log::Column::AssetId.eq(id))
            .order_by_desc(maintenance_log::Column::PerformedOn)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn retire(&self, id: Uuid) -> Result<asset::Model, ServiceError> {
        let current = self.get_asset(id).await?;
        if current.status == AssetStatus::Retired {
            return Err(ServiceError::InvalidStatus(format!(
                "Asset {} is already retired",
                current.asset_tag
            )));
        }

        let mut active: asset::ActiveModel = current.into();
        active.status = Set(AssetStatus::Retired);
        active.next_maintenance_date = Set(None);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&*self.db).await?)
    }

    async fn ensure_tag_free(&self, tag: &str, except: Option<Uuid>) -> Result<(), ServiceError> {
        let mut query = asset::Entity::find().filter(asset::Column::AssetTag.eq(tag));
        if let Some(id) = except {
            query = query.filter(asset::Column::Id.ne(id));
        }
        if query.one(&*self.db).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Asset tag {tag} is already in use"
            )));
        }
        Ok(())
    }

    async fn ensure_room_exists(&self, room_id: Uuid) -> Result<(), ServiceError> {
        room::Entity::find_by_id(room_id)
            .one(&*self.db)
            .await?
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("Room {room_id} not found")))
    }
}
