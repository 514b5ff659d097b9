use crate::{
    db::DbPool,
    entities::{
        reservation,
        room::{self, RoomStatus},
        room_class,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        availability::{blocking_overlap_condition, StayRange, BLOCKING_STATUSES},
        non_negative_decimal,
    },
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateRoomClassInput {
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Deluxe Double")]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom = "non_negative_decimal")]
    #[schema(value_type = String, example = "120.00")]
    pub base_rate: Decimal,
    #[validate(range(min = 1, max = 20))]
    #[schema(example = 2)]
    pub capacity: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateRoomClassInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom = "non_negative_decimal")]
    #[schema(value_type = Option<String>)]
    pub base_rate: Option<Decimal>,
    #[validate(range(min = 1, max = 20))]
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateRoomInput {
    #[validate(length(min = 1, max = 20))]
    #[schema(example = "204")]
    pub room_number: String,
    pub room_class_id: Uuid,
    #[schema(example = 2)]
    pub floor: i32,
    pub status: Option<RoomStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateRoomInput {
    #[validate(length(min = 1, max = 20))]
    pub room_number: Option<String>,
    pub room_class_id: Option<Uuid>,
    pub floor: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
pub struct RoomFilter {
    pub status: Option<RoomStatus>,
    pub room_class_id: Option<Uuid>,
    pub floor: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, IntoParams, ToSchema)]
pub struct AvailabilityQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub room_class_id: Option<Uuid>,
    pub guests: Option<i32>,
}

/// A free room together with the quote for the requested stay
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AvailableRoom {
    pub room: room::Model,
    pub room_class: room_class::Model,
    pub nights: i64,
    #[schema(value_type = String, example = "360.00")]
    pub total_price: Decimal,
}

/// Room classes, room inventory and availability search
#[derive(Clone)]
pub struct RoomService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl RoomService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input))]
    pub async fn create_room_class(
        &self,
        input: CreateRoomClassInput,
    ) -> Result<room_class::Model, ServiceError> {
        input.validate()?;

        let existing = room_class::Entity::find()
            .filter(room_class::Column::Name.eq(input.name.as_str()))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Room class '{}' already exists",
                input.name
            )));
        }

        let now = Utc::now();
        let model = room_class::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            base_rate: Set(input.base_rate),
            capacity: Set(input.capacity),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;

        info!(room_class_id = %model.id, "Room class created");
        Ok(model)
    }

    pub async fn get_room_class(&self, id: Uuid) -> Result<room_class::Model, ServiceError> {
        room_class::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Room class {id} not found")))
    }

    pub async fn list_room_classes(&self) -> Result<Vec<room_class::Model>, ServiceError> {
        Ok(room_class::Entity::find()
            .order_by_asc(room_class::Column::Name)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self, input))]
    pub async fn update_room_class(
        &self,
        id: Uuid,
        input: UpdateRoomClassInput,
    ) -> Result<room_class::Model, ServiceError> {
        input.validate()?;
        let current = self.get_room_class(id).await?;

        if let Some(name) = input.name.as_deref() {
            let taken = room_class::Entity::find()
                .filter(room_class::Column::Name.eq(name))
                .filter(room_class::Column::Id.ne(id))
                .one(&*self.db)
                .await?;
            if taken.is_some() {
                return Err(ServiceError::Conflict(format!(
                    "Room class '{name}' already exists"
                )));
            }
        }

        let mut active: room_class::ActiveModel = current.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(base_rate) = input.base_rate {
            active.base_rate = Set(base_rate);
        }
        if let Some(capacity) = input.capacity {
            active.capacity = Set(capacity);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_room_class(&self, id: Uuid) -> Result<(), ServiceError> {
        let class = self.get_room_class(id).await?;

        let rooms = room::Entity::find()
            .filter(room::Column::RoomClassId.eq(id))
            .count(&*self.db)
            .await?;
        if rooms > 0 {
            return Err(ServiceError::Conflict(format!(
                "Room class '{}' still has {rooms} room(s)",
                class.name
            )));
        }

        room_class::Entity::delete_by_id(id).exec(&*self.db).await?;
        info!(room_class_id = %id, "Room class deleted");
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn create_room(&self, input: CreateRoomInput) -> Result<room::Model, ServiceError> {
        input.validate()?;

        if input.status == Some(RoomStatus::Occupied) {
            return Err(ServiceError::BadRequest(
                "A room can only become occupied through check-in".to_string(),
            ));
        }
        self.get_room_class(input.room_class_id).await?;
        self.ensure_room_number_free(&input.room_number, None).await?;

        let now = Utc::now();
        let model = room::ActiveModel {
            id: Set(Uuid::new_v4()),
            room_number: Set(input.room_number),
            room_class_id: Set(input.room_class_id),
            floor: Set(input.floor),
            status: Set(input.status.unwrap_or(RoomStatus::Available)),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;

        info!(room_id = %model.id, room_number = %model.room_number, "Room created");
        Ok(model)
    }

    pub async fn get_room(&self, id: Uuid) -> Result<room::Model, ServiceError> {
        room::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Room {id} not found")))
    }

    pub async fn list_rooms(
        &self,
        filter: RoomFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<room::Model>, u64), ServiceError> {
        let mut query = room::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(room::Column::Status.eq(status));
        }
        if let Some(class_id) = filter.room_class_id {
            query = query.filter(room::Column::RoomClassId.eq(class_id));
        }
        if let Some(floor) = filter.floor {
            query = query.filter(room::Column::Floor.eq(floor));
        }

        let paginator = query
            .order_by_asc(room::Column::RoomNumber)
            .paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let rooms = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rooms, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_room(
        &self,
        id: Uuid,
        input: UpdateRoomInput,
    ) -> Result<room::Model, ServiceError> {
        input.validate()?;
        let current = self.get_room(id).await?;

        if let Some(number) = input.room_number.as_deref() {
            self.ensure_room_number_free(number, Some(id)).await?;
        }
        if let Some(class_id) = input.room_class_id {
            self.get_room_class(class_id).await?;
        }

        let mut active: room::ActiveModel = current.into();
        if let Some(number) = input.room_number {
            active.room_number = Set(number);
        }
        if let Some(class_id) = input.room_class_id {
            active.room_class_id = Set(class_id);
        }
        if let Some(floor) = input.floor {
            active.floor = Set(floor);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_room(&self, id: Uuid) -> Result<(), ServiceError> {
        let room = self.get_room(id).await?;

        let active = reservation::Entity::find()
            .filter(reservation::Column::RoomId.eq(id))
            .filter(reservation::Column::Status.is_in(BLOCKING_STATUSES))
            .count(&*self.db)
            .await?;
        if active > 0 {
            return Err(ServiceError::Conflict(format!(
                "Room {} has {active} active reservation(s)",
                room.room_number
            )));
        }

        room::Entity::delete_by_id(id).exec(&*self.db).await?;
        info!(room_id = %id, "Room deleted");
        Ok(())
    }

    /// Housekeeping status change. `occupied` is owned by the front office:
    /// it is entered on check-in and left on check-out only.
    #[instrument(skip(self))]
    pub async fn set_room_status(
        &self,
        id: Uuid,
        status: RoomStatus,
    ) -> Result<room::Model, ServiceError> {
        if status == RoomStatus::Occupied {
            return Err(ServiceError::BadRequest(
                "A room can only become occupied through check-in".to_string(),
            ));
        }

        let room = self.get_room(id).await?;
        if room.status == RoomStatus::Occupied {
            return Err(ServiceError::InvalidStatus(format!(
                "Room {} is occupied and can only be released by check-out",
                room.room_number
            )));
        }
        if room.status == status {
            return Ok(room);
        }

        let mut active: room::ActiveModel = room.into();
        active.status = Set(status);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::RoomStatusChanged {
                room_id: id,
                status: status.to_value(),
            })
            .await;
        info!(room_id = %id, status = %status.to_value(), "Room status changed");
        Ok(updated)
    }

    /// Rooms that can be sold for the whole `[check_in, check_out)` range.
    #[instrument(skip(self))]
    pub async fn find_available_rooms(
        &self,
        query: AvailabilityQuery,
    ) -> Result<Vec<AvailableRoom>, ServiceError> {
        let range = StayRange::new(query.check_in, query.check_out)?;
        let guests = query.guests.unwrap_or(1);
        if guests < 1 {
            return Err(ServiceError::ValidationError(
                "guests must be at least 1".to_string(),
            ));
        }

        let mut rooms_query = room::Entity::find().filter(
            room::Column::Status.is_not_in([RoomStatus::Maintenance, RoomStatus::OutOfService]),
        );
        if let Some(class_id) = query.room_class_id {
            rooms_query = rooms_query.filter(room::Column::RoomClassId.eq(class_id));
        }
        let candidates = rooms_query
            .order_by_asc(room::Column::RoomNumber)
            .find_also_related(room_class::Entity)
            .all(&*self.db)
            .await?;

        let booked: HashSet<Uuid> = reservation::Entity::find()
            .filter(blocking_overlap_condition(&range))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|r| r.room_id)
            .collect();

        let nights = range.nights();
        let available = candidates
            .into_iter()
            .filter_map(|(room, class)| class.map(|class| (room, class)))
            .filter(|(room, class)| {
                room.status.is_bookable() && class.capacity >= guests && !booked.contains(&room.id)
            })
            .map(|(room, class)| AvailableRoom {
                total_price: class.base_rate * Decimal::from(nights),
                room,
                room_class: class,
                nights,
            })
            .collect();

        Ok(available)
    }

    async fn ensure_room_number_free(
        &self,
        room_number: &str,
        except: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let mut query = room::Entity::find().filter(room::Column::RoomNumber.eq(room_number));
        if let Some(id) = except {
            query = query.filter(room::Column::Id.ne(id));
        }
        if query.one(&*self.db).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Room number {room_number} already exists"
            )));
        }
        Ok(())
    }
}
