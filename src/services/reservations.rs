use crate::{
    db::DbPool,
    entities::{
        customer,
        reservation::{self, ReservationStatus},
        room::{self, RoomStatus},
        room_class,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        availability::{blocking_overlap_condition, StayRange},
        business_date,
    },
};
use chrono::{NaiveDate, Utc};
use rand::{distributions::Alphanumeric, Rng};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateReservationInput {
    pub customer_id: Uuid,
    pub room_id: Uuid,
    #[schema(example = "2026-11-10")]
    pub check_in_date: NaiveDate,
    #[schema(example = "2026-11-13")]
    pub check_out_date: NaiveDate,
    #[validate(range(min = 1, max = 20))]
    #[serde(default = "default_adults")]
    pub adults: i32,
    #[validate(range(min = 0, max = 20))]
    #[serde(default)]
    pub children: i32,
    #[validate(length(max = 1000))]
    pub special_requests: Option<String>,
}

fn default_adults() -> i32 {
    1
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateReservationInput {
    pub room_id: Option<Uuid>,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 20))]
    pub adults: Option<i32>,
    #[validate(range(min = 0, max = 20))]
    pub children: Option<i32>,
    #[validate(length(max = 1000))]
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CancelReservationInput {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct NoShowInput {
    /// Business date, today when omitted
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
pub struct ReservationFilter {
    pub status: Option<ReservationStatus>,
    pub customer_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
    /// Only stays with at least one night on or after this date
    pub from: Option<NaiveDate>,
    /// Only stays starting before this date
    pub to: Option<NaiveDate>,
}

/// Booking lifecycle up to arrival; the stay itself is handled by the
/// front office.
#[derive(Clone)]
pub struct ReservationService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ReservationService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(room_id = %input.room_id))]
    pub async fn create_reservation(
        &self,
        input: CreateReservationInput,
    ) -> Result<reservation::Model, ServiceError> {
        input.validate()?;
        let range = StayRange::new(input.check_in_date, input.check_out_date)?;

        let txn = self.db.begin().await?;
        lock_room(&txn, input.room_id).await?;

        customer::Entity::find_by_id(input.customer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Customer {} not found", input.customer_id))
            })?;
        let (room, class) = load_bookable_room(&txn, input.room_id).await?;
        ensure_capacity(&class, input.adults, input.children)?;
        ensure_no_conflict(&txn, &room, &range, None).await?;

        let room_charge = room_charge(class.base_rate, range.nights());
        let now = Utc::now();
        let model = reservation::ActiveModel {
            id: Set(Uuid::new_v4()),
            reservation_number: Set(generate_reservation_number(now.date_naive())),
            customer_id: Set(input.customer_id),
            room_id: Set(room.id),
            check_in_date: Set(range.check_in()),
            check_out_date: Set(range.check_out()),
            adults: Set(input.adults),
            children: Set(input.children),
            status: Set(ReservationStatus::Confirmed),
            nightly_rate: Set(class.base_rate),
            room_charge: Set(room_charge),
            extra_charges: Set(Decimal::ZERO),
            total_amount: Set(room_charge),
            special_requests: Set(input.special_requests),
            checked_in_at: Set(None),
            checked_out_at: Set(None),
            cancelled_at: Set(None),
            cancellation_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::ReservationCreated(model.id))
            .await;
        info!(
            reservation_id = %model.id,
            reservation_number = %model.reservation_number,
            "Reservation created"
        );
        Ok(model)
    }

    pub async fn get_reservation(&self, id: Uuid) -> Result<reservation::Model, ServiceError> {
        reservation::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Reservation {id} not found")))
    }

    pub async fn get_by_number(&self, number: &str) -> Result<reservation::Model, ServiceError> {
        reservation::Entity::find()
            .filter(reservation::Column::ReservationNumber.eq(number))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Reservation {number} not found")))
    }

    pub async fn list_reservations(
        &self,
        filter: ReservationFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<reservation::Model>, u64), ServiceError> {
        let mut query = reservation::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(reservation::Column::Status.eq(status));
        }
        if let Some(customer_id) = filter.customer_id {
            query = query.filter(reservation::Column::CustomerId.eq(customer_id));
        }
        if let Some(room_id) = filter.room_id {
            query = query.filter(reservation::Column::RoomId.eq(room_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(reservation::Column::CheckOutDate.gt(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(reservation::Column::CheckInDate.lt(to));
        }

        let paginator = query
            .order_by_asc(reservation::Column::CheckInDate)
            .order_by_asc(reservation::Column::ReservationNumber)
            .paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Amends a confirmed booking. Moving to another room snapshots that
    /// room's class rate; otherwise the original nightly rate is kept.
    #[instrument(skip(self, input))]
    pub async fn update_reservation(
        &self,
        id: Uuid,
        input: UpdateReservationInput,
    ) -> Result<reservation::Model, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await?;
        lock_reservation(&txn, id).await?;

        let current = reservation::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Reservation {id} not found")))?;
        if current.status != ReservationStatus::Confirmed {
            return Err(ServiceError::InvalidStatus(format!(
                "Reservation {} is {:?} and can no longer be changed",
                current.reservation_number, current.status
            )));
        }

        let range = StayRange::new(
            input.check_in_date.unwrap_or(current.check_in_date),
            input.check_out_date.unwrap_or(current.check_out_date),
        )?;
        let room_id = input.room_id.unwrap_or(current.room_id);
        let adults = input.adults.unwrap_or(current.adults);
        let children = input.children.unwrap_or(current.children);

        lock_room(&txn, room_id).await?;
        let (room, class) = load_bookable_room(&txn, room_id).await?;
        ensure_capacity(&class, adults, children)?;
        ensure_no_conflict(&txn, &room, &range, Some(id)).await?;

        let nightly_rate = if room_id == current.room_id {
            current.nightly_rate
        } else {
            class.base_rate
        };
        let room_charge = room_charge(nightly_rate, range.nights());
        let extra_charges = current.extra_charges;

        let mut active: reservation::ActiveModel = current.into();
        active.room_id = Set(room_id);
        active.check_in_date = Set(range.check_in());
        active.check_out_date = Set(range.check_out());
        active.adults = Set(adults);
        active.children = Set(children);
        active.nightly_rate = Set(nightly_rate);
        active.room_charge = Set(room_charge);
        active.total_amount = Set(room_charge + extra_charges);
        if let Some(requests) = input.special_requests {
            active.special_requests = Set(Some(requests));
        }
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::ReservationUpdated(id))
            .await;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn cancel_reservation(
        &self,
        id: Uuid,
        reason: Option<String>,
    ) -> Result<reservation::Model, ServiceError> {
        let current = self.get_reservation(id).await?;
        if current.status != ReservationStatus::Confirmed {
            return Err(ServiceError::InvalidStatus(format!(
                "Only confirmed reservations can be cancelled, {} is {:?}",
                current.reservation_number, current.status
            )));
        }

        let now = Utc::now();
        let mut active: reservation::ActiveModel = current.into();
        active.status = Set(ReservationStatus::Cancelled);
        active.cancelled_at = Set(Some(now));
        active.cancellation_reason = Set(reason);
        active.updated_at = Set(now);
        let updated = active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::ReservationCancelled(id))
            .await;
        info!(reservation_id = %id, "Reservation cancelled");
        Ok(updated)
    }

    /// Releases a booking whose guest never arrived. Only possible once the
    /// arrival day has passed.
    #[instrument(skip(self))]
    pub async fn mark_no_show(
        &self,
        id: Uuid,
        on: Option<NaiveDate>,
    ) -> Result<reservation::Model, ServiceError> {
        let on = business_date(on);
        let current = self.get_reservation(id).await?;
        if current.status != ReservationStatus::Confirmed {
            return Err(ServiceError::InvalidStatus(format!(
                "Only confirmed reservations can be marked as no-show, {} is {:?}",
                current.reservation_number, current.status
            )));
        }
        if on <= current.check_in_date {
            return Err(ServiceError::InvalidOperation(format!(
                "Reservation {} is due on {}; no-show can be recorded from the following day",
                current.reservation_number, current.check_in_date
            )));
        }

        let mut active: reservation::ActiveModel = current.into();
        active.status = Set(ReservationStatus::NoShow);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::ReservationNoShow(id))
            .await;
        warn!(reservation_id = %id, "Reservation marked as no-show");
        Ok(updated)
    }
}

/// Holds the room's row lock until the transaction ends, so bookings of one
/// room run their overlap check one at a time. Issued as a no-op update: as
/// the first write of the transaction it also takes SQLite's write lock
/// before anything has been read.
async fn lock_room<C: ConnectionTrait>(conn: &C, room_id: Uuid) -> Result<(), ServiceError> {
    let locked = room::Entity::update_many()
        .col_expr(room::Column::Id, Expr::col(room::Column::Id).into())
        .filter(room::Column::Id.eq(room_id))
        .exec(conn)
        .await?;
    if locked.rows_affected == 0 {
        return Err(ServiceError::NotFound(format!("Room {room_id} not found")));
    }
    Ok(())
}

async fn lock_reservation<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), ServiceError> {
    let locked = reservation::Entity::update_many()
        .col_expr(reservation::Column::Id, Expr::col(reservation::Column::Id).into())
        .filter(reservation::Column::Id.eq(id))
        .exec(conn)
        .await?;
    if locked.rows_affected == 0 {
        return Err(ServiceError::NotFound(format!("Reservation {id} not found")));
    }
    Ok(())
}

async fn load_bookable_room<C: ConnectionTrait>(
    conn: &C,
    room_id: Uuid,
) -> Result<(room::Model, room_class::Model), ServiceError> {
    let (room, class) = room::Entity::find_by_id(room_id)
        .find_also_related(room_class::Entity)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Room {room_id} not found")))?;
    let class = class.ok_or_else(|| {
        ServiceError::InternalError(format!("Room {} has no room class", room.room_number))
    })?;

    if room.status == RoomStatus::OutOfService {
        return Err(ServiceError::InvalidOperation(format!(
            "Room {} is out of service",
            room.room_number
        )));
    }
    Ok((room, class))
}

fn ensure_capacity(
    class: &room_class::Model,
    adults: i32,
    children: i32,
) -> Result<(), ServiceError> {
    let guests = adults + children;
    if guests > class.capacity {
        return Err(ServiceError::ValidationError(format!(
            "{guests} guests exceed the capacity of {} for room class '{}'",
            class.capacity, class.name
        )));
    }
    Ok(())
}

/// Fails with `Conflict` when another blocking reservation holds the room
/// for any night of `range`.
pub(crate) async fn ensure_no_conflict<C: ConnectionTrait>(
    conn: &C,
    room: &room::Model,
    range: &StayRange,
    exclude: Option<Uuid>,
) -> Result<(), ServiceError> {
    let mut query = reservation::Entity::find()
        .filter(reservation::Column::RoomId.eq(room.id))
        .filter(blocking_overlap_condition(range));
    if let Some(id) = exclude {
        query = query.filter(reservation::Column::Id.ne(id));
    }

    if let Some(existing) = query.one(conn).await? {
        return Err(ServiceError::Conflict(format!(
            "Room {} is already booked between {} and {} ({})",
            room.room_number,
            existing.check_in_date,
            existing.check_out_date,
            existing.reservation_number
        )));
    }
    Ok(())
}

pub(crate) fn room_charge(nightly_rate: Decimal, nights: i64) -> Decimal {
    (nightly_rate * Decimal::from(nights)).round_dp(2)
}

/// `RSV-YYYYMMDD-XXXXXX` with a random uppercase alphanumeric suffix
pub fn generate_reservation_number(date: NaiveDate) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| char::from(c).to_ascii_uppercase())
        .collect();
    format!("RSV-{}-{}", date.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn reservation_number_format() {
        let number = generate_reservation_number(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert_eq!(number.len(), "RSV-20261018-XXXXXX".len());
        assert!(number.starts_with("RSV-20261018-"));
        assert!(number[13..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn room_charge_is_nights_times_rate() {
        assert_eq!(room_charge(dec!(120.00), 3), dec!(360.00));
        assert_eq!(room_charge(dec!(99.99), 1), dec!(99.99));
    }

    #[test]
    fn capacity_counts_children() {
        let class = room_class::Model {
            id: Uuid::new_v4(),
            name: "Single".into(),
            description: None,
            base_rate: dec!(80),
            capacity: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(ensure_capacity(&class, 2, 0).is_ok());
        assert!(ensure_capacity(&class, 1, 2).is_err());
    }
}
