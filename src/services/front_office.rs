use crate::{
    db::DbPool,
    entities::{
        reservation::{self, ReservationStatus},
        restaurant_order::{self, OrderStatus},
        room::{self, RoomStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{availability::StayRange, business_date, reservations::room_charge},
};
use chrono::{NaiveDate, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Optional business date carried by front-office requests
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams, ToSchema)]
pub struct BusinessDateInput {
    #[schema(example = "2026-11-10")]
    pub date: Option<NaiveDate>,
}

/// Folio produced when a guest leaves
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckoutSummary {
    pub reservation: reservation::Model,
    pub nights: i64,
    #[schema(value_type = String, example = "240.00")]
    pub room_charge: Decimal,
    #[schema(value_type = String, example = "37.50")]
    pub extra_charges: Decimal,
    #[schema(value_type = String, example = "277.50")]
    pub total_amount: Decimal,
    pub settled_orders: usize,
}

/// Nights billed at departure: the actual stay, with a one-night minimum
/// for same-day departures.
pub fn nights_charged(check_in: NaiveDate, on: NaiveDate) -> i64 {
    (on - check_in).num_days().max(1)
}

/// Arrival and departure desk
#[derive(Clone)]
pub struct FrontOfficeService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl FrontOfficeService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Seats the guest in the booked room. Reservation and room change
    /// together or not at all.
    #[instrument(skip(self))]
    pub async fn check_in(
        &self,
        reservation_id: Uuid,
        on: Option<NaiveDate>,
    ) -> Result<reservation::Model, ServiceError> {
        let on = business_date(on);
        let txn = self.db.begin().await?;

        let booking = reservation::Entity::find_by_id(reservation_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Reservation {reservation_id} not found"))
            })?;
        if booking.status != ReservationStatus::Confirmed {
            return Err(ServiceError::InvalidStatus(format!(
                "Reservation {} is {} and cannot be checked in",
                booking.reservation_number,
                booking.status.to_value()
            )));
        }
        let stay = StayRange::new(booking.check_in_date, booking.check_out_date)?;
        if !stay.contains(on) {
            return Err(ServiceError::InvalidOperation(format!(
                "Check-in on {on} is outside the stay {} to {}",
                booking.check_in_date, booking.check_out_date
            )));
        }

        let room = room::Entity::find_by_id(booking.room_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Room {} not found", booking.room_id)))?;
        if room.status != RoomStatus::Available {
            return Err(ServiceError::InvalidStatus(format!(
                "Room {} is {} and not ready for arrival",
                room.room_number,
                room.status.to_value()
            )));
        }

        let now = Utc::now();
        let room_id = room.id;
        let mut room_active: room::ActiveModel = room.into();
        room_active.status = Set(RoomStatus::Occupied);
        room_active.updated_at = Set(now);
        room_active.update(&txn).await?;

        let mut active: reservation::ActiveModel = booking.into();
        active.status = Set(ReservationStatus::CheckedIn);
        active.checked_in_at = Set(Some(now));
        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        counter!("hotel_front_office.check_ins", 1);

        self.event_sender
            .send_or_log(Event::GuestCheckedIn {
                reservation_id,
                room_id,
            })
            .await;
        info!(%reservation_id, %room_id, "Guest checked in");
        Ok(updated)
    }

    /// Closes the folio: bills the nights stayed plus every restaurant order
    /// charged to the room, settles those orders and sends the room to
    /// housekeeping.
    #[instrument(skip(self))]
    pub async fn check_out(
        &self,
        reservation_id: Uuid,
        on: Option<NaiveDate>,
    ) -> Result<CheckoutSummary, ServiceError> {
        let on = business_date(on);
        let txn = self.db.begin().await?;

        let booking = reservation::Entity::find_by_id(reservation_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Reservation {reservation_id} not found"))
            })?;
        if booking.status != ReservationStatus::CheckedIn {
            return Err(ServiceError::InvalidStatus(format!(
                "Reservation {} is {} and cannot be checked out",
                booking.reservation_number,
                booking.status.to_value()
            )));
        }
        if on < booking.check_in_date {
            return Err(ServiceError::InvalidOperation(format!(
                "Check-out on {on} precedes arrival on {}",
                booking.check_in_date
            )));
        }

        let nights = nights_charged(booking.check_in_date, on);
        let room_total = room_charge(booking.nightly_rate, nights);

        let charged_orders = restaurant_order::Entity::find()
            .filter(restaurant_order::Column::ReservationId.eq(reservation_id))
            .filter(restaurant_order::Column::Status.eq(OrderStatus::ChargedToRoom))
            .all(&txn)
            .await?;
        let extra_charges: Decimal = charged_orders.iter().map(|o| o.total_amount).sum();
        let settled_orders = charged_orders.len();

        let now = Utc::now();
        for order in charged_orders {
            let mut active: restaurant_order::ActiveModel = order.into();
            active.status = Set(OrderStatus::Settled);
            active.updated_at = Set(now);
            active.update(&txn).await?;
        }

        let room_id = booking.room_id;
        if let Some(room) = room::Entity::find_by_id(room_id).one(&txn).await? {
            let mut room_active: room::ActiveModel = room.into();
            room_active.status = Set(RoomStatus::Cleaning);
            room_active.updated_at = Set(now);
            room_active.update(&txn).await?;
        }

        let total_amount = room_total + extra_charges;
        let mut active: reservation::ActiveModel = booking.into();
        active.status = Set(ReservationStatus::CheckedOut);
        active.checked_out_at = Set(Some(now));
        active.room_charge = Set(room_total);
        active.extra_charges = Set(extra_charges);
        active.total_amount = Set(total_amount);
        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        counter!("hotel_front_office.check_outs", 1);

        self.event_sender
            .send_or_log(Event::GuestCheckedOut {
                reservation_id,
                room_id,
                total_amount,
            })
            .await;
        info!(%reservation_id, nights, %total_amount, "Guest checked out");

        Ok(CheckoutSummary {
            reservation: updated,
            nights,
            room_charge: room_total,
            extra_charges,
            total_amount,
            settled_orders,
        })
    }

    /// Guests currently staying in the hotel
    pub async fn in_house(&self) -> Result<Vec<reservation::Model>, ServiceError> {
        Ok(reservation::Entity::find()
            .filter(reservation::Column::Status.eq(ReservationStatus::CheckedIn))
            .order_by_asc(reservation::Column::CheckOutDate)
            .all(&*self.db)
            .await?)
    }

    /// Confirmed bookings due to arrive on `on`
    pub async fn arrivals(
        &self,
        on: Option<NaiveDate>,
    ) -> Result<Vec<reservation::Model>, ServiceError> {
        let on = business_date(on);
        Ok(reservation::Entity::find()
            .filter(reservation::Column::Status.eq(ReservationStatus::Confirmed))
            .filter(reservation::Column::CheckInDate.eq(on))
            .order_by_asc(reservation::Column::ReservationNumber)
            .all(&*self.db)
            .await?)
    }

    /// In-house guests due to leave on `on`
    pub async fn departures(
        &self,
        on: Option<NaiveDate>,
    ) -> Result<Vec<reservation::Model>, ServiceError> {
        let on = business_date(on);
        Ok(reservation::Entity::find()
            .filter(reservation::Column::Status.eq(ReservationStatus::CheckedIn))
            .filter(reservation::Column::CheckOutDate.eq(on))
            .order_by_asc(reservation::Column::ReservationNumber)
            .all(&*self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, day).unwrap()
    }

    #[test]
    fn same_day_departure_bills_one_night() {
        assert_eq!(nights_charged(d(10), d(10)), 1);
    }

    #[test]
    fn nights_follow_actual_departure() {
        assert_eq!(nights_charged(d(10), d(13)), 3);
        // early departure
        assert_eq!(nights_charged(d(10), d(11)), 1);
    }
}
