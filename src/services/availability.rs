//! Date-range overlap rules shared by room search and reservation booking.
//!
//! Stays are half-open: a guest leaving on the 12th frees the room for a
//! guest arriving on the 12th.

use crate::entities::reservation::{self, ReservationStatus};
use crate::errors::ServiceError;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, Condition};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Reservation statuses that occupy a room for their dates.
pub const BLOCKING_STATUSES: [ReservationStatus; 2] = ReservationStatus::BLOCKING;

/// A validated `[check_in, check_out)` range of nights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, ServiceError> {
        if check_out <= check_in {
            return Err(ServiceError::ValidationError(format!(
                "check-out date {check_out} must be after check-in date {check_in}"
            )));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Whether the night of `day` falls inside the stay.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.check_in <= day && day < self.check_out
    }

    /// Three ways an existing stay can collide with `other`: it starts inside
    /// it, ends inside it, or swallows it whole.
    pub fn overlaps(&self, other: &StayRange) -> bool {
        let starts_inside = other.check_in <= self.check_in && self.check_in < other.check_out;
        let ends_inside = other.check_in < self.check_out && self.check_out <= other.check_out;
        let encloses = self.check_in <= other.check_in && other.check_out <= self.check_out;
        starts_inside || ends_inside || encloses
    }
}

/// The `overlaps` test expressed on reservation columns, so that
/// `reservation::Entity::find().filter(overlap_condition(range))` returns
/// every reservation colliding with `range`.
pub fn overlap_condition(range: &StayRange) -> Condition {
    let starts_inside = Condition::all()
        .add(reservation::Column::CheckInDate.lte(range.check_in))
        .add(reservation::Column::CheckOutDate.gt(range.check_in));
    let ends_inside = Condition::all()
        .add(reservation::Column::CheckInDate.lt(range.check_out))
        .add(reservation::Column::CheckOutDate.gte(range.check_out));
    let enclosed = Condition::all()
        .add(reservation::Column::CheckInDate.gte(range.check_in))
        .add(reservation::Column::CheckOutDate.lte(range.check_out));

    Condition::any()
        .add(starts_inside)
        .add(ends_inside)
        .add(enclosed)
}

/// Overlap condition restricted to reservations that actually hold a room.
pub fn blocking_overlap_condition(range: &StayRange) -> Condition {
    Condition::all()
        .add(reservation::Column::Status.is_in(BLOCKING_STATUSES))
        .add(overlap_condition(range))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, day).unwrap()
    }

    fn stay(from: u32, to: u32) -> StayRange {
        StayRange::new(d(from), d(to)).unwrap()
    }

    #[test]
    fn rejects_empty_and_inverted_ranges() {
        assert!(StayRange::new(d(5), d(5)).is_err());
        assert!(StayRange::new(d(6), d(5)).is_err());
        assert_eq!(stay(5, 8).nights(), 3);
    }

    #[rstest]
    #[case::identical(stay(10, 12), stay(10, 12), true)]
    #[case::starts_inside(stay(11, 14), stay(10, 12), true)]
    #[case::ends_inside(stay(8, 11), stay(10, 12), true)]
    #[case::encloses(stay(8, 15), stay(10, 12), true)]
    #[case::enclosed(stay(10, 11), stay(9, 12), true)]
    #[case::back_to_back_after(stay(12, 14), stay(10, 12), false)]
    #[case::back_to_back_before(stay(8, 10), stay(10, 12), false)]
    #[case::disjoint(stay(1, 3), stay(10, 12), false)]
    fn overlap_cases(#[case] a: StayRange, #[case] b: StayRange, #[case] expected: bool) {
        assert_eq!(a.overlaps(&b), expected);
        assert_eq!(b.overlaps(&a), expected);
    }

    #[test]
    fn contains_excludes_departure_day() {
        let s = stay(10, 12);
        assert!(s.contains(d(10)));
        assert!(s.contains(d(11)));
        assert!(!s.contains(d(12)));
    }
}
