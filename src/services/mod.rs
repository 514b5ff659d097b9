//! Business services. Each service owns a handle to the connection pool and
//! the event channel; multi-row invariants are enforced inside a single
//! database transaction.

pub mod availability;
pub mod rooms;

// Guests and bookings
pub mod customers;
pub mod front_office;
pub mod reservations;

// Restaurant point of sale
pub mod restaurant;

// Back office
pub mod assets;
pub mod hr;
pub mod notifications;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use validator::ValidationError;

/// Validator hook for money amounts.
pub fn non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("must_not_be_negative"));
    }
    Ok(())
}

/// Business date used when a request does not carry one.
pub fn business_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_validation() {
        assert!(non_negative_decimal(&dec!(0)).is_ok());
        assert!(non_negative_decimal(&dec!(12.50)).is_ok());
        assert!(non_negative_decimal(&dec!(-0.01)).is_err());
    }

    #[test]
    fn explicit_business_date_wins() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert_eq!(business_date(Some(date)), date);
    }
}
