//! Property-based tests for the date and money rules of the back office.
//!
//! These tests use proptest to verify invariants across a wide range of inputs,
//! helping to catch edge cases that unit tests might miss.

use chrono::{Datelike, Duration, NaiveDate};
use hotel_backoffice::entities::asset::next_maintenance_date;
use hotel_backoffice::services::{
    availability::StayRange,
    front_office::nights_charged,
    hr::{days_employed, month_bounds, prorated_salary},
    restaurant::crosses_reorder_level,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

// Strategies for generating test data
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..3650).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + Duration::days(offset)
    })
}

fn stay_strategy() -> impl Strategy<Value = StayRange> {
    (date_strategy(), 1i64..30).prop_map(|(check_in, nights)| {
        StayRange::new(check_in, check_in + Duration::days(nights)).unwrap()
    })
}

fn salary_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..2_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn overlap_matches_interval_intersection(a in stay_strategy(), b in stay_strategy()) {
        let expected = a.check_in() < b.check_out() && b.check_in() < a.check_out();
        prop_assert_eq!(a.overlaps(&b), expected);
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn overlapping_stays_share_a_night(a in stay_strategy(), b in stay_strategy()) {
        let shared = (0..a.nights())
            .map(|n| a.check_in() + Duration::days(n))
            .any(|night| b.contains(night));
        prop_assert_eq!(a.overlaps(&b), shared);
    }

    #[test]
    fn empty_or_inverted_stays_are_rejected(day in date_strategy(), back in 0i64..30) {
        prop_assert!(StayRange::new(day, day - Duration::days(back)).is_err());
    }

    #[test]
    fn at_least_one_night_is_billed(check_in in date_strategy(), stayed in 0i64..60) {
        let nights = nights_charged(check_in, check_in + Duration::days(stayed));
        prop_assert_eq!(nights, stayed.max(1));
    }

    #[test]
    fn payroll_days_stay_within_the_month(
        year in 2025i32..2035,
        month in 1u32..=12,
        hire in date_strategy(),
        tenure in proptest::option::of(0i64..2000),
        salary in salary_strategy(),
    ) {
        let (first, last) = month_bounds(year, month).unwrap();
        let days_in_month = last.day();
        let termination = tenure.map(|days| hire + Duration::days(days));

        let days = days_employed(first, last, hire, termination);
        prop_assert!(days <= days_in_month);

        let pay = prorated_salary(salary, days, days_in_month);
        prop_assert!(pay >= Decimal::ZERO);
        prop_assert!(pay <= salary);
        if days == days_in_month {
            prop_assert_eq!(pay, salary.round_dp(2));
        }
    }

    #[test]
    fn next_service_follows_the_latest_visit(
        interval in 1i32..730,
        last in proptest::option::of(date_strategy()),
        purchase in proptest::option::of(date_strategy()),
    ) {
        let next = next_maintenance_date(Some(interval), last, purchase);
        match last.or(purchase) {
            Some(base) => prop_assert_eq!(next, Some(base + Duration::days(i64::from(interval)))),
            None => prop_assert!(next.is_none()),
        }
    }

    #[test]
    fn reorder_alert_fires_only_on_the_crossing(
        before in 0i32..100,
        taken in 0i32..100,
        level in 0i32..50,
    ) {
        let after = before - taken;
        let crossed = crosses_reorder_level(before, after, level);
        prop_assert_eq!(crossed, before > level && after <= level);
        if crossed {
            prop_assert!(!crosses_reorder_level(after, after - 1, level));
        }
    }
}
