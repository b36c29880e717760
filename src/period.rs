use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BillError;

/// Shifts `date` by `delta` months. The day of month is clamped to the last
/// day of the resulting month: Jan 31 + 1 month is Feb 28 (or 29).
pub fn add_months(date: &NaiveDate, delta: i32) -> Option<NaiveDate> {
    let months = Months::new(delta.unsigned_abs());
    if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    }
}

/// A billing period, written `YYYY-MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    first_day: NaiveDate,
}

impl MonthKey {
    pub fn parse(raw: &str) -> Result<MonthKey, BillError> {
        let invalid = || BillError::validation(format!("Invalid month '{}', expected YYYY-MM", raw));

        let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
        let digits = |part: &str, widths: std::ops::RangeInclusive<usize>| {
            widths.contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !digits(year, 4..=4) || !digits(month, 1..=2) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| MonthKey { first_day })
            .ok_or_else(invalid)
    }

    pub fn from_date(date: &NaiveDate) -> MonthKey {
        MonthKey {
            first_day: *date - Days::new(date.day0() as u64),
        }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn add_months(&self, delta: i32) -> Option<MonthKey> {
        add_months(&self.first_day, delta).map(|first_day| MonthKey { first_day })
    }

    /// Number of months from `earlier` to `self`, negative if `self` comes first.
    pub fn months_since(&self, earlier: &MonthKey) -> i64 {
        let index = |key: &MonthKey| key.year() as i64 * 12 + key.month0() as i64;
        index(self) - index(earlier)
    }

    fn month0(&self) -> u32 {
        self.first_day.month0()
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = BillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MonthKey::parse(s)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        MonthKey::parse(&raw).map_err(de::Error::custom)
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod add_months_tests {
    use chrono::NaiveDate;
    use derive_builder::Builder;

    use super::add_months;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[derive(Builder)]
    #[builder(
    pattern = "immutable",
    build_fn(skip),
    name = "Test")]
    #[allow(dead_code)]
    struct AddMonthsCase {
        input: NaiveDate,
        delta: i32,
        expected_output: NaiveDate,
    }

    impl Test {
        fn execute(self) {
            let result = add_months(&self.input.unwrap(), self.delta.unwrap()).unwrap();
            assert_eq!(result, self.expected_output.unwrap())
        }
    }

    fn one_month_later() -> Test {
        Test::default().delta(1)
    }

    #[test]
    fn one_month_later__leap_year_end_of_january() {
        one_month_later().input(date(2024, 1, 31)).expected_output(date(2024, 2, 29)).execute();
    }

    #[test]
    fn one_month_later__common_year_end_of_january() {
        one_month_later().input(date(2023, 1, 31)).expected_output(date(2023, 2, 28)).execute();
    }

    #[test]
    fn one_month_later__mid_month() {
        one_month_later().input(date(2023, 4, 15)).expected_output(date(2023, 5, 15)).execute();
    }

    #[test]
    fn one_month_later__end_of_year() {
        one_month_later().input(date(2023, 12, 31)).expected_output(date(2024, 1, 31)).execute();
    }

    fn one_month_earlier() -> Test {
        Test::default().delta(-1)
    }

    #[test]
    fn one_month_earlier__end_of_march() {
        one_month_earlier().input(date(2024, 3, 31)).expected_output(date(2024, 2, 29)).execute();
    }

    #[test]
    fn one_month_earlier__start_of_year() {
        one_month_earlier().input(date(2024, 1, 1)).expected_output(date(2023, 12, 1)).execute();
    }

    #[test]
    fn several_years() {
        Test::default().delta(25).input(date(2023, 10, 31)).expected_output(date(2025, 11, 30)).execute();
    }

    #[test]
    fn zero() {
        Test::default().delta(0).input(date(2023, 10, 31)).expected_output(date(2023, 10, 31)).execute();
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod month_key_tests {
    use chrono::NaiveDate;

    use super::MonthKey;
    use crate::error::BillError;

    fn key(raw: &str) -> MonthKey {
        MonthKey::parse(raw).unwrap()
    }

    #[test]
    fn parse__nominal() {
        let month = key("2024-02");
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 2);
        assert_eq!(month.to_string(), "2024-02");
    }

    #[test]
    fn parse__single_digit_month_is_padded() {
        assert_eq!(key("2024-2").to_string(), "2024-02");
    }

    #[test]
    fn parse__invalid() {
        for raw in [
            "",
            "2024",
            "2024-13",
            "2024-00",
            "abcd-01",
            "2024-01-15",
            "2024/01",
            "+2024-+3",
            "2024-+3",
            "+2024-03",
            "24-03",
            "2024-003",
            "-2024-03",
        ] {
            assert!(
                matches!(MonthKey::parse(raw), Err(BillError::Validation(_))),
                "'{}' should be rejected",
                raw
            );
        }
    }

    #[test]
    fn from_date__first_day() {
        let month = MonthKey::from_date(&NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(month, key("2024-02"));
        assert_eq!(month, MonthKey::from_date(&NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
    }

    #[test]
    fn add_months__across_years() {
        assert_eq!(key("2023-11").add_months(3), Some(key("2024-02")));
        assert_eq!(key("2024-01").add_months(-1), Some(key("2023-12")));
    }

    #[test]
    fn months_since() {
        assert_eq!(key("2024-03").months_since(&key("2024-01")), 2);
        assert_eq!(key("2025-01").months_since(&key("2024-12")), 1);
        assert_eq!(key("2024-01").months_since(&key("2024-03")), -2);
    }

    #[test]
    fn ordering() {
        assert!(key("2023-12") < key("2024-01"));
        assert!(key("2024-02") > key("2024-01"));
    }

    #[test]
    fn serde__string() {
        let month: MonthKey = serde_json::from_value(serde_json::json!("2024-05")).unwrap();
        assert_eq!(month, key("2024-05"));
        assert_eq!(serde_json::to_value(month).unwrap(), serde_json::json!("2024-05"));
        assert!(serde_json::from_value::<MonthKey>(serde_json::json!("May 2024")).is_err());
    }
}
