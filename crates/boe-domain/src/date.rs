//! Date module - upstream `YYYYMMDD` publication dates

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// A calendar date in the upstream wire format (`YYYYMMDD`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiDate(NaiveDate);

impl ApiDate {
    /// Parse a `YYYYMMDD` string
    ///
    /// # Errors
    /// Returns error if the value is not eight digits or not a real date
    pub fn parse(value: &str) -> Result<Self, String> {
        if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!(
                "Invalid date '{}': expected format YYYYMMDD (e.g. 20240529)",
                value
            ));
        }
        NaiveDate::parse_from_str(value, "%Y%m%d")
            .map(Self)
            .map_err(|_| format!("Invalid date '{}': not a calendar date", value))
    }

    /// Wrap an existing calendar date
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today's date in the local timezone
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Underlying calendar date
    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Shift by a number of days (negative goes back)
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Wire form, e.g. `20240529`
    pub fn to_api_string(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }

    /// Short display form, e.g. `29/05/2024`
    pub fn short(&self) -> String {
        self.0.format("%d/%m/%Y").to_string()
    }

    /// Long Spanish display form, e.g. `29 de mayo de 2024`
    pub fn long_es(&self) -> String {
        format!(
            "{} de {} de {}",
            self.0.day(),
            MONTHS_ES[self.0.month0() as usize],
            self.0.year()
        )
    }

    /// Spanish weekday name
    pub fn weekday_es(&self) -> &'static str {
        match self.0.weekday() {
            Weekday::Mon => "lunes",
            Weekday::Tue => "martes",
            Weekday::Wed => "miércoles",
            Weekday::Thu => "jueves",
            Weekday::Fri => "viernes",
            Weekday::Sat => "sábado",
            Weekday::Sun => "domingo",
        }
    }

    /// The gazette is not published on Sundays
    pub fn is_sunday(&self) -> bool {
        self.0.weekday() == Weekday::Sun
    }

    /// Year component
    pub fn year(&self) -> i32 {
        self.0.year()
    }
}

impl fmt::Display for ApiDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

impl TryFrom<String> for ApiDate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ApiDate> for String {
    fn from(date: ApiDate) -> Self {
        date.to_api_string()
    }
}

impl std::str::FromStr for ApiDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Render an upstream `YYYYMMDD` field as `dd/mm/yyyy`
///
/// Values that are not valid dates are returned untouched.
pub fn display_upstream_date(value: &str) -> String {
    ApiDate::parse(value)
        .map(|d| d.short())
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_valid() {
        let date = ApiDate::parse("20240529").unwrap();
        assert_eq!(date.to_api_string(), "20240529");
        assert_eq!(date.short(), "29/05/2024");
        assert_eq!(date.long_es(), "29 de mayo de 2024");
        assert_eq!(date.weekday_es(), "miércoles");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ApiDate::parse("2024-05-29").is_err());
        assert!(ApiDate::parse("2024052").is_err());
        assert!(ApiDate::parse("20241332").is_err());
        assert!(ApiDate::parse("20230229").is_err());
        assert!(ApiDate::parse("abcdefgh").is_err());
        assert!(ApiDate::parse("").is_err());
    }

    #[test]
    fn test_add_days_and_sunday() {
        let date = ApiDate::parse("20240601").unwrap(); // Saturday
        assert!(!date.is_sunday());
        assert!(date.add_days(1).is_sunday());
        assert_eq!(date.add_days(-1).to_string(), "20240531");
    }

    #[test]
    fn test_display_upstream_date() {
        assert_eq!(display_upstream_date("19781229"), "29/12/1978");
        assert_eq!(display_upstream_date("N/A"), "N/A");
    }

    proptest! {
        #[test]
        fn prop_only_sundays_are_skipped(days in 0i64..80_000) {
            let base = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
            let date = ApiDate::from_naive(base + Duration::days(days));
            prop_assert_eq!(date.is_sunday(), date.weekday_es() == "domingo");
        }

        #[test]
        fn prop_non_digit_input_rejected(s in "[^0-9]{8}") {
            prop_assert!(ApiDate::parse(&s).is_err());
        }
    }
}
