//! Date parsing and formatting helpers.
//!
//! The front desk types dates as `DD-MM-YYYY` and appointment slots as
//! `DD-MM-YYYY HH:MM` (leading zeros optional). The store keeps ISO text so
//! that ordering by column equals chronological ordering.

use crate::error::{RegistryError, RegistryResult};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

const INPUT_DATE: &[BorrowedFormatItem<'_>] =
    format_description!("[day padding:none]-[month padding:none]-[year]");
const INPUT_DATE_TIME: &[BorrowedFormatItem<'_>] = format_description!(
    "[day padding:none]-[month padding:none]-[year] [hour padding:none]:[minute]"
);
const ISO_DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const ISO_DATE_TIME: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");
const LONG_DATE: &[BorrowedFormatItem<'_>] =
    format_description!("[month repr:long] [day], [year]");
const CLOCK: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]");

/// Parses a `DD-MM-YYYY` date.
///
/// # Errors
///
/// Returns [`RegistryError::InvalidDateFormat`] for anything else.
pub fn parse_date(input: &str) -> RegistryResult<Date> {
    Date::parse(input.trim(), INPUT_DATE).map_err(|_| RegistryError::InvalidDateFormat {
        input: input.to_string(),
        expected: "DD-MM-YYYY",
    })
}

/// Parses a `DD-MM-YYYY HH:MM` appointment slot.
///
/// # Errors
///
/// Returns [`RegistryError::InvalidDateFormat`] for anything else.
pub fn parse_date_time(input: &str) -> RegistryResult<PrimitiveDateTime> {
    PrimitiveDateTime::parse(input.trim(), INPUT_DATE_TIME).map_err(|_| {
        RegistryError::InvalidDateFormat {
            input: input.to_string(),
            expected: "DD-MM-YYYY HH:MM",
        }
    })
}

/// `July 02, 2025`
pub fn long_date(date: Date) -> String {
    date.format(LONG_DATE).unwrap_or_else(|_| date.to_string())
}

/// `09:00`
pub fn clock(at: PrimitiveDateTime) -> String {
    at.format(CLOCK).unwrap_or_else(|_| at.time().to_string())
}

/// `02-07-2025`, the same shape the desk types in.
pub fn short_date(date: Date) -> String {
    format!(
        "{:02}-{:02}-{}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

/// `02-07-2025 09:00`
pub fn short_date_time(at: PrimitiveDateTime) -> String {
    format!("{} {}", short_date(at.date()), clock(at))
}

/// The local calendar date, falling back to UTC when the offset is unknown.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

pub(crate) fn to_iso_date(date: Date) -> String {
    date.format(ISO_DATE).unwrap_or_else(|_| date.to_string())
}

pub(crate) fn to_iso_date_time(at: PrimitiveDateTime) -> String {
    at.format(ISO_DATE_TIME).unwrap_or_else(|_| at.to_string())
}

pub(crate) fn from_iso_date(raw: &str) -> Result<Date, time::error::Parse> {
    Date::parse(raw, ISO_DATE)
}

pub(crate) fn from_iso_date_time(raw: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(raw, ISO_DATE_TIME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn parses_dates_with_and_without_leading_zeros() {
        assert_eq!(parse_date("2-7-2025").unwrap(), date!(2025 - 07 - 02));
        assert_eq!(parse_date("02-07-2025").unwrap(), date!(2025 - 07 - 02));
        assert_eq!(parse_date(" 31-12-2024 ").unwrap(), date!(2024 - 12 - 31));
    }

    #[test]
    fn parses_appointment_slots() {
        assert_eq!(
            parse_date_time("1-7-2025 9:00").unwrap(),
            datetime!(2025 - 07 - 01 9:00)
        );
        assert_eq!(
            parse_date_time("01-07-2025 14:30").unwrap(),
            datetime!(2025 - 07 - 01 14:30)
        );
    }

    #[test]
    fn rejects_other_shapes() {
        for input in ["2025-07-02", "July 2, 2025", "32-1-2025", "2-7-25", ""] {
            let err = parse_date(input).unwrap_err();
            assert!(matches!(err, RegistryError::InvalidDateFormat { .. }), "{input}");
        }
        let err = parse_date_time("1-7-2025").unwrap_err();
        assert!(err.to_string().contains("DD-MM-YYYY HH:MM"));
    }

    #[test]
    fn formats_for_reports() {
        assert_eq!(long_date(date!(2025 - 07 - 02)), "July 02, 2025");
        assert_eq!(clock(datetime!(2025 - 07 - 01 9:05)), "09:05");
        assert_eq!(short_date(date!(2025 - 07 - 02)), "02-07-2025");
    }

    #[test]
    fn iso_text_round_trips() {
        let at = datetime!(2025 - 07 - 01 9:00);
        assert_eq!(to_iso_date_time(at), "2025-07-01 09:00");
        assert_eq!(from_iso_date_time("2025-07-01 09:00").unwrap(), at);
        assert_eq!(from_iso_date(&to_iso_date(at.date())).unwrap(), at.date());
    }
}
