//! Calendar-date parsing and the entry/wire format split
//!
//! Dates are entered and validated in ISO `YYYY-MM-DD`; the API expects
//! the American `MM/DD/YYYY` ordering. Validation works on the entry
//! format only; the wire transform happens after validation succeeds,
//! so a schema change never requires a serialization change and vice
//! versa.

use chrono::{Datelike, NaiveDate};

/// Format used by the date entry widgets
pub const ENTRY_FORMAT: &str = "%Y-%m-%d";

/// Format the API expects for date fields
pub const WIRE_FORMAT: &str = "%m/%d/%Y";

/// Parse an entry-format string into a real calendar date
pub fn parse_entry(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, ENTRY_FORMAT).ok()
}

/// Transform a validated entry-format date into the wire format
pub fn to_wire_format(value: &str) -> Option<String> {
    parse_entry(value).map(|date| date.format(WIRE_FORMAT).to_string())
}

/// Normalize a stored date (wire or entry format) into the entry format
/// for seeding an edit form. Unparseable input is passed through
/// unchanged so the user sees what the server sent.
pub fn to_entry_format(value: &str) -> String {
    NaiveDate::parse_from_str(value, WIRE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, ENTRY_FORMAT))
        .map(|date| date.format(ENTRY_FORMAT).to_string())
        .unwrap_or_else(|_| value.to_string())
}

/// Whole years between an entry-format birthday and `today`
pub fn age_in_years(birthday: &str, today: NaiveDate) -> Option<u32> {
    let birthday = parse_entry(birthday)?;
    if birthday > today {
        return None;
    }
    let mut age = today.year() - birthday.year();
    if (today.month(), today.day()) < (birthday.month(), birthday.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry_accepts_real_dates() {
        assert_eq!(
            parse_entry("2020-01-01"),
            NaiveDate::from_ymd_opt(2020, 1, 1)
        );
    }

    #[test]
    fn test_parse_entry_rejects_impossible_dates() {
        assert!(parse_entry("2020-02-30").is_none());
        assert!(parse_entry("01/02/2020").is_none());
        assert!(parse_entry("").is_none());
    }

    #[test]
    fn test_to_wire_format() {
        assert_eq!(to_wire_format("2020-01-31").as_deref(), Some("01/31/2020"));
        assert!(to_wire_format("not-a-date").is_none());
    }

    #[test]
    fn test_wire_round_trip_preserves_calendar_date() {
        let entered = "1987-11-03";
        let wire = to_wire_format(entered).unwrap();
        let reparsed = NaiveDate::parse_from_str(&wire, WIRE_FORMAT).unwrap();
        assert_eq!(Some(reparsed), parse_entry(entered));
    }

    #[test]
    fn test_to_entry_format_normalizes_wire_dates() {
        assert_eq!(to_entry_format("01/31/2020"), "2020-01-31");
        assert_eq!(to_entry_format("2020-01-31"), "2020-01-31");
    }

    #[test]
    fn test_to_entry_format_passes_through_garbage() {
        assert_eq!(to_entry_format("???"), "???");
    }

    #[test]
    fn test_age_in_years() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert_eq!(age_in_years("2000-08-06", today), Some(26));
        assert_eq!(age_in_years("2000-08-07", today), Some(25));
        assert_eq!(age_in_years("2030-01-01", today), None);
        assert_eq!(age_in_years("bad", today), None);
    }
}
