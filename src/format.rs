use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Keeps only ASCII digits.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// `"12345678901"` -> `"123.456.789-01"`. Anything that does not reduce to
/// exactly 11 digits comes back unchanged.
pub fn format_cpf(cpf: &str) -> String {
    let digits = digits_only(cpf);
    if digits.len() != 11 {
        return cpf.to_string();
    }
    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

pub fn is_valid_cpf_format(cpf: &str) -> bool {
    digits_only(cpf).len() == 11
}

/// dd/mm/yyyy
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Formats an ISO date (or datetime) string; unparsable input is returned as is.
pub fn format_iso_date(value: &str) -> String {
    parse_date(value)
        .map(format_date)
        .unwrap_or_else(|| value.to_string())
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(d);
    }
    parse_datetime(value).map(|dt| dt.date())
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Accepts RFC 3339, naive ISO datetimes, or a bare `HH:MM[:SS]`.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    if let Some(dt) = parse_datetime(value) {
        return Some(dt.time());
    }
    ["%H:%M:%S%.f", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(value, fmt).ok())
}

/// HH:MM
pub fn format_time(value: &str) -> Option<String> {
    parse_time(value).map(|t| t.format("%H:%M").to_string())
}

/// `"08:00 - 08:30"`; `None` if either end cannot be parsed.
pub fn format_time_range(start: &str, end: &str) -> Option<String> {
    Some(format!("{} - {}", format_time(start)?, format_time(end)?))
}

pub fn is_today(date: NaiveDate, today: NaiveDate) -> bool {
    date == today
}

/// Week runs Sunday through Saturday.
pub fn is_this_week(date: NaiveDate, today: NaiveDate) -> bool {
    let offset = today.weekday().num_days_from_sunday() as i64;
    let start = today - Duration::days(offset);
    let end = start + Duration::days(6);
    date >= start && date <= end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_format_cpf_eleven_digits() {
        assert_eq!(format_cpf("12345678901"), "123.456.789-01");
    }

    #[test]
    fn test_format_cpf_already_masked_is_normalised() {
        assert_eq!(format_cpf("123.456.789-01"), "123.456.789-01");
    }

    #[test]
    fn test_format_cpf_wrong_length_unchanged() {
        assert_eq!(format_cpf("1234567890"), "1234567890");
        assert_eq!(format_cpf("123456789012"), "123456789012");
        assert_eq!(format_cpf("abc"), "abc");
        assert_eq!(format_cpf(""), "");
    }

    #[test]
    fn test_is_valid_cpf_format() {
        assert!(is_valid_cpf_format("123.456.789-01"));
        assert!(!is_valid_cpf_format("123.456.789"));
    }

    #[test]
    fn test_format_dates() {
        assert_eq!(format_date(d(2026, 3, 9)), "09/03/2026");
        assert_eq!(format_iso_date("2026-03-09"), "09/03/2026");
        assert_eq!(format_iso_date("2026-03-09T14:00:00Z"), "09/03/2026");
        assert_eq!(format_iso_date("soon"), "soon");
    }

    #[test]
    fn test_format_time_variants() {
        assert_eq!(format_time("2026-03-09T08:05:00").as_deref(), Some("08:05"));
        assert_eq!(format_time("2026-03-09T08:05:00-03:00").as_deref(), Some("08:05"));
        assert_eq!(format_time("14:30:00").as_deref(), Some("14:30"));
        assert_eq!(format_time("14:30").as_deref(), Some("14:30"));
        assert_eq!(format_time("later"), None);
    }

    #[test]
    fn test_format_time_range() {
        assert_eq!(
            format_time_range("08:00:00", "08:30:00").as_deref(),
            Some("08:00 - 08:30")
        );
        assert_eq!(format_time_range("08:00", "??"), None);
    }

    #[test]
    fn test_is_this_week_sunday_start() {
        // 2026-10-14 is a Wednesday; its week is Sun 11th .. Sat 17th.
        let today = d(2026, 10, 14);
        assert!(is_this_week(d(2026, 10, 11), today));
        assert!(is_this_week(d(2026, 10, 17), today));
        assert!(!is_this_week(d(2026, 10, 10), today));
        assert!(!is_this_week(d(2026, 10, 18), today));
        assert!(is_today(today, today));
    }
}
