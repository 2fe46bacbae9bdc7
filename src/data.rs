//! Locale-aware try-parsers for raw column values.
//!
//! Every parser trims surrounding whitespace, returns `None` instead of an
//! error on malformed input, and never panics. The classifier only cares
//! whether a value parses, but the parsed values are returned so callers and
//! tests can check what a culture actually understood.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::culture::Culture;

const TIME_FORMATS: &[&str] = &[
    "%H:%M",
    "%H:%M:%S",
    "%H:%M:%S%.f",
    "%I:%M %p",
    "%I:%M:%S %p",
];

const MAX_TIME_SPAN_DAYS: i64 = 10_675_199;

pub fn parse_int(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

pub fn parse_long(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Parses a floating point value using the culture's decimal separator.
///
/// Accepts an optional sign, digits with at most one decimal separator and an
/// optional exponent. Grouping separators are rejected.
pub fn parse_double(value: &str, culture: &Culture) -> Option<f64> {
    let trimmed = value.trim();
    match trimmed {
        "NaN" => return Some(f64::NAN),
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let mut normalized = String::with_capacity(trimmed.len());
    let mut chars = trimmed.chars().peekable();
    if let Some(&sign) = chars.peek() {
        if sign == '+' || sign == '-' {
            normalized.push(sign);
            chars.next();
        }
    }

    let mut mantissa_digits = 0usize;
    let mut seen_separator = false;
    while let Some(&ch) = chars.peek() {
        if ch.is_ascii_digit() {
            mantissa_digits += 1;
            normalized.push(ch);
        } else if ch == culture.decimal_separator && !seen_separator {
            seen_separator = true;
            normalized.push('.');
        } else {
            break;
        }
        chars.next();
    }
    if mantissa_digits == 0 {
        return None;
    }

    if let Some(marker) = chars.next() {
        if marker != 'e' && marker != 'E' {
            return None;
        }
        normalized.push('e');
        if let Some(&sign) = chars.peek() {
            if sign == '+' || sign == '-' {
                normalized.push(sign);
                chars.next();
            }
        }
        let exponent: String = chars.collect();
        if exponent.is_empty() || !exponent.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        normalized.push_str(&exponent);
    }

    normalized.parse().ok()
}

pub fn parse_date(value: &str, culture: &Culture) -> Option<NaiveDate> {
    let trimmed = value.trim();
    culture
        .short_date_patterns()
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
}

/// Parses a date-time instant.
///
/// A bare date resolves to midnight and a bare time of day resolves to the
/// epoch date, so both count as date-time values.
pub fn parse_datetime(value: &str, culture: &Culture) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.naive_utc());
    }
    if let Some(date) = parse_date(trimmed, culture) {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Some(time) = parse_time(trimmed) {
        return Some(NaiveDateTime::UNIX_EPOCH.date().and_time(time));
    }

    let date_patterns = culture.short_date_patterns();
    for date_fmt in &date_patterns {
        for time_fmt in TIME_FORMATS {
            for joiner in [" ", "T"] {
                let pattern = format!("{date_fmt}{joiner}{time_fmt}");
                if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, &pattern) {
                    return Some(parsed);
                }
            }
        }
    }
    None
}

/// Parses a duration of the form `[-]d`, `[-][d.]hh:mm[:ss[.fffffff]]` or
/// `[-]d:hh:mm:ss[.fffffff]`.
pub fn parse_time_span(value: &str, culture: &Culture) -> Option<Duration> {
    let trimmed = value.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if body.is_empty() {
        return None;
    }

    let parts: Vec<&str> = body.split(':').collect();
    let (days, hours, minutes, seconds) = match parts.as_slice() {
        [days] => (number(days)?, 0, 0, None),
        [first, minutes] => {
            let (days, hours) = split_days(first)?;
            (days, hours, number(minutes)?, None)
        }
        [first, minutes, seconds] => {
            let (days, hours) = split_days(first)?;
            (days, hours, number(minutes)?, Some(*seconds))
        }
        [days, hours, minutes, seconds] => (
            number(days)?,
            number(hours)?,
            number(minutes)?,
            Some(*seconds),
        ),
        _ => return None,
    };
    if days > MAX_TIME_SPAN_DAYS || hours > 23 || minutes > 59 {
        return None;
    }

    let (whole_seconds, nanos) = match seconds {
        Some(raw) => parse_seconds(raw, culture)?,
        None => (0, 0),
    };
    if whole_seconds > 59 {
        return None;
    }

    let total = Duration::days(days)
        + Duration::hours(hours)
        + Duration::minutes(minutes)
        + Duration::seconds(whole_seconds)
        + Duration::nanoseconds(nanos);
    Some(if negative { -total } else { total })
}

pub fn parse_bool(value: &str) -> Option<bool> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn number(segment: &str) -> Option<i64> {
    if segment.is_empty() || segment.len() > 8 || !segment.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn split_days(segment: &str) -> Option<(i64, i64)> {
    match segment.split_once('.') {
        Some((days, hours)) => Some((number(days)?, number(hours)?)),
        None => Some((0, number(segment)?)),
    }
}

fn parse_seconds(raw: &str, culture: &Culture) -> Option<(i64, i64)> {
    let split = raw
        .char_indices()
        .find(|(_, c)| *c == '.' || *c == culture.decimal_separator);
    let (whole, fraction) = match split {
        Some((idx, sep)) => (&raw[..idx], &raw[idx + sep.len_utf8()..]),
        None => (raw, ""),
    };
    let whole = number(whole)?;
    if split.is_none() {
        return Some((whole, 0));
    }
    if fraction.is_empty() || fraction.len() > 7 || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    let padded = format!("{fraction:0<9}");
    Some((whole, padded.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn culture(code: &str) -> Culture {
        Culture::from_code(Some(code)).expect("known culture")
    }

    #[test]
    fn integers_respect_width() {
        assert_eq!(parse_int(" 42 "), Some(42));
        assert_eq!(parse_int("+7"), Some(7));
        assert_eq!(parse_int("3000000000"), None);
        assert_eq!(parse_long("3000000000"), Some(3_000_000_000));
        assert_eq!(parse_long("1,000"), None);
    }

    #[test]
    fn doubles_use_culture_decimal_separator() {
        let invariant = Culture::invariant();
        assert_eq!(parse_double("12.5", &invariant), Some(12.5));
        assert_eq!(parse_double("-1.5e3", &invariant), Some(-1500.0));
        assert_eq!(parse_double(".5", &invariant), Some(0.5));
        assert_eq!(parse_double("12,5", &invariant), None);
        assert_eq!(parse_double("inf", &invariant), None);
        assert_eq!(parse_double("1e", &invariant), None);
        assert!(parse_double("NaN", &invariant).is_some_and(f64::is_nan));

        let german = culture("de-DE");
        assert_eq!(parse_double("12,5", &german), Some(12.5));
        assert_eq!(parse_double("12.5", &german), None);
    }

    #[test]
    fn dates_follow_culture_order() {
        let us = culture("en-US");
        let gb = culture("en-GB");
        assert_eq!(
            parse_date("02/03/2024", &us),
            NaiveDate::from_ymd_opt(2024, 2, 3)
        );
        assert_eq!(
            parse_date("02/03/2024", &gb),
            NaiveDate::from_ymd_opt(2024, 3, 2)
        );
        assert_eq!(
            parse_date("2024-03-02", &culture("de-DE")),
            NaiveDate::from_ymd_opt(2024, 3, 2)
        );
        assert_eq!(parse_date("13/13/2024", &us), None);
    }

    #[test]
    fn datetimes_accept_dates_times_and_combinations() {
        let invariant = Culture::invariant();
        assert!(parse_datetime("2024-01-05T10:30:00Z", &invariant).is_some());
        assert!(parse_datetime("01/05/2024 10:30", &invariant).is_some());
        assert!(parse_datetime("2024-01-05T10:30:15", &invariant).is_some());
        assert!(parse_datetime("Jan 5, 2024", &invariant).is_some());
        let time_only = parse_datetime("10:30", &invariant).expect("time of day");
        assert_eq!(time_only.hour(), 10);
        assert!(parse_datetime("hello", &invariant).is_none());
        assert!(parse_datetime("42", &invariant).is_none());
    }

    #[test]
    fn time_spans_cover_days_and_fractions() {
        let invariant = Culture::invariant();
        assert_eq!(parse_time_span("5", &invariant), Some(Duration::days(5)));
        assert_eq!(
            parse_time_span("1.02:03:04", &invariant),
            Some(Duration::days(1) + Duration::hours(2) + Duration::minutes(3) + Duration::seconds(4))
        );
        assert_eq!(
            parse_time_span("-00:00:01.5", &invariant),
            Some(-Duration::milliseconds(1500))
        );
        assert_eq!(
            parse_time_span("1:00:00:00", &invariant),
            Some(Duration::days(1))
        );
        assert_eq!(parse_time_span("25:00", &invariant), None);
        assert_eq!(parse_time_span("10:61", &invariant), None);
        assert_eq!(parse_time_span("abc", &invariant), None);
    }

    #[test]
    fn booleans_are_literal_only() {
        assert_eq!(parse_bool(" TRUE "), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("yes"), None);
        assert_eq!(parse_bool("1"), None);
    }
}
