//! Raw observation -> canonical annual series.
//!
//! Steps:
//! 1. `Absent` / empty input -> no series
//! 2. multi-part keys are projected onto their last part (the period)
//! 3. periods are parsed into years; unparseable rows and non-finite values are dropped
//! 4. a scalar (point query) becomes a one-point series keyed by the request year
//! 5. years outside the request window are dropped; an empty result -> no series
//!
//! Duplicate years resolve last-write-wins in input order.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::domain::{CanonicalSeries, Period, RawObservation, TimeWindow, Year};

/// Normalize one raw fetch result. `None` means "absent".
pub fn normalize(raw: &RawObservation, window: TimeWindow) -> Option<CanonicalSeries> {
    if window.is_empty() {
        return None;
    }

    let points: Vec<(Year, f64)> = match raw {
        RawObservation::Absent => return None,
        RawObservation::Scalar(value) => vec![(window.start, *value)],
        RawObservation::Series(rows) => rows
            .iter()
            .filter_map(|(period, value)| Some((period_year(period)?, *value)))
            .collect(),
        RawObservation::MultiIndexed(rows) => rows
            .iter()
            .filter_map(|(parts, value)| {
                let period = parts.last()?;
                Some((parse_year(period)?, *value))
            })
            .collect(),
    };

    let series: CanonicalSeries = points
        .into_iter()
        .filter(|(year, value)| value.is_finite() && window.contains(*year))
        .collect();

    if series.is_empty() { None } else { Some(series) }
}

fn period_year(period: &Period) -> Option<Year> {
    match period {
        Period::Year(year) => Some(*year),
        Period::Text(text) => parse_year(text),
    }
}

/// Extract the calendar year from a date or reporting-period string.
///
/// Accepted: `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, RFC 3339 date-times, naive
/// date-times (`YYYY-MM-DDTHH:MM:SS` or with a space, optional fraction), and SDMX
/// reporting periods (`YYYY-Qn`, `YYYY-Sn`, `YYYY-Mnn`, `YYYY-Wnn`, `YYYY-A1`,
/// with or without the dash). Returns `None` for anything else.
pub fn parse_year(text: &str) -> Option<Year> {
    let text = text.trim();
    if text.len() < 4 || !text.is_char_boundary(4) {
        return None;
    }
    let (head, rest) = text.split_at(4);
    if !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: Year = head.parse().ok()?;

    if rest.is_empty() {
        return Some(year);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.year());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.year());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.year());
        }
    }

    let suffix = rest.strip_prefix('-').unwrap_or(rest);
    let mut chars = suffix.chars();
    let tag = chars.next()?;
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || digits.len() > 2 {
        return None;
    }
    let n: u32 = digits.parse().ok()?;

    let valid = match tag {
        // `YYYY-MM` (only with the dash).
        _ if tag.is_ascii_digit() => {
            let month: u32 = suffix.parse().ok()?;
            rest.starts_with('-') && suffix.len() == 2 && (1..=12).contains(&month)
        }
        'A' => n == 1,
        'S' => (1..=2).contains(&n),
        'Q' => (1..=4).contains(&n),
        'M' => (1..=12).contains(&n),
        'W' => (1..=53).contains(&n),
        _ => false,
    };

    valid.then_some(year)
}
