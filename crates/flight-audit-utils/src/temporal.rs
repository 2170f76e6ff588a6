/*!
# Timestamp Resolution

Flight logs carry timestamps in many shapes: full ISO-8601 with an offset, a
date and a wall-clock time with no zone at all, a bare date, or a bare time.
This module parses all of them into an [`Instant`] and settles the zone with a
fixed precedence:

1. A zone written in the timestamp itself (offset, `Z`, or an IANA name) always wins.
2. Otherwise a [`TimezoneHint::Name`] localizes the wall-clock time in that zone,
   using the offset in force on that calendar date.
3. Otherwise a [`TimezoneHint::Instant`] lends its UTC offset.
4. Otherwise the instant stays naive.

Unparsable input is not an error: it resolves to `None` so callers can report
"cannot determine" instead of guessing.
*/

use crate::config::ResolverConfig;
use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone, Utc,
};
use chrono_tz::{OffsetComponents, Tz};
use std::fmt;
use tracing::{debug, warn};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

// ================================================================================================
// Instant
// ================================================================================================

/// A parsed point in time, with or without a zone
#[derive(Debug, Clone, PartialEq)]
pub enum Instant {
    /// Wall-clock date and time with no zone attached
    Naive(NaiveDateTime),

    /// Explicit UTC offset, e.g. `2015-06-05T07:00:00-04:00`
    Fixed(DateTime<FixedOffset>),

    /// Named IANA zone; the offset follows the zone's seasonal rules
    Named(DateTime<Tz>),
}

impl Instant {
    pub fn is_naive(&self) -> bool {
        matches!(self, Instant::Naive(_))
    }

    /// Wall-clock date and time as written in the instant's own zone
    pub fn naive_local(&self) -> NaiveDateTime {
        match self {
            Instant::Naive(naive) => *naive,
            Instant::Fixed(dt) => dt.naive_local(),
            Instant::Named(dt) => dt.naive_local(),
        }
    }

    /// Calendar date in the instant's own zone
    pub fn date(&self) -> NaiveDate {
        self.naive_local().date()
    }

    /// UTC offset in effect for this instant, `None` when naive
    pub fn offset(&self) -> Option<FixedOffset> {
        match self {
            Instant::Naive(_) => None,
            Instant::Fixed(dt) => Some(*dt.offset()),
            Instant::Named(dt) => Some(dt.offset().fix()),
        }
    }

    /// The absolute point in time, `None` when naive
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Instant::Naive(_) => None,
            Instant::Fixed(dt) => Some(dt.with_timezone(&Utc)),
            Instant::Named(dt) => Some(dt.with_timezone(&Utc)),
        }
    }

    /// Localize a naive instant in `tz`; zoned instants are returned as they are.
    pub fn assume_zone(&self, tz: Tz) -> Option<Instant> {
        match self {
            Instant::Naive(naive) => localize(tz, *naive).map(Instant::Named),
            zoned => Some(zoned.clone()),
        }
    }
}

/// ISO-8601, with fractional seconds only when present and the offset only when zoned
impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instant::Naive(naive) => write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S%.f")),
            Instant::Fixed(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f%:z")),
            Instant::Named(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f%:z")),
        }
    }
}

// ================================================================================================
// Resolution
// ================================================================================================

/// Where a naive timestamp should borrow its zone from
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TimezoneHint {
    /// Leave naive timestamps naive
    #[default]
    None,

    /// IANA zone name, e.g. `"America/New_York"`
    Name(String),

    /// Another instant whose UTC offset is copied
    Instant(Instant),
}

impl From<&str> for TimezoneHint {
    fn from(name: &str) -> Self {
        TimezoneHint::Name(name.to_string())
    }
}

impl From<Tz> for TimezoneHint {
    fn from(tz: Tz) -> Self {
        TimezoneHint::Name(tz.name().to_string())
    }
}

impl From<Instant> for TimezoneHint {
    fn from(instant: Instant) -> Self {
        TimezoneHint::Instant(instant)
    }
}

/// Parse `text` and settle its zone, resolving time-only input against today's date.
pub fn resolve_timestamp(text: &str, hint: &TimezoneHint) -> Option<Instant> {
    resolve_timestamp_with(&ResolverConfig::default(), text, hint)
}

/// Parse `text` and settle its zone using `config`.
///
/// Returns `None` when `text` cannot be read as a timestamp, or when a name hint
/// does not match any known zone.
pub fn resolve_timestamp_with(
    config: &ResolverConfig,
    text: &str,
    hint: &TimezoneHint,
) -> Option<Instant> {
    let Some(parsed) = parse_timestamp(text, config) else {
        debug!(timestamp = text, "unparsable timestamp");
        return None;
    };

    match (parsed, hint) {
        (explicit @ (Instant::Fixed(_) | Instant::Named(_)), _) => Some(explicit),
        (Instant::Naive(naive), TimezoneHint::None) => Some(Instant::Naive(naive)),
        (Instant::Naive(naive), TimezoneHint::Name(name)) => match name.parse::<Tz>() {
            Ok(tz) => localize(tz, naive).map(Instant::Named),
            Err(_) => {
                warn!(timezone = %name, "unknown timezone hint");
                None
            }
        },
        (Instant::Naive(naive), TimezoneHint::Instant(source)) => match source.offset() {
            Some(offset) => offset
                .from_local_datetime(&naive)
                .single()
                .map(Instant::Fixed),
            None => Some(Instant::Naive(naive)),
        },
    }
}

/// Attach `tz` to a wall-clock time using the offset in force on that date.
///
/// A time repeated by a fall-back transition takes the standard-time offset.
/// A time skipped by a spring-forward transition is read with the offset in
/// force before the gap, which moves it forward by the size of the gap.
pub fn localize(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earlier, later) => {
            if earlier.offset().dst_offset() == TimeDelta::zero() {
                Some(earlier)
            } else {
                Some(later)
            }
        }
        LocalResult::None => {
            let before = tz
                .from_local_datetime(&(naive - TimeDelta::days(1)))
                .earliest()?;
            let offset_secs = before.offset().fix().local_minus_utc();
            let utc = naive - TimeDelta::seconds(i64::from(offset_secs));
            Some(tz.from_utc_datetime(&utc))
        }
    }
}

// ================================================================================================
// Parsing
// ================================================================================================

enum ZoneSuffix {
    None,
    Fixed(FixedOffset),
    Named(Tz),
}

fn parse_timestamp(text: &str, config: &ResolverConfig) -> Option<Instant> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (body, zone) = split_zone(text)?;
    let naive = parse_naive(body, config)?;

    match zone {
        ZoneSuffix::None => Some(Instant::Naive(naive)),
        ZoneSuffix::Fixed(offset) => offset
            .from_local_datetime(&naive)
            .single()
            .map(Instant::Fixed),
        ZoneSuffix::Named(tz) => localize(tz, naive).map(Instant::Named),
    }
}

/// Separate a trailing zone (`Z`, `±HH:MM`, `±HHMM`, `±HH` or a zone name) from the body
fn split_zone(text: &str) -> Option<(&str, ZoneSuffix)> {
    if let Some((body, name)) = text.rsplit_once(char::is_whitespace) {
        if let Ok(tz) = name.parse::<Tz>() {
            return Some((body.trim_end(), ZoneSuffix::Named(tz)));
        }
    }

    if let Some(body) = text.strip_suffix(|c: char| c == 'Z' || c == 'z') {
        if body.ends_with(|c: char| c.is_ascii_digit()) {
            return Some((body, ZoneSuffix::Fixed(FixedOffset::east_opt(0)?)));
        }
    }

    // Offsets only follow a time of day: search after the first ':', or after
    // the 'T' of the basic form (20150605T0700-0400)
    let time_at = text.find(':').or_else(|| text.find('T'));
    if let Some(time_at) = time_at {
        if let Some(sign_at) = text[time_at..].rfind(|c: char| c == '+' || c == '-').map(|i| time_at + i) {
            let offset = parse_offset(&text[sign_at..])?;
            return Some((text[..sign_at].trim_end(), ZoneSuffix::Fixed(offset)));
        }
    }

    Some((text, ZoneSuffix::None))
}

fn parse_offset(text: &str) -> Option<FixedOffset> {
    let (sign, digits) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };
    let digits = digits.replace(':', "");
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (
            digits[..2].parse::<i32>().ok()?,
            digits[2..].parse::<i32>().ok()?,
        ),
        _ => return None,
    };
    if minutes >= 60 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_naive(body: &str, config: &ResolverConfig) -> Option<NaiveDateTime> {
    if let Some(naive) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(body, fmt).ok())
    {
        return Some(naive);
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(body, fmt).ok())
    {
        return date.and_hms_opt(0, 0, 0);
    }

    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(body, fmt).ok())
        .map(|time| config.date_for_time_only().and_time(time))
}

// ================================================================================================
// Tests
// ================================================================================================
