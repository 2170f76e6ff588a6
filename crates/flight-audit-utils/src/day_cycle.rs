/*!
# Day-Cycle Reference Table

Sunrise and sunset times per calendar date, all expressed in one declared
timezone. The document looks like:

```json
{
    "timezone": "America/New_York",
    "2015": {
        "01-01": { "sunrise": "07:35", "sunset": "16:44" },
        "01-02": { "sunrise": "07:36", "sunset": "16:45" }
    }
}
```

A table is loaded once per audit run and never changes afterwards; share it by
reference or behind an `Arc` and classify from as many threads as needed.
*/

use crate::{
    errors::{UtilsError, UtilsResult},
    structured::read_structured,
    temporal::{resolve_timestamp, Instant, TimezoneHint},
};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Sunrise and sunset for one date, as wall-clock strings such as `"07:35"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunTimes {
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Deserialize)]
struct DayCycleDocument {
    timezone: String,

    #[serde(flatten)]
    years: BTreeMap<String, BTreeMap<String, SunTimes>>,
}

/// Immutable sunrise/sunset lookup keyed by year (`"2015"`) and month-day (`"06-05"`)
#[derive(Debug, Clone, PartialEq)]
pub struct DayCycleTable {
    timezone: Tz,
    years: BTreeMap<String, BTreeMap<String, SunTimes>>,
}

impl DayCycleTable {
    /// Load and validate a day-cycle JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> UtilsResult<Self> {
        Self::from_value(read_structured(path)?)
    }

    /// Build a table from an already-parsed JSON document.
    ///
    /// Fails when the `timezone` entry is not a known zone, or when any entry has
    /// an unreadable time or a sunset that is not after its sunrise.
    pub fn from_value(value: Value) -> UtilsResult<Self> {
        let document: DayCycleDocument = serde_json::from_value(value)?;
        let timezone = document
            .timezone
            .parse::<Tz>()
            .map_err(|_| UtilsError::InvalidTimezone(document.timezone.clone()))?;

        let table = Self {
            timezone,
            years: document.years,
        };
        table.validate()?;
        Ok(table)
    }

    /// Zone every sunrise and sunset is expressed in
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Raw entry for `date`, if the table covers it
    pub fn entry(&self, date: NaiveDate) -> Option<&SunTimes> {
        let year = date.format("%Y").to_string();
        let Some(days) = self.years.get(&year) else {
            debug!(%year, "no day-cycle data for year");
            return None;
        };

        let month_day = date.format("%m-%d").to_string();
        let times = days.get(&month_day);
        if times.is_none() {
            debug!(%year, %month_day, "no day-cycle data for date");
        }
        times
    }

    /// Sunrise and sunset on `date` as instants in the table's timezone
    pub fn sun_times(&self, date: NaiveDate) -> Option<(Instant, Instant)> {
        let times = self.entry(date)?;
        let hint = TimezoneHint::from(self.timezone);
        let day = date.format("%Y-%m-%d");

        let sunrise = resolve_timestamp(&format!("{day}T{}", times.sunrise), &hint)?;
        let sunset = resolve_timestamp(&format!("{day}T{}", times.sunset), &hint)?;
        Some((sunrise, sunset))
    }

    fn validate(&self) -> UtilsResult<()> {
        for (year, days) in &self.years {
            for (month_day, times) in days {
                let date = format!("{year}-{month_day}");
                let sunrise = wall_clock(&date, &times.sunrise)?;
                let sunset = wall_clock(&date, &times.sunset)?;

                if sunset <= sunrise {
                    return Err(UtilsError::InvalidDayCycle(format!(
                        "{date}: sunset {} is not after sunrise {}",
                        times.sunset, times.sunrise
                    )));
                }
            }
        }
        Ok(())
    }
}

fn wall_clock(date: &str, time: &str) -> UtilsResult<chrono::NaiveDateTime> {
    match resolve_timestamp(&format!("{date}T{time}"), &TimezoneHint::None) {
        Some(Instant::Naive(naive)) if naive.format("%Y-%m-%d").to_string() == date => Ok(naive),
        _ => Err(UtilsError::InvalidDayCycle(format!(
            "{date}: cannot read '{time}' as a wall-clock time"
        ))),
    }
}

// ================================================================================================
// Classification
// ================================================================================================

/// Whether `instant` falls between sunrise (inclusive) and sunset (exclusive).
///
/// The date looked up is the instant's own calendar date, so one moment written
/// with different offsets can land on different entries. A naive instant is
/// taken to be in the table's timezone. Returns `None` when the table has no
/// entry for that year or date.
pub fn is_daytime(instant: &Instant, table: &DayCycleTable) -> Option<bool> {
    let date = instant.date();
    let (sunrise, sunset) = table.sun_times(date)?;

    let at = instant.assume_zone(table.timezone())?.to_utc()?;
    let sunrise = sunrise.to_utc()?;
    let sunset = sunset.to_utc()?;

    Some(sunrise <= at && at < sunset)
}

// ================================================================================================
// Tests
// ================================================================================================
