use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for turning timestamp strings into instants
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Calendar date given to time-only input such as `"07:30"`.
    /// `None` means today's date in UTC at the moment of parsing.
    pub default_date: Option<NaiveDate>,
}

impl ResolverConfig {
    /// Resolve time-only input against a fixed date
    pub fn on(date: NaiveDate) -> Self {
        Self {
            default_date: Some(date),
        }
    }

    pub(crate) fn date_for_time_only(&self) -> NaiveDate {
        self.default_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// File names making up one audit run, relative to the audit directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditFiles {
    /// Sunrise/sunset reference table (JSON)
    pub daycycle: PathBuf,

    /// Hourly weather observations (JSON)
    pub weather: PathBuf,

    /// Weather minimums per certification (CSV)
    pub minimums: PathBuf,

    /// Student pilots keyed by student id (CSV)
    pub students: PathBuf,

    /// Flight lessons, one takeoff per row (CSV)
    pub lessons: PathBuf,
}

impl Default for AuditFiles {
    fn default() -> Self {
        Self {
            daycycle: PathBuf::from("daycycle.json"),
            weather: PathBuf::from("weather.json"),
            minimums: PathBuf::from("minimums.csv"),
            students: PathBuf::from("students.csv"),
            lessons: PathBuf::from("lessons.csv"),
        }
    }
}

impl AuditFiles {
    /// The same file set with every name joined onto `dir`
    pub fn in_dir(&self, dir: &Path) -> Self {
        Self {
            daycycle: dir.join(&self.daycycle),
            weather: dir.join(&self.weather),
            minimums: dir.join(&self.minimums),
            students: dir.join(&self.students),
            lessons: dir.join(&self.lessons),
        }
    }
}
