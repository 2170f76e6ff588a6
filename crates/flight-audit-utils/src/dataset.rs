/*!
# Audit Dataset

The five input files of one audit run, loaded together. The day-cycle table is
held in an `Arc` so rule checks running elsewhere can keep a handle to it.
*/

use crate::{
    config::AuditFiles,
    day_cycle::DayCycleTable,
    errors::UtilsResult,
    lookup::{find_by_id, without_header},
    structured::read_structured,
    tabular::{read_table, Table},
    temporal::{resolve_timestamp, Instant, TimezoneHint},
};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Column of `lessons.csv` holding the takeoff timestamp
pub const TAKEOFF_COLUMN: usize = 3;

#[derive(Debug, Clone)]
pub struct AuditDataset {
    pub daycycle: Arc<DayCycleTable>,
    pub weather: Value,
    pub minimums: Table,
    pub students: Table,
    pub lessons: Table,
}

impl AuditDataset {
    /// Load every file named by `files` from `dir`; the first failure is returned.
    pub fn load<P: AsRef<Path>>(dir: P, files: &AuditFiles) -> UtilsResult<Self> {
        let dir = dir.as_ref();
        let paths = files.in_dir(dir);
        info!(dir = %dir.display(), "loading audit dataset");

        let daycycle = Arc::new(DayCycleTable::load(&paths.daycycle)?);
        let weather = read_structured(&paths.weather)?;
        let minimums = read_table(&paths.minimums)?;
        let students = read_table(&paths.students)?;
        let lessons = read_table(&paths.lessons)?;

        info!(
            timezone = daycycle.timezone().name(),
            students = students.len().saturating_sub(1),
            lessons = lessons.len().saturating_sub(1),
            "audit dataset loaded"
        );

        Ok(Self {
            daycycle,
            weather,
            minimums,
            students,
            lessons,
        })
    }

    /// Student row for `id`, searched below the header
    pub fn student(&self, id: &str) -> Option<&[String]> {
        find_by_id(id, without_header(&self.students))
    }

    /// Every lesson row with its takeoff resolved.
    ///
    /// Takeoffs without a zone are placed in the day-cycle table's timezone;
    /// unreadable takeoffs come back as `None`.
    pub fn lesson_takeoffs(&self) -> impl Iterator<Item = (&[String], Option<Instant>)> + '_ {
        let hint = TimezoneHint::from(self.daycycle.timezone());
        without_header(&self.lessons).iter().map(move |row| {
            let takeoff = row
                .get(TAKEOFF_COLUMN)
                .and_then(|cell| resolve_timestamp(cell, &hint));
            (row.as_slice(), takeoff)
        })
    }
}
