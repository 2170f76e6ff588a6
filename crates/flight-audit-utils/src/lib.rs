/*!
# Flight Audit Utilities

Shared building blocks for auditing flight-school records against day/night
rules.

## Components

- **Tabular codec** ([`tabular`]): CSV files as rows of string cells, and typed
  [`Cell`] values for writing reports.
- **Structured codec** ([`structured`]): JSON files as [`serde_json::Value`].
- **Temporal resolver** ([`temporal`]): timestamp strings to [`Instant`]s. A zone
  written in the timestamp always wins over a [`TimezoneHint`].
- **Day/night classifier** ([`day_cycle`]): sunrise <= instant < sunset against a
  [`DayCycleTable`].
- **Keyed row lookup** ([`lookup`]): first row with a given identifier.
- **Audit dataset** ([`dataset`]): the five input files of one audit run.

## Unknown is a value

Unreadable timestamps and dates missing from the day-cycle table resolve to
`None` rather than an error, so rule checks can tell "day", "night" and
"cannot determine" apart. Only I/O and malformed files are errors
([`UtilsError`]).

## Usage

```rust,no_run
use flight_audit_utils::{is_daytime, resolve_timestamp, DayCycleTable, TimezoneHint, UtilsResult};

fn example() -> UtilsResult<()> {
    let daycycle = DayCycleTable::load("daycycle.json")?;
    let hint = TimezoneHint::from(daycycle.timezone());

    match resolve_timestamp("2015-06-05T07:00:00", &hint).and_then(|t| is_daytime(&t, &daycycle)) {
        Some(true) => println!("day"),
        Some(false) => println!("night"),
        None => println!("unknown"),
    }
    Ok(())
}
```
*/

pub mod config;
pub mod dataset;
pub mod day_cycle;
pub mod errors;
pub mod lookup;
pub mod structured;
pub mod tabular;
pub mod temporal;

// Re-export main types for convenience
pub use config::{AuditFiles, ResolverConfig};
pub use dataset::AuditDataset;
pub use day_cycle::{is_daytime, DayCycleTable, SunTimes};
pub use errors::{UtilsError, UtilsResult};
pub use lookup::{find_by_id, without_header};
pub use structured::{read_structured, read_structured_from_reader};
pub use tabular::{
    read_table, read_table_from_reader, write_table, write_table_to_writer, Cell, Row, Table,
};
pub use temporal::{localize, resolve_timestamp, resolve_timestamp_with, Instant, TimezoneHint};
