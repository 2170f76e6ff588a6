use flight_audit_utils::{is_daytime, resolve_timestamp, DayCycleTable, TimezoneHint};
use std::io::Write;
use tempfile::NamedTempFile;

fn load_reference_table() -> DayCycleTable {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"2015": {{"06-05": {{"sunrise": "07:00", "sunset": "17:00"}}}}, "timezone": "America/New_York"}}"#
    )
    .unwrap();
    DayCycleTable::load(file.path()).unwrap()
}

/// Test classification against a one-day table loaded from disk
///
/// **What this tests:**
/// - Naive instants are read in the table's timezone
/// - Sunrise is daytime, sunset is not
/// - The second before each boundary lands on the expected side
#[test]
fn test_daytime_reference_scenario() {
    let table = load_reference_table();
    let check = |text: &str| {
        let instant = resolve_timestamp(text, &TimezoneHint::None).unwrap();
        is_daytime(&instant, &table)
    };

    assert_eq!(check("2015-06-05T07:00:00"), Some(true));
    assert_eq!(check("2015-06-05T17:00:00"), Some(false));
    assert_eq!(check("2015-06-05T06:59:59"), Some(false));
    assert_eq!(check("2015-06-05T16:59:59"), Some(true));
}

/// Test that dates outside the table are unknown rather than day or night
#[test]
fn test_daytime_unknown_outside_table() {
    let table = load_reference_table();

    let other_year = resolve_timestamp("2014-06-05T12:00:00", &TimezoneHint::None).unwrap();
    let other_day = resolve_timestamp("2015-06-04T12:00:00", &TimezoneHint::None).unwrap();

    assert_eq!(is_daytime(&other_year, &table), None);
    assert_eq!(is_daytime(&other_day, &table), None);
}

/// Test that a takeoff logged in another zone is compared as an absolute instant
///
/// 12:30 in Denver (MDT, -06:00) is 14:30 in New York, inside 07:00-17:00.
/// 15:30 in Denver is 17:30 in New York, after sunset.
#[test]
fn test_daytime_cross_zone_takeoff() {
    let table = load_reference_table();

    let midday = resolve_timestamp("2015-06-05T12:30:00", &"America/Denver".into()).unwrap();
    let evening = resolve_timestamp("2015-06-05T15:30:00", &"America/Denver".into()).unwrap();

    assert_eq!(is_daytime(&midday, &table), Some(true));
    assert_eq!(is_daytime(&evening, &table), Some(false));
}
