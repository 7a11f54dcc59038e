mod common;

use chrono::NaiveDate;
use f1_sprint_core::cleaning::{
    clean_drivers_data, clean_races_data, clean_sprint_results, coerce_integer, parse_date,
};
use f1_sprint_core::error::PipelineError;

#[test]
fn non_numeric_position_rows_are_dropped_and_counted() {
    let raw = common::table(
        "sprint_results.csv",
        "resultId,raceId,driverId,position,positionOrder\n1,10,100,1,1\n2,10,101,DNF,2\n3,10,102,3,3\n",
    );

    let cleaned = clean_sprint_results(&raw).unwrap();

    assert_eq!(cleaned.dropped_rows, 1);
    let ids: Vec<i64> = cleaned.table.records.iter().map(|r| r.result_id).collect();
    assert_eq!(ids, [1, 3]);
    assert!(cleaned.table.records.iter().all(|r| r.position.is_some()));
}

#[test]
fn backslash_n_and_empty_positions_are_dropped() {
    let raw = common::table("sprint_results.csv", common::SPRINT_RESULTS);
    let cleaned = clean_sprint_results(&raw).unwrap();
    assert_eq!(cleaned.dropped_rows, 1);
    assert_eq!(cleaned.table.records.len(), 7);

    let raw = common::table(
        "sprint_results.csv",
        "resultId,raceId,driverId,position,positionOrder\n1,10,100,,1\n2,10,101,2.0,2\n",
    );
    let cleaned = clean_sprint_results(&raw).unwrap();
    assert_eq!(cleaned.dropped_rows, 1);
    assert_eq!(cleaned.table.records[0].position, Some(2));
}

#[test]
fn null_race_id_after_validation_is_a_type_coercion_error() {
    let raw = common::table(
        "sprint_results.csv",
        "resultId,raceId,driverId,position,positionOrder\n1,10,100,1,1\n2,,101,2,2\n",
    );

    match clean_sprint_results(&raw).unwrap_err() {
        PipelineError::TypeCoercion { table, column, row, value, .. } => {
            assert_eq!(table, "Sprint Results");
            assert_eq!(column, "raceId");
            assert_eq!(row, 1);
            assert_eq!(value, None);
        }
        other => panic!("expected TypeCoercion, got {other:?}"),
    }
}

#[test]
fn drivers_are_trimmed_and_get_a_full_name() {
    let cleaned = clean_drivers_data(&common::table("drivers.csv", common::DRIVERS)).unwrap();

    let bottas = cleaned
        .table
        .records
        .iter()
        .find(|d| d.driver_id == 822)
        .unwrap();
    assert_eq!(bottas.forename, "Valtteri");
    assert_eq!(bottas.surname, "Bottas");
    assert_eq!(bottas.full_name, "Valtteri Bottas");
    assert_eq!(bottas.dob, NaiveDate::from_ymd_opt(1989, 8, 28));
}

#[test]
fn unparsable_dob_becomes_null_without_failing() {
    let raw = common::table(
        "drivers.csv",
        "driverId,forename,surname,dob\n1,Max,V,not a date\n2,Lando,Norris,\n",
    );

    let cleaned = clean_drivers_data(&raw).unwrap();

    assert_eq!(cleaned.coerced_to_null, 1);
    assert!(cleaned.table.records.iter().all(|d| d.dob.is_none()));
    assert_eq!(cleaned.table.records[0].full_name, "Max V");
}

#[test]
fn drivers_without_dob_column_still_clean() {
    let raw = common::table("drivers.csv", "driverId,forename,surname\n100,Max,V\n");
    let cleaned = clean_drivers_data(&raw).unwrap();
    assert_eq!(cleaned.table.records[0].dob, None);
}

#[test]
fn year_is_derived_from_date_when_year_column_is_absent() {
    let raw = common::table(
        "races.csv",
        "raceId,name,date\n1,A,2021-07-18\n2,B,2022-04-24\n3,C,garbage\n",
    );

    let cleaned = clean_races_data(&raw).unwrap();

    assert!(cleaned.table.has_year);
    let years: Vec<Option<i32>> = cleaned.table.records.iter().map(|r| r.year).collect();
    assert_eq!(years, [Some(2021), Some(2022), None]);
    assert_eq!(cleaned.coerced_to_null, 1);
}

#[test]
fn races_without_year_or_date_have_no_year() {
    let raw = common::table("races.csv", "raceId,name\n1,A\n");
    let cleaned = clean_races_data(&raw).unwrap();
    assert!(!cleaned.table.has_year);
    assert_eq!(cleaned.table.records[0].year, None);
}

#[test]
fn sprint_date_is_read_under_either_spelling() {
    let snake = clean_races_data(&common::table("races.csv", common::RACES)).unwrap();
    assert_eq!(
        snake.table.records[0].sprint_date,
        NaiveDate::from_ymd_opt(2021, 7, 17)
    );

    let camel = clean_races_data(&common::table(
        "races.csv",
        "raceId,year,name,sprintDate\n1,2023,A,2023-07-29\n",
    ))
    .unwrap();
    assert_eq!(
        camel.table.records[0].sprint_date,
        NaiveDate::from_ymd_opt(2023, 7, 29)
    );
}

#[test]
fn cleaning_is_idempotent() {
    let raw_results = common::table("sprint_results.csv", common::SPRINT_RESULTS);
    let results = clean_sprint_results(&raw_results).unwrap();
    let again = clean_sprint_results(&results.table.to_raw("sprint_results.csv")).unwrap();
    assert_eq!(again.table, results.table);
    assert_eq!(again.dropped_rows, 0);

    let drivers = clean_drivers_data(&common::table("drivers.csv", common::DRIVERS)).unwrap();
    let again = clean_drivers_data(&drivers.table.to_raw("drivers.csv")).unwrap();
    assert_eq!(again.table, drivers.table);
    assert_eq!(again.coerced_to_null, 0);

    let races = clean_races_data(&common::table("races.csv", common::RACES)).unwrap();
    let again = clean_races_data(&races.table.to_raw("races.csv")).unwrap();
    assert_eq!(again.table, races.table);

    let yearless = clean_races_data(&common::table("races.csv", "raceId,name\n1,A\n")).unwrap();
    let again = clean_races_data(&yearless.table.to_raw("races.csv")).unwrap();
    assert_eq!(again.table, yearless.table);
}

#[test]
fn coercion_and_date_helpers() {
    assert_eq!(coerce_integer::<i32>(" 7 "), Some(7));
    assert_eq!(coerce_integer::<i32>("3.0"), Some(3));
    assert_eq!(coerce_integer::<i32>("3.5"), None);
    assert_eq!(coerce_integer::<i32>("\\N"), None);
    assert_eq!(coerce_integer::<i64>("NaN"), None);
    assert_eq!(parse_date("2021-07-18"), NaiveDate::from_ymd_opt(2021, 7, 18));
    assert_eq!(parse_date("2021-07-18 14:00:00"), NaiveDate::from_ymd_opt(2021, 7, 18));
    assert_eq!(parse_date("\\N"), None);
}
