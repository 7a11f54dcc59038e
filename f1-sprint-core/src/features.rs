//! Aggregator: winners → merged wins → win counts → enriched summary.
//!
//! All four steps are pure. Joins are hash joins that keep the order of the
//! left side; grouping keeps first-appearance order so that the stable sort on
//! win count leaves equal counts in the order drivers first appear.

use std::collections::{BTreeMap, HashMap};

use tracing::info;

use crate::error::{PipelineError, Result};
use crate::model::{
    DriverRecord, DriversTable, MergedWinRecord, RaceRecord, RacesTable, ResultRecord,
    SprintResultsTable, SprintWinCount, SprintWinSummary, YearCount,
};

/// Keeps rows with `positionOrder == 1`. Several winners for one race all pass.
pub fn identify_sprint_winners(results: &SprintResultsTable) -> SprintResultsTable {
    info!("Identifying sprint race winners");
    let records: Vec<ResultRecord> = results
        .records
        .iter()
        .filter(|r| r.position_order == 1)
        .cloned()
        .collect();
    info!(winners = records.len(), "Found sprint race winners");
    SprintResultsTable { records }
}

fn index_by<T, F>(records: &[T], key: F) -> HashMap<i64, Vec<&T>>
where
    F: Fn(&T) -> i64,
{
    let mut index: HashMap<i64, Vec<&T>> = HashMap::with_capacity(records.len());
    for record in records {
        index.entry(key(record)).or_default().push(record);
    }
    index
}

/// Inner-joins winners with races on `raceId`, then with drivers on `driverId`.
/// Winners whose race or driver is unknown are dropped.
pub fn merge_sprint_data(
    winners: &SprintResultsTable,
    races: &RacesTable,
    drivers: &DriversTable,
) -> Result<Vec<MergedWinRecord>> {
    info!("Merging sprint winners with race and driver information");
    if !races.has_year {
        return Err(PipelineError::Schema {
            table: "Races".to_owned(),
            missing: vec!["year".to_owned()],
        });
    }

    let races_by_id: HashMap<i64, Vec<&RaceRecord>> = index_by(&races.records, |r| r.race_id);
    let drivers_by_id: HashMap<i64, Vec<&DriverRecord>> =
        index_by(&drivers.records, |d| d.driver_id);

    let mut merged = Vec::new();
    for winner in &winners.records {
        let Some(race_matches) = races_by_id.get(&winner.race_id) else {
            continue;
        };
        for race in race_matches {
            let Some(driver_matches) = drivers_by_id.get(&winner.driver_id) else {
                continue;
            };
            let year = race.year.ok_or_else(|| PipelineError::TypeCoercion {
                table: "Races".to_owned(),
                column: "year".to_owned(),
                row: races
                    .records
                    .iter()
                    .position(|r| std::ptr::eq(r, *race))
                    .unwrap_or_default(),
                value: None,
                expected: "integer",
            })?;
            for driver in driver_matches {
                merged.push(MergedWinRecord {
                    result_id: winner.result_id,
                    race_id: winner.race_id,
                    driver_id: winner.driver_id,
                    position: winner.position,
                    position_order: winner.position_order,
                    year,
                    race_name: race.name.clone(),
                    forename: driver.forename.clone(),
                    surname: driver.surname.clone(),
                    full_name: driver.full_name.clone(),
                });
            }
        }
    }

    let orphaned = winners.records.len().saturating_sub(merged.len());
    info!(rows = merged.len(), orphaned, "Merged sprint data");
    Ok(merged)
}

/// Counts wins per driver, most wins first. Equal counts keep first-appearance order.
pub fn calculate_sprint_wins(merged: &[MergedWinRecord]) -> Vec<SprintWinCount> {
    info!("Calculating sprint wins per driver");
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<SprintWinCount> = Vec::new();
    for record in merged {
        let slot = *slots.entry(record.full_name.as_str()).or_insert_with(|| {
            counts.push(SprintWinCount {
                driver_name: record.full_name.clone(),
                sprint_wins: 0,
            });
            counts.len() - 1
        });
        counts[slot].sprint_wins += 1;
    }
    // `sort_by` is stable.
    counts.sort_by(|a, b| b.sprint_wins.cmp(&a.sprint_wins));
    info!(drivers = counts.len(), "Calculated sprint wins");
    counts
}

/// Left-joins the latest win year onto each win count.
///
/// Both inputs derive from the same merged table, so a driver without a
/// latest year means the caller passed mismatched tables.
pub fn enrich_sprint_wins_data(
    sprint_wins: &[SprintWinCount],
    merged: &[MergedWinRecord],
) -> Result<Vec<SprintWinSummary>> {
    info!("Enriching sprint wins data");
    let mut latest: HashMap<&str, i32> = HashMap::new();
    for record in merged {
        latest
            .entry(record.full_name.as_str())
            .and_modify(|year| *year = (*year).max(record.year))
            .or_insert(record.year);
    }

    let enriched = sprint_wins
        .iter()
        .map(|count| -> Result<SprintWinSummary> {
            let latest_win_year = latest
                .get(count.driver_name.as_str())
                .copied()
                .ok_or_else(|| {
                    PipelineError::LogicInvariant(format!(
                        "no merged win record for driver {:?}",
                        count.driver_name
                    ))
                })?;
            Ok(SprintWinSummary {
                driver_name: count.driver_name.clone(),
                sprint_wins: count.sprint_wins,
                latest_win_year,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    info!(drivers = enriched.len(), "Enriched sprint wins with latest win year");
    Ok(enriched)
}

/// Merged wins per season, oldest season first.
pub fn wins_by_year(merged: &[MergedWinRecord]) -> Vec<YearCount> {
    let mut by_year: BTreeMap<i32, i64> = BTreeMap::new();
    for record in merged {
        *by_year.entry(record.year).or_default() += 1;
    }
    by_year
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}
