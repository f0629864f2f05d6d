//! The harvest loop: one departure airport, every configured arrival
//! continent, one route query per non-sentinel airport.

use tracing::{error, info, warn};

use crate::browser::Dom;
use crate::config::Config;
use crate::error::{HarvestError, Result};
use crate::records::{AirportOption, CsvSink};
use crate::session::Session;
use crate::workflow::route::{extract_distance, submit_route_query};
use crate::workflow::selection::{
    airport_list, choose_airport, choose_continent, Field, RouteSelection,
};

/// Outcome counters for a full run.
#[derive(Debug, Default)]
pub struct HarvestStats {
    pub recorded: usize,
    pub failed: usize,
    pub continents: usize,
}

/// Decide which arrival options to query: drop the sentinel, keep document
/// order, truncate at the per-continent cap. Pure so the loop bound is
/// testable without a browser.
pub fn plan_arrivals(options: &[AirportOption], cap: Option<usize>) -> Vec<AirportOption> {
    let planned = options.iter().filter(|o| !o.is_sentinel()).cloned();
    match cap {
        Some(n) => planned.take(n).collect(),
        None => planned.collect(),
    }
}

/// Run the full harvest against an authenticated session sitting on the
/// route research form. Records are appended to the sink as they are
/// collected; one airport failing is logged and the loop moves on.
pub async fn run_harvest(
    session: &Session,
    config: &Config,
    sink: &mut CsvSink,
) -> Result<HarvestStats> {
    let dom = session.dom();
    let mut stats = HarvestStats::default();

    // Departure: last-listed airport of the departure continent.
    let mut selection = choose_continent(
        dom,
        Field::Depart,
        &config.departure_continent,
        RouteSelection::default(),
    )
    .await?;

    let departures = airport_list(dom, Field::Depart).await?;
    let base = departures
        .iter()
        .rev()
        .find(|o| !o.is_sentinel())
        .cloned()
        .ok_or_else(|| {
            HarvestError::Dom(format!(
                "no departure airports listed for continent '{}'",
                config.departure_continent
            ))
        })?;
    selection = choose_airport(dom, Field::Depart, &base, selection).await?;

    for continent in &config.arrival_continents {
        selection = choose_continent(dom, Field::Arrive, continent, selection).await?;
        stats.continents += 1;

        // Snapshot goes stale on the next continent change, so plan now.
        let arrivals = airport_list(dom, Field::Arrive).await?;
        let planned = plan_arrivals(&arrivals, config.per_continent_cap);
        info!(
            "{}: {} airports listed, querying {}",
            continent,
            arrivals.len(),
            planned.len()
        );

        for arrival in &planned {
            match harvest_one(dom, arrival, selection.clone()).await {
                Ok(updated) => {
                    selection = updated;
                    // Selection and query completed; only now does a record exist.
                    let record = extract_distance(dom, arrival, &selection).await;
                    match record {
                        Ok(record) => {
                            sink.append(&record)?;
                            stats.recorded += 1;
                        }
                        Err(e) => {
                            error!("distance extraction failed for {}: {}", arrival.label, e);
                            stats.failed += 1;
                        }
                    }
                }
                Err(e) => {
                    error!("route query failed for {}: {}", arrival.label, e);
                    stats.failed += 1;
                }
            }
        }
    }

    if stats.failed > 0 {
        warn!("{} route(s) failed and were skipped", stats.failed);
    }
    Ok(stats)
}

/// Select one arrival airport and submit its route query. Returns the
/// updated selection; extraction happens at the call site so a failed
/// query never reaches the record stage.
async fn harvest_one(
    dom: &Dom,
    arrival: &AirportOption,
    selection: RouteSelection,
) -> Result<RouteSelection> {
    let selection = choose_airport(dom, Field::Arrive, arrival, selection).await?;
    submit_route_query(dom, &selection).await?;
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(value: &str, label: &str) -> AirportOption {
        AirportOption {
            value: value.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn sentinel_is_skipped_and_cap_applied() {
        let options = vec![
            opt("x", "-- select --"),
            opt("12", "Kingston (KIN)"),
            opt("13", "Havana (HAV)"),
        ];

        let planned = plan_arrivals(&options, Some(2));
        let ids: Vec<&str> = planned.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(ids, vec!["12", "13"]);
    }

    #[test]
    fn cap_truncates_longer_lists() {
        let options = vec![
            opt("x", "-- select --"),
            opt("1", "A"),
            opt("2", "B"),
            opt("3", "C"),
            opt("4", "D"),
        ];

        assert_eq!(plan_arrivals(&options, Some(2)).len(), 2);
        assert_eq!(plan_arrivals(&options, Some(10)).len(), 4);
    }

    #[test]
    fn no_cap_keeps_every_real_airport() {
        let options = vec![opt("x", "-- select --"), opt("1", "A"), opt("2", "B")];
        assert_eq!(plan_arrivals(&options, None).len(), 2);
    }

    #[test]
    fn order_is_preserved() {
        let options = vec![opt("9", "Z"), opt("x", "-- select --"), opt("3", "A")];
        let planned = plan_arrivals(&options, None);
        let ids: Vec<&str> = planned.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(ids, vec!["9", "3"]);
    }
}
