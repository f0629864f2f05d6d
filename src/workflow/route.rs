//! Route query submission and distance extraction.

use std::time::Duration;

use tracing::{info, warn};

use crate::browser::{wait_until, Dom};
use crate::error::{HarvestError, Result};
use crate::records::{AirportOption, DistanceRecord};
use crate::workflow::selection::{confirm_still_selected, Field, RouteSelection};

/// XPath of the submit control on the research form.
const SUBMIT_XPATH: &str = "//input[@name='submit']";
/// Landmark cell proving the result page rendered.
const ROUTE_DETAILS_XPATH: &str = "//td[text()='Route Details']";
/// The cell holding the distance value, adjacent to its caption.
const DISTANCE_XPATH: &str = "//b[text()='Distance']/../following-sibling::td";

const ROUTE_DETAILS_WAIT: Duration = Duration::from_secs(15);
const DISTANCE_WAIT: Duration = Duration::from_secs(10);

/// Submit the research form and wait for the result page.
///
/// Both selections are re-confirmed first; an intervening async update can
/// silently revert one, and submitting a half-reverted form researches the
/// wrong route. The "Route Details" landmark timing out is tolerated here;
/// extraction will fail with context if the page truly never rendered.
pub async fn submit_route_query(dom: &Dom, selection: &RouteSelection) -> Result<()> {
    for field in [Field::Depart, Field::Arrive] {
        let airport = selection.airport(field).ok_or_else(|| {
            HarvestError::Dom(format!(
                "no {} airport selected before route query",
                field.as_str()
            ))
        })?;
        confirm_still_selected(dom, field, &airport.value).await?;
    }

    dom.xpath_click(SUBMIT_XPATH).await?;

    let landmark = wait_until("'Route Details' landmark", ROUTE_DETAILS_WAIT, || async move {
        Ok(dom.xpath_present(ROUTE_DETAILS_XPATH).await?.then_some(()))
    })
    .await;

    match landmark {
        Ok(()) => info!("route details loaded"),
        Err(e) if e.is_timeout() => warn!("{} (continuing anyway)", e),
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Read the distance off the result page and build the record.
///
/// The distance keeps its exact page formatting ("1,204 mi"); only stray
/// quote characters are stripped. Bounded like every other readiness check,
/// and a hard error once the bound expires.
pub async fn extract_distance(
    dom: &Dom,
    arrival: &AirportOption,
    selection: &RouteSelection,
) -> Result<DistanceRecord> {
    let text = wait_until("distance cell on result page", DISTANCE_WAIT, || async move {
        dom.xpath_text(DISTANCE_XPATH).await
    })
    .await?;

    let departure_continent = selection
        .departure_continent
        .clone()
        .ok_or_else(|| HarvestError::Dom("no departure continent recorded".to_string()))?;
    let arrival_continent = selection
        .arrival_continent
        .clone()
        .ok_or_else(|| HarvestError::Dom("no arrival continent recorded".to_string()))?;

    let record = DistanceRecord {
        airport: arrival.label.trim().to_string(),
        id: arrival.value.clone(),
        distance: strip_quotes(&text),
        departure_continent,
        arrival_continent,
    };
    info!(
        "recorded {} ({}): {}",
        record.airport, record.id, record.distance
    );
    Ok(record)
}

fn strip_quotes(text: &str) -> String {
    text.replace('"', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_quotes_only() {
        assert_eq!(strip_quotes("\"1,204 mi\""), "1,204 mi");
        assert_eq!(strip_quotes("1,204 mi"), "1,204 mi");
        assert_eq!(strip_quotes("987 mi"), "987 mi");
    }
}
