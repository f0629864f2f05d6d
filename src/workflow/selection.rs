//! Continent and airport selection.
//!
//! This is the synchronisation core of the whole program. The site populates
//! the airport dropdowns asynchronously after a continent is chosen, showing
//! a transient "Loading..." placeholder option, so every selection step is
//! fenced by bounded waits on the page's own state.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::browser::{wait_until, wait_until_gone, Dom};
use crate::error::Result;
use crate::records::AirportOption;

/// Placeholder label shown while an airport list is being fetched.
const LOADING_LABEL: &str = "Loading...";

/// Bound for "the option I want exists in the control".
const OPTION_WAIT: Duration = Duration::from_secs(15);
/// Bound for "the page acknowledges my selection".
const SELECTED_WAIT: Duration = Duration::from_secs(10);
/// Short window confirming the Loading placeholder showed up at all.
const LOADING_CONFIRM: Duration = Duration::from_secs(1);
/// Bound for the placeholder to vanish once confirmed.
const LOADING_GONE: Duration = Duration::from_secs(5);
/// Unconditional settle delay absorbing residual DOM mutation.
const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Which half of the route form a step operates on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Depart,
    Arrive,
}

impl Field {
    /// Element id of the continent select for this role.
    pub fn continent_select_id(self) -> &'static str {
        match self {
            Field::Depart => "depart_sel",
            Field::Arrive => "arrive_sel",
        }
    }

    /// Element id of the airport select for this role.
    pub fn airport_select_id(self) -> &'static str {
        match self {
            Field::Depart => "depart_sel_apt",
            Field::Arrive => "arrive_sel_apt",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Depart => "depart",
            Field::Arrive => "arrive",
        }
    }
}

/// The route currently dialled into the form, threaded explicitly through
/// each step instead of living as hidden mutable session state.
#[derive(Clone, Debug, Default)]
pub struct RouteSelection {
    pub departure_continent: Option<String>,
    pub arrival_continent: Option<String>,
    pub departure: Option<AirportOption>,
    pub arrival: Option<AirportOption>,
}

impl RouteSelection {
    fn with_continent(mut self, field: Field, continent: &str) -> Self {
        match field {
            Field::Depart => self.departure_continent = Some(continent.to_string()),
            Field::Arrive => self.arrival_continent = Some(continent.to_string()),
        }
        self
    }

    fn with_airport(mut self, field: Field, airport: &AirportOption) -> Self {
        match field {
            Field::Depart => self.departure = Some(airport.clone()),
            Field::Arrive => self.arrival = Some(airport.clone()),
        }
        self
    }

    pub fn airport(&self, field: Field) -> Option<&AirportOption> {
        match field {
            Field::Depart => self.departure.as_ref(),
            Field::Arrive => self.arrival.as_ref(),
        }
    }
}

/// Pick a continent and wait out the airport reload it triggers.
///
/// Does not return while the "Loading..." placeholder is still visible in
/// the control; if the placeholder never shows (list loaded too fast to
/// observe), the disappearance phase is skipped silently. A placeholder that
/// confirms but then sticks around is logged and tolerated, matching the
/// best-effort policy of the rest of the workflow.
pub async fn choose_continent(
    dom: &Dom,
    field: Field,
    continent: &str,
    selection: RouteSelection,
) -> Result<RouteSelection> {
    let select_id = field.continent_select_id();

    wait_until(
        &format!("continent '{}' in #{}", continent, select_id),
        OPTION_WAIT,
        || async move {
            Ok(dom
                .has_option_with_label(select_id, continent)
                .await?
                .then_some(()))
        },
    )
    .await?;

    dom.select_by_label(select_id, continent).await?;

    let gone = wait_until_gone(
        &format!("'{}' placeholder in #{}", LOADING_LABEL, select_id),
        LOADING_CONFIRM,
        LOADING_GONE,
        || async move { dom.has_option_with_label(select_id, LOADING_LABEL).await },
    )
    .await;
    if let Err(e) = gone {
        if e.is_timeout() {
            warn!("{} (continuing anyway)", e);
        } else {
            return Err(e);
        }
    }

    sleep(SETTLE_DELAY).await;
    info!("selected {} continent: {}", field.as_str(), continent);

    Ok(selection.with_continent(field, continent))
}

/// Snapshot the full current option set of the airport control, sentinel
/// included; filtering is the caller's business. The snapshot is stale the
/// moment the continent selection changes again.
pub async fn airport_list(dom: &Dom, field: Field) -> Result<Vec<AirportOption>> {
    dom.select_options(field.airport_select_id()).await
}

/// Select an airport by its underlying value and wait until the page itself
/// reports it selected. Selecting by value, not label, sidesteps duplicate
/// display names.
pub async fn choose_airport(
    dom: &Dom,
    field: Field,
    airport: &AirportOption,
    selection: RouteSelection,
) -> Result<RouteSelection> {
    let select_id = field.airport_select_id();
    let value = airport.value.as_str();

    wait_until(
        &format!("airport option '{}' in #{}", value, select_id),
        OPTION_WAIT,
        || async move {
            Ok(dom
                .has_option_with_value(select_id, value)
                .await?
                .then_some(()))
        },
    )
    .await?;

    dom.select_by_value(select_id, value).await?;

    wait_until(
        &format!("#{} to report '{}' selected", select_id, value),
        SELECTED_WAIT,
        || async move {
            Ok((dom.selected_value(select_id).await?.as_deref() == Some(value)).then_some(()))
        },
    )
    .await?;

    info!("selected {} airport: {}", field.as_str(), airport.label);
    Ok(selection.with_airport(field, airport))
}

/// Re-confirm that a previously issued selection is still acknowledged by
/// the page. Guards against a selection silently reverting under an
/// intervening async update. Timeout here is non-fatal by design.
pub async fn confirm_still_selected(dom: &Dom, field: Field, value: &str) -> Result<()> {
    let select_id = field.airport_select_id();
    let confirmed = wait_until(
        &format!("#{} still reporting '{}' selected", select_id, value),
        SELECTED_WAIT,
        || async move {
            Ok((dom.selected_value(select_id).await?.as_deref() == Some(value)).then_some(()))
        },
    )
    .await;

    match confirmed {
        Ok(()) => Ok(()),
        Err(e) if e.is_timeout() => {
            warn!("{} (continuing anyway)", e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_control_ids_match_site_markup() {
        assert_eq!(Field::Depart.continent_select_id(), "depart_sel");
        assert_eq!(Field::Arrive.continent_select_id(), "arrive_sel");
        assert_eq!(Field::Depart.airport_select_id(), "depart_sel_apt");
        assert_eq!(Field::Arrive.airport_select_id(), "arrive_sel_apt");
    }

    #[test]
    fn selection_updates_are_role_scoped() {
        let kin = AirportOption {
            value: "12".to_string(),
            label: "Kingston (KIN)".to_string(),
        };

        let selection = RouteSelection::default()
            .with_continent(Field::Depart, "Bases")
            .with_continent(Field::Arrive, "Central America")
            .with_airport(Field::Arrive, &kin);

        assert_eq!(selection.departure_continent.as_deref(), Some("Bases"));
        assert_eq!(
            selection.arrival_continent.as_deref(),
            Some("Central America")
        );
        assert!(selection.departure.is_none());
        assert_eq!(selection.airport(Field::Arrive), Some(&kin));
    }
}
