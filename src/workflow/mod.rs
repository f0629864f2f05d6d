//! The harvest workflow: selection choreography, route queries, and the
//! orchestration loop that ties them together.

pub mod harvest;
pub mod route;
pub mod selection;

pub use harvest::{plan_arrivals, run_harvest, HarvestStats};
pub use route::{extract_distance, submit_route_query};
pub use selection::{airport_list, choose_airport, choose_continent, Field, RouteSelection};
