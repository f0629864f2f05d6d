//! # Route Distance Harvester
//!
//! Automates a browser session against AirlineMogul: log in, enter a world,
//! and walk the route research form to collect route distances into a CSV.
//!
//! The interesting part is synchronisation, not scraping: the site fills its
//! airport dropdowns asynchronously after a continent is chosen, so every
//! step is fenced by bounded polling waits on observable page state.
//!
//! ## Layers
//!
//! - `browser/` - plumbing: Chrome lifecycle, DOM access through CDP
//!   evaluate, and the generic bounded-wait primitives
//! - `session` - authenticated site session and navigation
//! - `workflow/` - the selection choreography, route queries, and the
//!   harvest loop
//! - `records` - collected data and the incremental CSV sink
//! - `app` - end-to-end orchestration

pub mod app;
pub mod browser;
pub mod config;
pub mod error;
pub mod logger;
pub mod records;
pub mod session;
pub mod workflow;

pub use app::App;
pub use config::Config;
pub use error::{HarvestError, Result};
pub use records::{read_records, AirportOption, CsvSink, DistanceRecord};
pub use session::Session;
pub use workflow::{Field, HarvestStats, RouteSelection};
