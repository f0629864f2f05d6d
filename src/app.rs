use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::records::CsvSink;
use crate::session::Session;
use crate::workflow::{run_harvest, HarvestStats};

/// Application root: owns the session and drives the workflow end to end.
pub struct App {
    config: Config,
    session: Session,
}

impl App {
    /// Launch the browser and open the login page.
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);
        let session = Session::open(&config).await?;
        Ok(Self { config, session })
    }

    /// Authenticate, harvest, and shut the browser down on every exit path.
    pub async fn run(self) -> Result<HarvestStats> {
        let App { config, session } = self;
        let result = drive(&session, &config).await;
        session.close().await;

        if let Ok(stats) = &result {
            log_final_stats(stats, &config);
        }
        result
    }
}

async fn drive(session: &Session, config: &Config) -> Result<HarvestStats> {
    session
        .authenticate(&config.username, &config.password)
        .await?;
    session.select_world(&config.world_id).await?;
    session.go_to_routes().await?;

    let mut sink = CsvSink::create(&config.output_file)?;
    run_harvest(session, config, &mut sink).await
}

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "route distance harvest - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("world: {}", config.world_id);
    info!(
        "arrival continents: {}",
        config.arrival_continents.join(", ")
    );
    match config.per_continent_cap {
        Some(n) => info!("per-continent cap: {}", n),
        None => info!("per-continent cap: none"),
    }
    info!("{}", "=".repeat(60));
}

fn log_final_stats(stats: &HarvestStats, config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "done: {} record(s) across {} continent(s), {} failed",
        stats.recorded, stats.continents, stats.failed
    );
    info!("output: {}", config.output_file);
    info!("{}", "=".repeat(60));
}
