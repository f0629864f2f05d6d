use anyhow::Result;
use route_distance_harvester::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    route_distance_harvester::logger::init();

    let config = Config::from_env()?;
    let stats = App::initialize(config).await?.run().await?;

    if stats.recorded == 0 {
        anyhow::bail!("run completed but no distances were recorded");
    }
    Ok(())
}
