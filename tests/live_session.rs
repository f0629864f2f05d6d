//! Live tests against a real browser and the real site.
//!
//! All ignored by default; run manually with valid credentials in the
//! environment: `cargo test -- --ignored`

use route_distance_harvester::workflow::{airport_list, choose_continent, Field, RouteSelection};
use route_distance_harvester::{logger, Config, Session};

#[tokio::test]
#[ignore]
async fn browser_launches_and_login_page_loads() {
    logger::init();
    let config = Config::from_env().expect("config from env");

    let session = Session::open(&config).await.expect("browser launch");
    session.close().await;
}

#[tokio::test]
#[ignore]
async fn login_and_world_selection() {
    logger::init();
    let config = Config::from_env().expect("config from env");

    let session = Session::open(&config).await.expect("browser launch");
    let result = async {
        session
            .authenticate(&config.username, &config.password)
            .await?;
        session.select_world(&config.world_id).await
    }
    .await;
    session.close().await;

    result.expect("login and world selection");
}

#[tokio::test]
#[ignore]
async fn continent_selection_yields_airports() {
    logger::init();
    let config = Config::from_env().expect("config from env");

    let session = Session::open(&config).await.expect("browser launch");
    let result = async {
        session
            .authenticate(&config.username, &config.password)
            .await?;
        session.select_world(&config.world_id).await?;
        session.go_to_routes().await?;

        let selection = choose_continent(
            session.dom(),
            Field::Depart,
            &config.departure_continent,
            RouteSelection::default(),
        )
        .await?;
        assert_eq!(
            selection.departure_continent.as_deref(),
            Some(config.departure_continent.as_str())
        );

        airport_list(session.dom(), Field::Depart).await
    }
    .await;
    session.close().await;

    let airports = result.expect("continent selection");
    assert!(
        !airports.is_empty(),
        "expected at least the sentinel option in the airport list"
    );
}
